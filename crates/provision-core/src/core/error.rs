use thiserror::Error;

pub type ProvisionResult<T> = Result<T, ProvisionError>;

#[derive(Error, Debug)]
pub enum ProvisionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Path error: {0}")]
    Path(String),

    /// A manifest entry or configuration value is missing or malformed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The top-level manifest document could not be read.
    /// This is the only error that aborts a whole batch.
    #[error("Manifest error: {0}")]
    Manifest(String),

    #[error("Transfer error: {0}")]
    Transfer(String),

    #[error("Checksum mismatch for {file}: expected {expected}, got {actual}")]
    Integrity {
        file: String,
        expected: String,
        actual: String,
    },

    /// An external command exceeded its wall-clock bound.
    #[error("Timed out after {seconds}s: {command}")]
    Timeout { command: String, seconds: u64 },

    /// An external command exited with a non-zero status.
    #[error("`{command}` exited with {}: {stderr}", code.map(|c| format!("code {}", c)).unwrap_or_else(|| "a signal".to_string()))]
    Process {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("unknown type")]
    UnknownKind(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Credential error: {0}")]
    Credential(String),
}

impl ProvisionError {
    /// Whether this error came from talking to the remote artifact store.
    pub fn is_transfer(&self) -> bool {
        matches!(
            self,
            ProvisionError::Transfer(_) | ProvisionError::Http(_) | ProvisionError::Integrity { .. }
        )
    }
}
