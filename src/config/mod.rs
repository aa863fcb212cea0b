use crate::core::credentials::HUB_TOKEN_KEY;
use crate::core::path::{config_file, ensure_dir};
use crate::core::{CredentialStore, ProvisionError, ProvisionResult};
use crate::di::ConfigProvider;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Root directory for model files; each category is a subdirectory
    #[serde(default = "default_models_root")]
    pub models_root: PathBuf,

    /// Directory extensions are cloned into
    #[serde(default = "default_extensions_root")]
    pub extensions_root: PathBuf,

    /// Manifest listing model artifacts (`models` array)
    #[serde(default = "default_models_manifest")]
    pub models_manifest: PathBuf,

    /// Manifest listing extensions (`nodes` array)
    #[serde(default = "default_extensions_manifest")]
    pub extensions_manifest: PathBuf,

    /// Artifact hub base URL
    #[serde(default = "default_hub_endpoint")]
    pub hub_endpoint: String,

    /// Revision fetched when an entry does not name one
    #[serde(default = "default_hub_revision")]
    pub hub_revision: String,

    /// Hub access token. `HF_TOKEN` and the keychain are consulted too,
    /// see [`Config::resolve_token`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hub_token: Option<String>,

    /// Version-control executable
    #[serde(default = "default_git")]
    pub git: String,

    /// Python interpreter used to run pip (discovered on PATH when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub python: Option<String>,

    /// File inside a cloned extension that lists its dependencies
    #[serde(default = "default_dependency_manifest")]
    pub dependency_manifest: String,

    #[serde(default = "default_clone_timeout_secs")]
    pub clone_timeout_secs: u64,

    #[serde(default = "default_dependency_timeout_secs")]
    pub dependency_timeout_secs: u64,

    #[serde(default = "default_package_timeout_secs")]
    pub package_timeout_secs: u64,
}

fn default_models_root() -> PathBuf {
    PathBuf::from("/app/ComfyUI/models")
}

fn default_extensions_root() -> PathBuf {
    PathBuf::from("/app/ComfyUI/custom_nodes")
}

fn default_models_manifest() -> PathBuf {
    PathBuf::from("/app/config/models.json")
}

fn default_extensions_manifest() -> PathBuf {
    PathBuf::from("/app/config/nodes.json")
}

fn default_hub_endpoint() -> String {
    "https://huggingface.co".to_string()
}

fn default_hub_revision() -> String {
    "main".to_string()
}

fn default_git() -> String {
    "git".to_string()
}

fn default_dependency_manifest() -> String {
    "requirements.txt".to_string()
}

fn default_clone_timeout_secs() -> u64 {
    300
}

fn default_dependency_timeout_secs() -> u64 {
    600
}

fn default_package_timeout_secs() -> u64 {
    300
}

impl Default for Config {
    fn default() -> Self {
        Self {
            models_root: default_models_root(),
            extensions_root: default_extensions_root(),
            models_manifest: default_models_manifest(),
            extensions_manifest: default_extensions_manifest(),
            hub_endpoint: default_hub_endpoint(),
            hub_revision: default_hub_revision(),
            hub_token: None,
            git: default_git(),
            python: None,
            dependency_manifest: default_dependency_manifest(),
            clone_timeout_secs: default_clone_timeout_secs(),
            dependency_timeout_secs: default_dependency_timeout_secs(),
            package_timeout_secs: default_package_timeout_secs(),
        }
    }
}

impl Config {
    /// Load config from the platform-specific config directory
    ///
    /// Config locations:
    /// - Windows: %APPDATA%\provision\config.yaml
    /// - Linux: ~/.config/provision/config.yaml
    /// - macOS: ~/Library/Application Support/provision/config.yaml
    ///
    /// A missing file means defaults.
    pub fn load() -> ProvisionResult<Self> {
        Self::load_from(&config_file()?)
    }

    /// Load config from an explicit path, then apply environment overrides
    pub fn load_from(path: &Path) -> ProvisionResult<Self> {
        let mut config = if path.exists() {
            let content = fs::read_to_string(path)?;
            serde_yaml::from_str(&content).map_err(|e| {
                ProvisionError::Config(format!("Failed to parse {}: {}", path.display(), e))
            })?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Save config to the platform-specific config directory
    pub fn save(&self) -> ProvisionResult<()> {
        self.save_to(&config_file()?)
    }

    pub fn save_to(&self, path: &Path) -> ProvisionResult<()> {
        let config_dir = path
            .parent()
            .ok_or_else(|| ProvisionError::Path("Invalid config path".to_string()))?;
        ensure_dir(config_dir)?;

        let content = serde_yaml::to_string(self)
            .map_err(|e| ProvisionError::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, content)?;
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Some(root) = env_value("PROVISION_MODELS_ROOT") {
            self.models_root = PathBuf::from(root);
        }
        if let Some(root) = env_value("PROVISION_EXTENSIONS_ROOT") {
            self.extensions_root = PathBuf::from(root);
        }
        if let Some(endpoint) = env_value("HF_ENDPOINT") {
            self.hub_endpoint = endpoint;
        }
    }

    /// Find the hub token: `HF_TOKEN`, then the config file, then the keychain
    pub fn resolve_token(&self) -> Option<String> {
        env_value("HF_TOKEN")
            .or_else(|| {
                self.hub_token
                    .clone()
                    .filter(|token| !token.trim().is_empty())
            })
            .or_else(|| CredentialStore::retrieve(HUB_TOKEN_KEY).ok())
    }
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

// Implement ConfigProvider trait
impl ConfigProvider for Config {
    fn models_root(&self) -> &Path {
        &self.models_root
    }

    fn extensions_root(&self) -> &Path {
        &self.extensions_root
    }

    fn hub_revision(&self) -> &str {
        &self.hub_revision
    }

    fn git_executable(&self) -> &str {
        &self.git
    }

    fn python_executable(&self) -> String {
        if let Some(ref python) = self.python {
            return python.clone();
        }

        which::which("python3")
            .or_else(|_| which::which("python"))
            .map(|path| path.to_string_lossy().to_string())
            .unwrap_or_else(|_| "python3".to_string())
    }

    fn dependency_manifest(&self) -> &str {
        &self.dependency_manifest
    }

    fn clone_timeout(&self) -> Duration {
        Duration::from_secs(self.clone_timeout_secs)
    }

    fn dependency_timeout(&self) -> Duration {
        Duration::from_secs(self.dependency_timeout_secs)
    }

    fn package_timeout(&self) -> Duration {
        Duration::from_secs(self.package_timeout_secs)
    }
}
