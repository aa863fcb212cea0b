use provision::config::Config;
use provision::core::{ProvisionError, ProvisionResult};

/// Print the effective configuration, environment overrides included.
pub fn show(config: &Config) -> ProvisionResult<()> {
    print!("{}", render(config)?);
    Ok(())
}

/// The configuration as YAML with the hub token masked.
fn render(config: &Config) -> ProvisionResult<String> {
    let mut shown = config.clone();
    if shown.hub_token.is_some() {
        shown.hub_token = Some("********".to_string());
    }

    serde_yaml::to_string(&shown)
        .map_err(|e| ProvisionError::Config(format!("Failed to serialize config: {}", e)))
}
