use crate::core::error::{ProvisionError, ProvisionResult};
use std::path::{Component, Path, PathBuf};

/// Get the Provision home directory
///
/// Platform-specific locations:
/// - Windows: %APPDATA%\provision
/// - Linux: ~/.config/provision
/// - macOS: ~/Library/Application Support/provision
pub fn provision_home() -> ProvisionResult<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| ProvisionError::Path("Could not determine config directory".to_string()))?;
    Ok(config_dir.join("provision"))
}

/// Get the config file path (`provision_home()/config.yaml`)
pub fn config_file() -> ProvisionResult<PathBuf> {
    Ok(provision_home()?.join("config.yaml"))
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> ProvisionResult<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Check that a manifest-supplied value is a relative path that stays below
/// the directory it is joined onto.
///
/// Nested values such as `unet/model.bin` are allowed. Empty values,
/// absolute paths and `..` components are rejected.
pub fn validate_relative(field: &str, value: &str) -> ProvisionResult<()> {
    if value.trim().is_empty() {
        return Err(ProvisionError::Config(format!("`{}` must not be empty", field)));
    }

    for component in Path::new(value).components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            _ => {
                return Err(ProvisionError::Config(format!(
                    "`{}` must be a relative path without `..`: {}",
                    field, value
                )))
            }
        }
    }

    Ok(())
}
