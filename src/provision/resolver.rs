use crate::core::path::validate_relative;
use crate::core::{ProvisionError, ProvisionResult};
use crate::manifest::Category;
use std::path::{Path, PathBuf};

/// Where an artifact ends up on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    pub directory: PathBuf,
    pub final_name: String,
}

impl ResolvedTarget {
    pub fn final_path(&self) -> PathBuf {
        self.directory.join(&self.final_name)
    }
}

/// Maps an artifact's category and names to its target. Pure; never touches
/// the filesystem.
#[derive(Debug, Clone)]
pub struct PathResolver {
    models_root: PathBuf,
}

impl PathResolver {
    pub fn new(models_root: &Path) -> Self {
        Self {
            models_root: models_root.to_path_buf(),
        }
    }

    pub fn resolve(
        &self,
        category: &Category,
        file_name: &str,
        rename_to: Option<&str>,
    ) -> ProvisionResult<ResolvedTarget> {
        if file_name.trim().is_empty() {
            return Err(ProvisionError::Config("`filename` must not be empty".to_string()));
        }
        validate_relative("filename", file_name)?;
        if let Some(rename_to) = rename_to {
            validate_relative("rename_to", rename_to)?;
        }
        if let Category::Other(ref name) = category {
            validate_relative("type", name)?;
        }

        Ok(ResolvedTarget {
            directory: self.models_root.join(category.dir_name()),
            final_name: rename_to.unwrap_or(file_name).to_string(),
        })
    }
}
