//! Trait definitions for dependency injection

use crate::core::ProvisionResult;
use crate::hub::FetchRequest;
use crate::process::{CommandOutput, CommandSpec};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Trait for configuration access
///
/// Provides read-only access to the settings the provisioning pipeline uses.
/// Implementations should be thread-safe (Send + Sync).
pub trait ConfigProvider: Send + Sync {
    /// Root directory for model files
    fn models_root(&self) -> &Path;

    /// Directory extensions are installed into
    fn extensions_root(&self) -> &Path;

    /// Hub revision used when an entry does not name one
    fn hub_revision(&self) -> &str;

    /// Version-control executable
    fn git_executable(&self) -> &str;

    /// Python interpreter that runs pip
    fn python_executable(&self) -> String;

    /// Dependency list file name inside a cloned extension
    fn dependency_manifest(&self) -> &str;

    fn clone_timeout(&self) -> Duration;

    fn dependency_timeout(&self) -> Duration;

    fn package_timeout(&self) -> Duration;
}

/// Trait for the remote artifact store
///
/// `fetch` places the requested file at
/// `destination_dir/[subfolder/]file_name`, mirroring the store's own layout,
/// and returns that path. The file must not be visible there until the
/// transfer has completed.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    async fn fetch(&self, request: &FetchRequest, destination_dir: &Path)
        -> ProvisionResult<PathBuf>;
}

/// Trait for running external commands (clone, dependency install)
///
/// Returns the exit status and captured text. Exceeding `timeout` yields
/// `ProvisionError::Timeout`.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, spec: &CommandSpec, timeout: Duration) -> ProvisionResult<CommandOutput>;
}
