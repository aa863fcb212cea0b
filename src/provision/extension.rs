//! Plugin installation by repository clone or by package name

use crate::core::path::{ensure_dir, validate_relative};
use crate::core::{ProvisionError, ProvisionResult};
use crate::di::traits::{CommandRunner, ConfigProvider};
use crate::manifest::{ExtensionEntry, InstallKind};
use crate::process::CommandSpec;
use crate::provision::runner::{Acquired, Acquirer};
use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Where an extension lands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallTarget {
    /// Checkout directory below the extensions root
    Directory(PathBuf),
    /// Installed into the Python environment; nothing to check on disk
    Package,
}

pub struct ExtensionInstaller {
    extensions_root: PathBuf,
    runner: Arc<dyn CommandRunner>,
    git: String,
    python: String,
    dependency_manifest: String,
    clone_timeout: Duration,
    dependency_timeout: Duration,
    package_timeout: Duration,
}

impl ExtensionInstaller {
    pub fn new(config: &dyn ConfigProvider, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            extensions_root: config.extensions_root().to_path_buf(),
            runner,
            git: config.git_executable().to_string(),
            python: config.python_executable(),
            dependency_manifest: config.dependency_manifest().to_string(),
            clone_timeout: config.clone_timeout(),
            dependency_timeout: config.dependency_timeout(),
            package_timeout: config.package_timeout(),
        }
    }

    /// Clone `url` into `checkout`, then install its declared dependencies.
    ///
    /// Clone errors fail the entry and remove whatever the clone left behind.
    /// Dependency errors only produce a warning.
    async fn install_vcs(&self, url: &str, checkout: &Path) -> ProvisionResult<Acquired> {
        ensure_dir(&self.extensions_root)?;

        let name = checkout
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        info!("Cloning {} into {}", url, checkout.display());

        let clone = CommandSpec::new(&self.git)
            .arg("clone")
            .arg(url)
            .arg(&name)
            .current_dir(&self.extensions_root);

        let cloned = match self.runner.run(&clone, self.clone_timeout).await {
            Ok(output) => output.into_result(&clone).map(|_| ()),
            Err(e) => Err(e),
        };
        if let Err(e) = cloned {
            if checkout.exists() {
                let _ = fs::remove_dir_all(checkout);
            }
            return Err(e);
        }

        let mut acquired = Acquired::default();
        let requirements = checkout.join(&self.dependency_manifest);
        if requirements.exists() {
            if let Err(e) = self.install_dependencies(&requirements).await {
                warn!("Dependency install for {} failed: {}", name, e);
                acquired
                    .warnings
                    .push(format!("dependency install failed: {}", e));
            }
        }

        Ok(acquired)
    }

    async fn install_dependencies(&self, requirements: &Path) -> ProvisionResult<()> {
        info!("Installing dependencies from {}", requirements.display());

        let install = self
            .pip_install()
            .arg("-r")
            .arg(requirements.to_string_lossy());
        self.runner
            .run(&install, self.dependency_timeout)
            .await?
            .into_result(&install)?;
        Ok(())
    }

    async fn install_package(&self, package_name: &str) -> ProvisionResult<Acquired> {
        info!("Installing package {}", package_name);

        let install = self.pip_install().arg(package_name);
        self.runner
            .run(&install, self.package_timeout)
            .await?
            .into_result(&install)?;
        Ok(Acquired::default())
    }

    fn pip_install(&self) -> CommandSpec {
        CommandSpec::new(&self.python)
            .arg("-m")
            .arg("pip")
            .arg("install")
    }
}

/// Local checkout name for a repository URL: the last path segment without
/// a trailing `.git`.
pub fn repo_dir_name(url: &str) -> ProvisionResult<String> {
    let trimmed = url.trim().trim_end_matches('/');
    let segment = trimmed
        .rsplit(|c: char| c == '/' || c == ':')
        .next()
        .unwrap_or(trimmed);
    let name = segment.strip_suffix(".git").unwrap_or(segment);

    if name.is_empty() {
        return Err(ProvisionError::Config(format!(
            "Cannot derive a directory name from repository url: {}",
            url
        )));
    }
    validate_relative("repo_url", name)?;
    Ok(name.to_string())
}

#[async_trait]
impl Acquirer for ExtensionInstaller {
    type Entry = ExtensionEntry;
    type Target = InstallTarget;

    fn label(&self, entry: &ExtensionEntry) -> String {
        entry.display_name.clone()
    }

    fn resolve(&self, entry: &ExtensionEntry) -> ProvisionResult<InstallTarget> {
        match entry.kind {
            InstallKind::Vcs { ref repository_url } => Ok(InstallTarget::Directory(
                self.extensions_root.join(repo_dir_name(repository_url)?),
            )),
            InstallKind::Package { .. } => Ok(InstallTarget::Package),
        }
    }

    fn presence_path(&self, target: &InstallTarget) -> Option<PathBuf> {
        match target {
            InstallTarget::Directory(dir) => Some(dir.clone()),
            InstallTarget::Package => None,
        }
    }

    async fn acquire(
        &self,
        entry: &ExtensionEntry,
        target: &InstallTarget,
    ) -> ProvisionResult<Acquired> {
        match (&entry.kind, target) {
            (InstallKind::Vcs { repository_url }, InstallTarget::Directory(dir)) => {
                self.install_vcs(repository_url, dir).await
            }
            (InstallKind::Package { package_name }, InstallTarget::Package) => {
                self.install_package(package_name).await
            }
            _ => Err(ProvisionError::Config(format!(
                "Install target does not match entry kind for {}",
                entry.display_name
            ))),
        }
    }
}
