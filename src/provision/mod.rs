//! The provisioning pipeline
//!
//! Each batch runs its entries one at a time in manifest order:
//! resolve the target, skip it if already present, otherwise acquire it,
//! and record the outcome. A failing entry never stops the batch.

pub mod artifact;
pub mod extension;
pub mod gate;
pub mod resolver;
pub mod runner;
pub mod summary;

pub use artifact::ArtifactFetcher;
pub use extension::{ExtensionInstaller, InstallTarget};
pub use gate::ExistenceGate;
pub use resolver::{PathResolver, ResolvedTarget};
pub use runner::{Acquired, Acquirer, BatchRunner};
pub use summary::{BatchSummary, EntryResult, Outcome, ResultAggregator};

use crate::core::ProvisionResult;
use crate::di::ServiceContainer;
use crate::manifest::Manifest;
use std::path::Path;
use tracing::info;

/// Provision every model entry of the manifest at `manifest_path`.
///
/// A missing manifest is an empty batch. A manifest that is not a JSON
/// object is the only error returned.
pub async fn provision_models(
    container: &ServiceContainer,
    manifest_path: &Path,
) -> ProvisionResult<BatchSummary> {
    let Some(manifest) = Manifest::load(manifest_path)? else {
        println!("No manifest found at {}, skipping", manifest_path.display());
        return Ok(BatchSummary::default());
    };

    let entries = manifest.artifacts();
    println!("📦 Provisioning {} model(s)...", entries.len());
    info!("Models root: {}", container.config.models_root().display());

    let fetcher = container.artifact_fetcher();
    Ok(BatchRunner::new(&fetcher).run(entries).await)
}

/// Provision every extension entry of the manifest at `manifest_path`.
pub async fn provision_extensions(
    container: &ServiceContainer,
    manifest_path: &Path,
) -> ProvisionResult<BatchSummary> {
    let Some(manifest) = Manifest::load(manifest_path)? else {
        println!("No manifest found at {}, skipping", manifest_path.display());
        return Ok(BatchSummary::default());
    };

    let entries = manifest.extensions();
    println!("🔌 Installing {} extension(s)...", entries.len());
    info!(
        "Extensions root: {}",
        container.config.extensions_root().display()
    );

    let installer = container.extension_installer();
    Ok(BatchRunner::new(&installer).run(entries).await)
}
