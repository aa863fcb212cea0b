//! Model file acquisition from the artifact hub

use crate::core::path::ensure_dir;
use crate::core::{ProvisionError, ProvisionResult};
use crate::di::traits::{ArtifactStore, ConfigProvider};
use crate::hub::FetchRequest;
use crate::manifest::ArtifactEntry;
use crate::provision::resolver::{PathResolver, ResolvedTarget};
use crate::provision::runner::{Acquired, Acquirer};
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

const STAGING_PREFIX: &str = ".provision-staging-";

/// Places model files, as served by the hub, at their resolved targets.
pub struct ArtifactFetcher {
    resolver: PathResolver,
    store: Arc<dyn ArtifactStore>,
    default_revision: String,
}

impl ArtifactFetcher {
    pub fn new(config: &dyn ConfigProvider, store: Arc<dyn ArtifactStore>) -> Self {
        Self {
            resolver: PathResolver::new(config.models_root()),
            store,
            default_revision: config.hub_revision().to_string(),
        }
    }

    /// Fetch one entry into `target`.
    ///
    /// On error nothing is left at the final path.
    pub async fn fetch(&self, entry: &ArtifactEntry, target: &ResolvedTarget) -> ProvisionResult<()> {
        ensure_dir(&target.directory)?;
        let final_path = target.final_path();

        let request = FetchRequest {
            source_id: entry.source_id.clone(),
            file_name: entry.file_name.clone(),
            subfolder: entry.subfolder.clone(),
            revision: entry
                .revision
                .clone()
                .unwrap_or_else(|| self.default_revision.clone()),
        };

        info!(
            "Fetching {} from {} into {}",
            request.repo_path().display(),
            request.source_id,
            target.directory.display()
        );

        // Checksummed files must pass verification before they reach the final path
        let direct = entry.subfolder.is_none()
            && entry.final_name() == entry.file_name
            && entry.sha256.is_none();
        let result = if direct {
            self.fetch_direct(&request, target, &final_path).await
        } else {
            self.fetch_staged(entry, &request, target, &final_path).await
        };

        if result.is_err() && final_path.exists() {
            let _ = fs::remove_file(&final_path);
        }
        result
    }

    /// The store writes straight into the target directory.
    async fn fetch_direct(
        &self,
        request: &FetchRequest,
        target: &ResolvedTarget,
        final_path: &Path,
    ) -> ProvisionResult<()> {
        let landed = self.store.fetch(request, &target.directory).await?;

        if landed != final_path {
            move_into_place(&landed, final_path)?;
        }
        Ok(())
    }

    /// The store writes into a private staging directory inside the target
    /// directory; the file is then moved (renamed) to its flattened final name.
    /// The staging directory, subfolders included, is removed on drop.
    async fn fetch_staged(
        &self,
        entry: &ArtifactEntry,
        request: &FetchRequest,
        target: &ResolvedTarget,
        final_path: &Path,
    ) -> ProvisionResult<()> {
        let staging = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempdir_in(&target.directory)?;

        let landed = self.store.fetch(request, staging.path()).await?;
        debug!("Staged {} at {}", entry.file_name, landed.display());

        verify_checksum(entry, &landed)?;
        move_into_place(&landed, final_path)?;
        Ok(())
    }
}

fn move_into_place(from: &Path, to: &Path) -> ProvisionResult<()> {
    if let Some(parent) = to.parent() {
        ensure_dir(parent)?;
    }
    fs::rename(from, to).map_err(|e| {
        ProvisionError::Path(format!(
            "Failed to move {} to {}: {}",
            from.display(),
            to.display(),
            e
        ))
    })
}

/// Compare the fetched file against the entry's expected SHA-256, if any.
/// A mismatching file is deleted.
fn verify_checksum(entry: &ArtifactEntry, path: &Path) -> ProvisionResult<()> {
    let Some(ref expected) = entry.sha256 else {
        return Ok(());
    };

    let actual = sha256_file(path)?;
    if &actual != expected {
        let _ = fs::remove_file(path);
        return Err(ProvisionError::Integrity {
            file: entry.file_name.clone(),
            expected: expected.clone(),
            actual,
        });
    }
    Ok(())
}

fn sha256_file(path: &Path) -> ProvisionResult<String> {
    let mut file = fs::File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; 1024 * 1024];
    loop {
        let read = file.read(&mut buffer)?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }
    Ok(hex::encode(hasher.finalize()))
}

#[async_trait]
impl Acquirer for ArtifactFetcher {
    type Entry = ArtifactEntry;
    type Target = ResolvedTarget;

    fn label(&self, entry: &ArtifactEntry) -> String {
        entry.file_name.clone()
    }

    fn resolve(&self, entry: &ArtifactEntry) -> ProvisionResult<ResolvedTarget> {
        self.resolver
            .resolve(&entry.category, &entry.file_name, entry.rename_to.as_deref())
    }

    fn presence_path(&self, target: &ResolvedTarget) -> Option<PathBuf> {
        Some(target.final_path())
    }

    async fn acquire(
        &self,
        entry: &ArtifactEntry,
        target: &ResolvedTarget,
    ) -> ProvisionResult<Acquired> {
        self.fetch(entry, target).await?;
        Ok(Acquired::default())
    }
}
