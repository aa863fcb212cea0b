//! Common utilities for integration tests

use provision::di::mocks::{MockArtifactStore, MockCommandRunner, MockConfigProvider};
use provision::di::ServiceContainer;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// Isolated models/extensions tree plus mocked collaborators
pub struct Fixture {
    pub temp: TempDir,
    pub store: Arc<MockArtifactStore>,
    pub runner: Arc<MockCommandRunner>,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_runner(MockCommandRunner::new())
    }

    pub fn with_runner(runner: MockCommandRunner) -> Self {
        Self {
            temp: TempDir::new().unwrap(),
            store: Arc::new(MockArtifactStore::new()),
            runner: Arc::new(runner),
        }
    }

    pub fn container(&self) -> ServiceContainer {
        ServiceContainer::with_providers(
            Arc::new(MockConfigProvider::rooted(self.temp.path())),
            self.store.clone(),
            self.runner.clone(),
        )
    }

    pub fn models_root(&self) -> PathBuf {
        self.temp.path().join("models")
    }

    pub fn extensions_root(&self) -> PathBuf {
        self.temp.path().join("custom_nodes")
    }

    /// Write `content` as a manifest file and return its path
    pub fn manifest(&self, content: &str) -> PathBuf {
        let path = self.temp.path().join("manifest.json");
        std::fs::write(&path, content).unwrap();
        path
    }
}

pub fn failed_labels(summary: &provision::provision::BatchSummary) -> Vec<String> {
    summary.failed.iter().map(|(label, _)| label.clone()).collect()
}

pub fn touch(path: &Path) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, b"existing").unwrap();
}
