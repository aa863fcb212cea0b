//! Mock implementations of service traits for testing

use super::traits::{ArtifactStore, CommandRunner, ConfigProvider};
use crate::core::{ProvisionError, ProvisionResult};
use crate::hub::FetchRequest;
use crate::process::{CommandOutput, CommandSpec};
use async_trait::async_trait;
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Mock configuration provider for testing
///
/// # Example
///
/// ```
/// use provision::di::mocks::MockConfigProvider;
/// use provision::di::ConfigProvider;
/// use std::path::Path;
///
/// let config = MockConfigProvider::rooted(Path::new("/tmp/provision-test"));
/// assert_eq!(config.models_root(), Path::new("/tmp/provision-test/models"));
/// assert_eq!(config.hub_revision(), "main");
/// ```
#[derive(Clone)]
pub struct MockConfigProvider {
    pub models_root: PathBuf,
    pub extensions_root: PathBuf,
    pub hub_revision: String,
    pub git: String,
    pub python: String,
    pub dependency_manifest: String,
    pub clone_timeout: Duration,
    pub dependency_timeout: Duration,
    pub package_timeout: Duration,
}

impl MockConfigProvider {
    /// Models under `root/models`, extensions under `root/custom_nodes`
    pub fn rooted(root: &Path) -> Self {
        Self {
            models_root: root.join("models"),
            extensions_root: root.join("custom_nodes"),
            ..Self::default()
        }
    }
}

impl Default for MockConfigProvider {
    fn default() -> Self {
        Self {
            models_root: PathBuf::from("/tmp/provision-test/models"),
            extensions_root: PathBuf::from("/tmp/provision-test/custom_nodes"),
            hub_revision: "main".to_string(),
            git: "git".to_string(),
            python: "python3".to_string(),
            dependency_manifest: "requirements.txt".to_string(),
            clone_timeout: Duration::from_secs(300),
            dependency_timeout: Duration::from_secs(600),
            package_timeout: Duration::from_secs(300),
        }
    }
}

impl ConfigProvider for MockConfigProvider {
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
        self.python.clone()
    }

    fn dependency_manifest(&self) -> &str {
        &self.dependency_manifest
    }

    fn clone_timeout(&self) -> Duration {
        self.clone_timeout
    }

    fn dependency_timeout(&self) -> Duration {
        self.dependency_timeout
    }

    fn package_timeout(&self) -> Duration {
        self.package_timeout
    }
}

/// Mock artifact store for testing
///
/// Serves registered bytes instead of downloading and records every request.
///
/// # Example
///
/// ```
/// use provision::di::mocks::MockArtifactStore;
///
/// let store = MockArtifactStore::new();
/// store.add_file("org/repo", "model.safetensors", b"weights");
/// store.fail("broken.bin", "HTTP 404");
///
/// assert_eq!(store.call_count(), 0);
/// ```
#[derive(Clone, Default)]
pub struct MockArtifactStore {
    files: Arc<Mutex<HashMap<(String, PathBuf), Vec<u8>>>>,
    fallback: Arc<Mutex<Option<Vec<u8>>>>,
    failures: Arc<Mutex<HashMap<String, String>>>,
    calls: Arc<Mutex<Vec<FetchRequest>>>,
    destinations: Arc<Mutex<Vec<PathBuf>>>,
}

impl MockArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `content` for `repo_path` (`[subfolder/]file_name`) of `source_id`
    pub fn add_file(&self, source_id: &str, repo_path: &str, content: &[u8]) {
        lock(&self.files).insert(
            (source_id.to_string(), PathBuf::from(repo_path)),
            content.to_vec(),
        );
    }

    /// Serve `content` for any request without a registered file
    pub fn serve_any(&self, content: &[u8]) {
        *lock(&self.fallback) = Some(content.to_vec());
    }

    /// Make every request for `file_name` fail with a transfer error
    pub fn fail(&self, file_name: &str, message: &str) {
        lock(&self.failures).insert(file_name.to_string(), message.to_string());
    }

    /// Requests received so far, in order
    pub fn calls(&self) -> Vec<FetchRequest> {
        lock(&self.calls).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    /// Destination directories handed to `fetch`, in order
    pub fn destinations(&self) -> Vec<PathBuf> {
        lock(&self.destinations).clone()
    }
}

#[async_trait]
impl ArtifactStore for MockArtifactStore {
    async fn fetch(
        &self,
        request: &FetchRequest,
        destination_dir: &Path,
    ) -> ProvisionResult<PathBuf> {
        lock(&self.calls).push(request.clone());
        lock(&self.destinations).push(destination_dir.to_path_buf());

        if let Some(message) = lock(&self.failures).get(&request.file_name) {
            return Err(ProvisionError::Transfer(message.clone()));
        }

        let repo_path = request.repo_path();
        let content = lock(&self.files)
            .get(&(request.source_id.clone(), repo_path.clone()))
            .cloned()
            .or_else(|| lock(&self.fallback).clone())
            .ok_or_else(|| {
                ProvisionError::Transfer(format!(
                    "HTTP 404: {} not found in {}",
                    repo_path.display(),
                    request.source_id
                ))
            })?;

        let destination = destination_dir.join(&repo_path);
        let parent = destination.parent().unwrap_or(destination_dir);
        std::fs::create_dir_all(parent)?;

        let mut staged = tempfile::Builder::new()
            .prefix(".download-")
            .tempfile_in(parent)?;
        staged.write_all(&content)?;
        staged
            .persist(&destination)
            .map_err(|e| ProvisionError::Io(e.error))?;
        Ok(destination)
    }
}

/// How the mock runner answers a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockResponse {
    /// Exit 0 without side effects
    Success,
    /// Exit 0 and create the checkout directory (`cwd/<last arg>`), optionally
    /// containing an empty dependency manifest
    Clone { dependency_manifest: Option<String> },
    /// Exit with `code`, reporting `stderr`
    Exit { code: i32, stderr: String },
    /// Exceed the timeout
    Timeout,
}

/// Mock command runner for testing
///
/// Responses are chosen by the first rule whose pattern occurs in the
/// command line. Without a matching rule, `clone` commands behave like a
/// successful clone and everything else succeeds.
///
/// # Example
///
/// ```
/// use provision::di::mocks::{MockCommandRunner, MockResponse};
///
/// let runner = MockCommandRunner::new()
///     .on("clone", MockResponse::Exit { code: 128, stderr: "not found".to_string() });
/// assert!(runner.invocations().is_empty());
/// ```
#[derive(Clone, Default)]
pub struct MockCommandRunner {
    rules: Vec<(String, MockResponse)>,
    invocations: Arc<Mutex<Vec<CommandSpec>>>,
}

impl MockCommandRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(mut self, pattern: &str, response: MockResponse) -> Self {
        self.rules.push((pattern.to_string(), response));
        self
    }

    /// Commands run so far, in order
    pub fn invocations(&self) -> Vec<CommandSpec> {
        lock(&self.invocations).clone()
    }

    fn response_for(&self, spec: &CommandSpec) -> MockResponse {
        let line = spec.display();
        if let Some((_, response)) = self.rules.iter().find(|(p, _)| line.contains(p.as_str())) {
            return response.clone();
        }
        if spec.args.first().map(String::as_str) == Some("clone") {
            MockResponse::Clone {
                dependency_manifest: None,
            }
        } else {
            MockResponse::Success
        }
    }
}

#[async_trait]
impl CommandRunner for MockCommandRunner {
    async fn run(&self, spec: &CommandSpec, timeout: Duration) -> ProvisionResult<CommandOutput> {
        lock(&self.invocations).push(spec.clone());

        match self.response_for(spec) {
            MockResponse::Success => Ok(CommandOutput {
                status: Some(0),
                ..CommandOutput::default()
            }),
            MockResponse::Clone {
                dependency_manifest,
            } => {
                let cwd = spec.cwd.clone().unwrap_or_default();
                let checkout = cwd.join(spec.args.last().map(String::as_str).unwrap_or("checkout"));
                std::fs::create_dir_all(&checkout)?;
                if let Some(name) = dependency_manifest {
                    std::fs::write(checkout.join(name), b"")?;
                }
                Ok(CommandOutput {
                    status: Some(0),
                    ..CommandOutput::default()
                })
            }
            MockResponse::Exit { code, stderr } => Ok(CommandOutput {
                status: Some(code),
                stdout: String::new(),
                stderr,
            }),
            MockResponse::Timeout => Err(ProvisionError::Timeout {
                command: spec.display(),
                seconds: timeout.as_secs(),
            }),
        }
    }
}
