//! Artifact hub HTTP client implementation

use crate::core::path::ensure_dir;
use crate::core::{ProvisionError, ProvisionResult};
use crate::di::traits::ArtifactStore;
use crate::hub::FetchRequest;
use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::{header, Client as HttpClient};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

const CONNECT_TIMEOUT_SECS: u64 = 30;
const API_TIMEOUT_SECS: u64 = 30;

/// Artifact hub client
///
/// Built once at startup, either anonymous or carrying a token that has
/// already been accepted by the hub.
pub struct HubClient {
    http_client: HttpClient,
    endpoint: String,
    token: Option<String>,
}

impl HubClient {
    /// Create a client that sends no credentials
    pub fn anonymous(endpoint: &str) -> ProvisionResult<Self> {
        Self::build(endpoint, None)
    }

    /// Check `token` against the hub and return a client that presents it
    ///
    /// Fails with `ProvisionError::Auth` if the hub rejects the token or
    /// cannot be reached.
    pub async fn authenticate(endpoint: &str, token: &str) -> ProvisionResult<Self> {
        let client = Self::build(endpoint, Some(token.to_string()))?;
        let url = format!("{}/api/whoami-v2", client.endpoint);

        let response = client
            .http_client
            .get(&url)
            .timeout(Duration::from_secs(API_TIMEOUT_SECS))
            .send()
            .await
            .map_err(|e| ProvisionError::Auth(format!("Failed to reach {}: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(ProvisionError::Auth(format!(
                "Token rejected: HTTP {}",
                response.status()
            )));
        }

        Ok(client)
    }

    fn build(endpoint: &str, token: Option<String>) -> ProvisionResult<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static("provision"),
        );

        if let Some(ref token) = token {
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("Bearer {}", token))
                    .map_err(|e| ProvisionError::Auth(format!("Invalid hub token: {}", e)))?,
            );
        }

        // No overall timeout: model files run to many gigabytes
        let http_client = HttpClient::builder()
            .default_headers(headers)
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| ProvisionError::Transfer(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            token,
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Download URL for a file
    pub fn file_url(&self, request: &FetchRequest) -> String {
        let path = request
            .repo_path()
            .iter()
            .map(|segment| urlencoding::encode(&segment.to_string_lossy()).into_owned())
            .collect::<Vec<_>>()
            .join("/");

        format!(
            "{}/{}/resolve/{}/{}",
            self.endpoint,
            request.source_id,
            urlencoding::encode(&request.revision),
            path
        )
    }

    fn progress_bar(len: Option<u64>, name: &str) -> ProgressBar {
        let pb = match len {
            Some(len) => {
                let pb = ProgressBar::new(len);
                pb.set_style(
                    ProgressStyle::default_bar()
                        .template("  {msg} {bar:40.cyan/blue} {bytes}/{total_bytes} ({eta})")
                        .unwrap_or_else(|_| ProgressStyle::default_bar())
                        .progress_chars("#>-"),
                );
                pb
            }
            None => ProgressBar::new_spinner(),
        };
        pb.set_message(name.to_string());
        pb
    }
}

#[async_trait]
impl ArtifactStore for HubClient {
    async fn fetch(
        &self,
        request: &FetchRequest,
        destination_dir: &Path,
    ) -> ProvisionResult<PathBuf> {
        let destination = destination_dir.join(request.repo_path());
        let parent = destination
            .parent()
            .ok_or_else(|| ProvisionError::Path(format!("Invalid destination {:?}", destination)))?;
        ensure_dir(parent)?;

        let url = self.file_url(request);
        debug!("Fetching {} -> {}", url, destination.display());

        let mut response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| ProvisionError::Transfer(format!("Failed to request {}: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(ProvisionError::Transfer(format!(
                "{} returned HTTP {}",
                url,
                response.status()
            )));
        }

        // Written beside the destination and renamed once complete,
        // so a dropped connection never leaves a file at `destination`
        let mut staged = tempfile::Builder::new()
            .prefix(".download-")
            .tempfile_in(parent)?;

        let pb = Self::progress_bar(response.content_length(), &request.file_name);
        loop {
            let chunk = response.chunk().await.map_err(|e| {
                ProvisionError::Transfer(format!("Transfer of {} interrupted: {}", url, e))
            })?;
            let Some(chunk) = chunk else { break };
            staged.write_all(&chunk)?;
            pb.inc(chunk.len() as u64);
        }
        pb.finish_and_clear();

        staged.flush()?;
        staged
            .persist(&destination)
            .map_err(|e| ProvisionError::Io(e.error))?;

        Ok(destination)
    }
}
