//! Service container for dependency injection

use super::traits::{ArtifactStore, CommandRunner, ConfigProvider};
use crate::config::Config;
use crate::core::ProvisionResult;
use crate::hub::HubClient;
use crate::process::SystemCommandRunner;
use crate::provision::artifact::ArtifactFetcher;
use crate::provision::extension::ExtensionInstaller;
use std::sync::Arc;
use tracing::{info, warn};

/// Service container for dependency injection
///
/// Holds the configuration, the artifact store and the command runner as
/// trait objects, and builds the two acquirers from them.
///
/// # Example (Production)
///
/// ```no_run
/// use provision::config::Config;
/// use provision::di::ServiceContainer;
///
/// # async fn example() -> provision::core::ProvisionResult<()> {
/// let config = Config::load()?;
/// let container = ServiceContainer::new(&config).await?;
/// let fetcher = container.artifact_fetcher();
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ServiceContainer {
    pub config: Arc<dyn ConfigProvider>,
    pub store: Arc<dyn ArtifactStore>,
    pub runner: Arc<dyn CommandRunner>,
}

impl ServiceContainer {
    /// Create a container with production implementations
    ///
    /// When a hub token is available it is checked once here. A rejected
    /// token is logged and the container falls back to anonymous access;
    /// it never fails the run.
    pub async fn new(config: &Config) -> ProvisionResult<Self> {
        let store = match config.resolve_token() {
            Some(token) => {
                println!("🔐 Authenticating with the artifact hub...");
                match HubClient::authenticate(&config.hub_endpoint, &token).await {
                    Ok(client) => {
                        println!("✓ Authenticated with the artifact hub");
                        client
                    }
                    Err(e) => {
                        warn!("Hub authentication failed: {}", e);
                        println!(
                            "⚠ Failed to authenticate with the artifact hub: {} (using anonymous access)",
                            e
                        );
                        HubClient::anonymous(&config.hub_endpoint)?
                    }
                }
            }
            None => {
                info!("No hub token provided - using anonymous access");
                HubClient::anonymous(&config.hub_endpoint)?
            }
        };

        Ok(Self::with_providers(
            Arc::new(config.clone()),
            Arc::new(store),
            Arc::new(SystemCommandRunner),
        ))
    }

    /// Create a container that never presents a token
    ///
    /// Used when only extensions are provisioned.
    pub fn anonymous(config: &Config) -> ProvisionResult<Self> {
        Ok(Self::with_providers(
            Arc::new(config.clone()),
            Arc::new(HubClient::anonymous(&config.hub_endpoint)?),
            Arc::new(SystemCommandRunner),
        ))
    }

    /// Create a container with custom providers (for testing)
    pub fn with_providers(
        config: Arc<dyn ConfigProvider>,
        store: Arc<dyn ArtifactStore>,
        runner: Arc<dyn CommandRunner>,
    ) -> Self {
        Self {
            config,
            store,
            runner,
        }
    }

    pub fn artifact_fetcher(&self) -> ArtifactFetcher {
        ArtifactFetcher::new(self.config.as_ref(), Arc::clone(&self.store))
    }

    pub fn extension_installer(&self) -> ExtensionInstaller {
        ExtensionInstaller::new(self.config.as_ref(), Arc::clone(&self.runner))
    }
}
