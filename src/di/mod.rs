//! Dependency injection infrastructure for Provision
//!
//! The pipeline talks to the artifact hub and to external commands only
//! through the traits in this module, so tests can drive it without network
//! access or child processes.
//!
//! # Example (Testing)
//! ```
//! use provision::di::{ServiceContainer, mocks::*};
//! use std::sync::Arc;
//!
//! let config = Arc::new(MockConfigProvider::rooted(std::path::Path::new("/tmp/provision-doc")));
//! let store = Arc::new(MockArtifactStore::new());
//! let runner = Arc::new(MockCommandRunner::new());
//!
//! let container = ServiceContainer::with_providers(config, store, runner);
//! ```

pub mod container;
pub mod mocks;
pub mod traits;

// Re-export key types
pub use container::ServiceContainer;
pub use traits::{ArtifactStore, CommandRunner, ConfigProvider};
