//! Provision: declarative model and extension provisioning
//!
//! Reads a manifest of model files and plugins and brings a local tree up to
//! date with it: files are fetched from the artifact hub into per-category
//! directories, plugins are cloned or installed as packages. Entries already
//! present are skipped, and one failing entry never stops the rest.

pub use provision_core::{CredentialStore, ProvisionError, ProvisionResult};

/// Core module re-exported from provision-core.
pub mod core {
    pub use provision_core::core::*;
    pub use provision_core::*;
}

/// Configuration management.
pub mod config;

/// Dependency injection infrastructure.
pub mod di;

/// Artifact hub client.
pub mod hub;

/// Manifest documents and their entries.
pub mod manifest;

/// External command execution.
pub mod process;

/// The provisioning pipeline.
pub mod provision;
