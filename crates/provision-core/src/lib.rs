//! Core utilities shared by the Provision binary and library.
//!
//! Holds the error taxonomy, well-known paths and keychain-backed credentials.

pub mod core;

pub use crate::core::credentials::CredentialStore;
pub use crate::core::error::{ProvisionError, ProvisionResult};
