//! Integration tests module
//!
//! Drives the provisioning pipeline end to end through the service
//! container, with the artifact store and command runner mocked.

pub mod common;
pub mod extensions;
pub mod models;
