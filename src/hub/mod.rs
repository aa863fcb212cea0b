//! Artifact hub integration
//!
//! Files are addressed by repository id, revision, optional subfolder and
//! file name, the way the Hugging Face Hub serves them.

pub mod client;

pub use client::HubClient;

use std::path::PathBuf;

/// One file to fetch from the hub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub source_id: String,
    pub file_name: String,
    pub subfolder: Option<String>,
    pub revision: String,
}

impl FetchRequest {
    /// Path of the file inside the repository, which is also where the
    /// store places it below the destination directory.
    pub fn repo_path(&self) -> PathBuf {
        match self.subfolder {
            Some(ref subfolder) => PathBuf::from(subfolder).join(&self.file_name),
            None => PathBuf::from(&self.file_name),
        }
    }
}
