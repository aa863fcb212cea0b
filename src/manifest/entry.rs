//! Typed manifest entries and their raw JSON shapes.

use crate::core::path::validate_relative;
use crate::core::{ProvisionError, ProvisionResult};
use serde::Deserialize;
use std::fmt;

/// Model category, deciding which directory under the models root an
/// artifact lands in.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Category {
    #[default]
    Checkpoint,
    Vae,
    Lora,
    ControlNet,
    Embedding,
    /// Unrecognised category, used verbatim as the directory name.
    Other(String),
}

impl Category {
    /// Parse a raw `type` value. Absent or blank values mean `Checkpoint`.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => Category::Checkpoint,
            Some("checkpoints") | Some("checkpoint") => Category::Checkpoint,
            Some("vae") => Category::Vae,
            Some("loras") | Some("lora") => Category::Lora,
            Some("controlnet") => Category::ControlNet,
            Some("embeddings") | Some("embedding") => Category::Embedding,
            Some(other) => Category::Other(other.to_string()),
        }
    }

    /// Directory name under the models root.
    pub fn dir_name(&self) -> &str {
        match self {
            Category::Checkpoint => "checkpoints",
            Category::Vae => "vae",
            Category::Lora => "loras",
            Category::ControlNet => "controlnet",
            Category::Embedding => "embeddings",
            Category::Other(name) => name,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// A model file to fetch from the artifact hub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactEntry {
    pub source_id: String,
    pub file_name: String,
    pub subfolder: Option<String>,
    pub category: Category,
    pub rename_to: Option<String>,
    /// Per-entry revision override; the configured hub revision otherwise.
    pub revision: Option<String>,
    /// Expected SHA-256 of the fetched file, hex encoded.
    pub sha256: Option<String>,
}

impl ArtifactEntry {
    pub fn new(source_id: &str, file_name: &str) -> Self {
        Self {
            source_id: source_id.to_string(),
            file_name: file_name.to_string(),
            subfolder: None,
            category: Category::default(),
            rename_to: None,
            revision: None,
            sha256: None,
        }
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    pub fn with_subfolder(mut self, subfolder: &str) -> Self {
        self.subfolder = Some(subfolder.to_string());
        self
    }

    pub fn with_rename(mut self, rename_to: &str) -> Self {
        self.rename_to = Some(rename_to.to_string());
        self
    }

    pub fn with_sha256(mut self, sha256: &str) -> Self {
        self.sha256 = Some(sha256.to_string());
        self
    }

    /// On-disk file name: `rename_to` when set, `file_name` otherwise.
    pub fn final_name(&self) -> &str {
        self.rename_to.as_deref().unwrap_or(&self.file_name)
    }
}

/// Artifact entry exactly as it appears in `models.json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawArtifactEntry {
    pub repo_id: Option<String>,
    pub filename: Option<String>,
    pub subfolder: Option<String>,
    #[serde(rename = "type")]
    pub category: Option<String>,
    pub rename_to: Option<String>,
    pub revision: Option<String>,
    pub sha256: Option<String>,
}

impl TryFrom<RawArtifactEntry> for ArtifactEntry {
    type Error = ProvisionError;

    fn try_from(raw: RawArtifactEntry) -> ProvisionResult<Self> {
        let file_name = non_blank(raw.filename)
            .ok_or_else(|| ProvisionError::Config("missing required field `filename`".to_string()))?;
        let source_id = non_blank(raw.repo_id)
            .ok_or_else(|| ProvisionError::Config("missing required field `repo_id`".to_string()))?;

        let subfolder = non_blank(raw.subfolder);
        if let Some(ref subfolder) = subfolder {
            validate_relative("subfolder", subfolder)?;
        }

        let sha256 = non_blank(raw.sha256).map(|s| s.to_ascii_lowercase());
        if let Some(ref digest) = sha256 {
            if digest.len() != 64 || !digest.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(ProvisionError::Config(format!(
                    "`sha256` must be 64 hex characters, got '{}'",
                    digest
                )));
            }
        }

        Ok(Self {
            source_id,
            file_name,
            subfolder,
            category: Category::parse(raw.category.as_deref()),
            rename_to: non_blank(raw.rename_to),
            revision: non_blank(raw.revision),
            sha256,
        })
    }
}

/// How an extension is obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallKind {
    /// Cloned from a version-control repository.
    Vcs { repository_url: String },
    /// Installed by name through the package installer.
    Package { package_name: String },
}

/// A plugin to install into the extensions root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionEntry {
    pub display_name: String,
    pub kind: InstallKind,
}

impl ExtensionEntry {
    pub fn vcs(display_name: &str, repository_url: &str) -> Self {
        Self {
            display_name: display_name.to_string(),
            kind: InstallKind::Vcs {
                repository_url: repository_url.to_string(),
            },
        }
    }

    pub fn package(display_name: &str, package_name: &str) -> Self {
        Self {
            display_name: display_name.to_string(),
            kind: InstallKind::Package {
                package_name: package_name.to_string(),
            },
        }
    }
}

/// Extension entry exactly as it appears in `nodes.json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawExtensionEntry {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub name: Option<String>,
    pub repo_url: Option<String>,
    pub package_name: Option<String>,
}

impl RawExtensionEntry {
    pub fn label(&self) -> String {
        non_blank(self.name.clone()).unwrap_or_else(|| "Unknown".to_string())
    }
}

impl TryFrom<RawExtensionEntry> for ExtensionEntry {
    type Error = ProvisionError;

    fn try_from(raw: RawExtensionEntry) -> ProvisionResult<Self> {
        let display_name = raw.label();
        let kind = match raw.kind.as_deref().map(str::trim).unwrap_or("git") {
            "git" => InstallKind::Vcs {
                repository_url: non_blank(raw.repo_url).ok_or_else(|| {
                    ProvisionError::Config("missing required field `repo_url`".to_string())
                })?,
            },
            "pip" => InstallKind::Package {
                package_name: non_blank(raw.package_name).ok_or_else(|| {
                    ProvisionError::Config("missing required field `package_name`".to_string())
                })?,
            },
            other => return Err(ProvisionError::UnknownKind(other.to_string())),
        };

        Ok(Self { display_name, kind })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
