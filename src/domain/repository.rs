//! Repository domain types
//!
//! Identifies a package repository by (type, name) and derives its on-disk
//! staging location and public download path.

use std::path::{Path, PathBuf};

use crate::error::RepositoryError;

/// Package repository flavors known to the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryType {
    /// Debian packages indexed with reprepro
    Deb,
    /// RPM packages (declared, not yet supported)
    Rpm,
}

impl RepositoryType {
    /// Parse from the module's `type` parameter
    pub fn from_str(s: &str) -> Result<Self, RepositoryError> {
        match s.to_lowercase().as_str() {
            "deb" => Ok(Self::Deb),
            "rpm" => Ok(Self::Rpm),
            other => Err(RepositoryError::UnknownType {
                repo_type: other.to_string(),
            }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deb => "deb",
            Self::Rpm => "rpm",
        }
    }

    /// File extension of the packages this repository ingests
    pub fn package_extension(&self) -> &'static str {
        match self {
            Self::Deb => "deb",
            Self::Rpm => "rpm",
        }
    }
}

/// Desired repository state from the module's `state` parameter.
/// `present` means create; anything else means delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoState {
    Present,
    Absent,
}

impl RepoState {
    pub fn from_str(s: &str) -> Self {
        if s == "present" {
            Self::Present
        } else {
            Self::Absent
        }
    }
}

/// Staging directory for a repository: `<root>/<type>/<name>/`
pub fn staging_location(root: &Path, repo_type: RepositoryType, name: &str) -> PathBuf {
    root.join(repo_type.as_str()).join(name)
}

/// Public download path for a repository: `/ci-repos/<type>/<name>/`.
/// Pure function of (type, name); never touches the filesystem.
pub fn public_path(repo_type: RepositoryType, name: &str) -> String {
    format!("/ci-repos/{}/{}/", repo_type.as_str(), name)
}
