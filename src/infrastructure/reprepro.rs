//! reprepro invocation
//!
//! Wraps the external repository-indexing tool behind a narrow trait so the
//! publisher logic can run against a recording fake in tests.

use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::info;

use crate::error::RepositoryError;
use crate::tools::get_tool_path;

/// External package indexer: ingests flat package files into a managed
/// pool and metadata index under the repository base directory.
pub trait PackageIndexer {
    fn include_debs(
        &self,
        base_dir: &Path,
        codename: &str,
        packages: &[PathBuf],
    ) -> Result<(), RepositoryError>;
}

/// reprepro-backed indexer
pub struct Reprepro;

impl PackageIndexer for Reprepro {
    /// Run `reprepro -b <base_dir> includedeb <codename> <packages..>`.
    /// Tool output goes straight to the caller's stdout/stderr; a non-zero
    /// exit propagates as an indexing error.
    fn include_debs(
        &self,
        base_dir: &Path,
        codename: &str,
        packages: &[PathBuf],
    ) -> Result<(), RepositoryError> {
        let reprepro = get_tool_path("reprepro");
        info!(
            "Indexing {} package(s) into {}",
            packages.len(),
            base_dir.display()
        );

        let status = Command::new(&reprepro)
            .arg("-b")
            .arg(base_dir)
            .arg("includedeb")
            .arg(codename)
            .args(packages)
            .status()
            .map_err(|e| RepositoryError::Indexing {
                message: format!("failed to execute {}: {}", reprepro, e),
            })?;

        if !status.success() {
            return Err(RepositoryError::Indexing {
                message: format!("{} exited with {}", reprepro, status),
            });
        }

        Ok(())
    }
}
