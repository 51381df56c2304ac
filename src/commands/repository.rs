//! Package repository publishing
//!
//! Ansible-module-style command: validates a staged repository location,
//! generates the reprepro configuration, ingests the staged packages and
//! reports the public repository path in a JSON result envelope on stdout.

use anyhow::Result;
use glob::glob;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::domain::repository::{self, RepoState, RepositoryType};
use crate::error::RepositoryError;
use crate::infrastructure::reprepro::{PackageIndexer, Reprepro};

/// Single-suite distributions descriptor for reprepro
fn render_distributions(codename: &str) -> String {
    format!(
        "Codename: {}\nComponents: main\nArchitectures: amd64\n",
        codename
    )
}

/// Manages a staged Debian repository under the CI staging root
pub struct DebRepository {
    linux_release: String,
    name: String,
    location: PathBuf,
}

impl DebRepository {
    pub fn new(root: &Path, linux_release: impl Into<String>, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            linux_release: linux_release.into(),
            location: repository::staging_location(root, RepositoryType::Deb, &name),
            name,
        }
    }

    /// Validate the staging location and return the staged packages.
    /// The directory must pre-exist and hold at least one .deb file;
    /// either failure is fatal and happens before any mutation.
    pub fn check_location(&self) -> Result<Vec<PathBuf>, RepositoryError> {
        if !self.location.exists() {
            return Err(RepositoryError::MissingLocation {
                location: self.location.display().to_string(),
            });
        }

        let packages = self.staged_packages()?;
        if packages.is_empty() {
            return Err(RepositoryError::NoPackages {
                location: self.location.display().to_string(),
                extension: RepositoryType::Deb.package_extension().to_string(),
            });
        }

        Ok(packages)
    }

    fn staged_packages(&self) -> Result<Vec<PathBuf>, RepositoryError> {
        let pattern = self.location.join("*.deb");
        let mut packages = Vec::new();
        for entry in glob(&pattern.to_string_lossy())? {
            match entry {
                Ok(path) => packages.push(path),
                Err(e) => return Err(RepositoryError::Io(e.into())),
            }
        }
        Ok(packages)
    }

    /// Build the repository: generate the reprepro configuration, ingest
    /// the staged packages, then remove the originals. The staged files are
    /// only deleted after the indexer reports success - a failed indexing
    /// run must leave them in place.
    pub fn create(&self, indexer: &impl PackageIndexer) -> Result<(), RepositoryError> {
        let packages = self.check_location()?;

        let conf_dir = self.location.join("conf");
        fs::create_dir(&conf_dir)?;
        fs::write(
            conf_dir.join("distributions"),
            render_distributions(&self.linux_release),
        )?;

        indexer.include_debs(&self.location, &self.linux_release, &packages)?;

        // reprepro copied the files into pool/, so clean up what's left
        for package in &packages {
            fs::remove_file(package)?;
        }

        info!(
            "Published {} package(s) for {} at {}",
            packages.len(),
            self.linux_release,
            self.repo_path()
        );

        Ok(())
    }

    /// Remove the staged repository tree (configuration, pool, leftovers).
    /// Idempotent: deleting a repository that does not exist is no change.
    pub fn delete(&self) -> Result<bool, RepositoryError> {
        if !self.location.exists() {
            return Ok(false);
        }
        fs::remove_dir_all(&self.location)?;
        Ok(true)
    }

    /// Public download path; pure function of (type, name)
    pub fn repo_path(&self) -> String {
        repository::public_path(RepositoryType::Deb, &self.name)
    }
}

/// Result envelope reported on stdout, in the shape the calling
/// automation framework expects
#[derive(Debug, Serialize)]
struct ModuleResult {
    changed: bool,
    message: String,
    ansible_facts: Facts,
}

#[derive(Debug, Serialize)]
struct Facts {
    repository_path: String,
}

#[derive(Debug, Serialize)]
struct ModuleFailure {
    failed: bool,
    msg: String,
}

pub fn execute(
    repo_type: String,
    state: String,
    linux_release: String,
    repository: String,
    root: PathBuf,
) -> Result<()> {
    match run(&repo_type, &state, &linux_release, &repository, &root) {
        Ok(result) => {
            println!("{}", serde_json::to_string(&result)?);
            Ok(())
        }
        Err(e) => {
            let failure = ModuleFailure {
                failed: true,
                msg: e.to_string(),
            };
            println!("{}", serde_json::to_string(&failure)?);
            Err(e.into())
        }
    }
}

fn run(
    repo_type: &str,
    state: &str,
    linux_release: &str,
    name: &str,
    root: &Path,
) -> Result<ModuleResult, RepositoryError> {
    let manager = match RepositoryType::from_str(repo_type)? {
        RepositoryType::Deb => DebRepository::new(root, linux_release, name),
        RepositoryType::Rpm => {
            return Err(RepositoryError::Unsupported {
                repo_type: "rpm".to_string(),
            })
        }
    };

    let (changed, message) = match RepoState::from_str(state) {
        RepoState::Present => {
            manager.create(&Reprepro)?;
            (
                true,
                format!("Repository {} published for {}", name, linux_release),
            )
        }
        RepoState::Absent => {
            if manager.delete()? {
                (true, format!("Repository {} removed", name))
            } else {
                (false, format!("Repository {} already absent", name))
            }
        }
    };

    Ok(ModuleResult {
        changed,
        message,
        ansible_facts: Facts {
            repository_path: manager.repo_path(),
        },
    })
}
