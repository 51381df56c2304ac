//! CLI definitions for conveyor
//!
//! This module contains all CLI argument parsing structures using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "conveyor",
    version,
    about = "CI pipeline helpers for container registries and package repositories"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the build number of the currently published "latest" image
    BuildNumber {
        /// Registry address without scheme (e.g. registry.example.com:5000)
        registry: String,

        /// Branch being built (master or R<version>)
        branch: String,

        /// Container image the pipeline publishes
        #[arg(long, env = "BUILD_CONTAINER", default_value = "app")]
        container: String,

        /// Basic-auth user; supplying credentials switches requests to https
        #[arg(long, env = "REGISTRY_USERNAME")]
        username: Option<String>,

        /// Basic-auth password
        #[arg(long, env = "REGISTRY_PASSWORD")]
        password: Option<String>,
    },

    /// Assemble a package repository from staged packages
    Repository {
        /// Repository type (deb or rpm)
        #[arg(long = "type")]
        repo_type: String,

        /// Desired state; "present" creates, anything else deletes
        #[arg(long)]
        state: String,

        /// Target release codename (e.g. bionic)
        #[arg(long)]
        linux_release: String,

        /// Repository name under the staging root
        #[arg(long)]
        repository: String,

        /// Staging root the pipeline drops built packages into
        #[arg(long, env = "CI_REPOS_ROOT", default_value = "/var/www/ci-repos")]
        root: PathBuf,
    },
}
