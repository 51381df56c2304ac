//! Centralized error types for conveyor
//!
//! Uses thiserror for typed errors that can be matched on,
//! while still being compatible with anyhow for propagation.

use thiserror::Error;

/// Container registry errors
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Tag list request for {image} failed: {message}")]
    TagList { image: String, message: String },

    #[error("Manifest request for {image}:{tag} failed: {message}")]
    ManifestRequest {
        image: String,
        tag: String,
        message: String,
    },

    #[error("Manifest for {image}:{tag} has no config digest")]
    MissingDigest { image: String, tag: String },

    #[error("Image matching the ID for the latest tag for container {container} not found")]
    NoMatch { container: String },
}

/// Package repository errors
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Repository directory '{location}' is missing")]
    MissingLocation { location: String },

    #[error("No {extension} packages have been found in {location}")]
    NoPackages { location: String, extension: String },

    #[error("Unknown repository type: {repo_type}")]
    UnknownType { repo_type: String },

    #[error("Repository type '{repo_type}' is not supported yet")]
    Unsupported { repo_type: String },

    #[error("Indexing command failed: {message}")]
    Indexing { message: String },

    #[error("Bad package glob: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
