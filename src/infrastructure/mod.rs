//! Infrastructure layer - external I/O adapters
//!
//! This module contains all code that interacts with external systems:
//! - Container registry v2 HTTP API
//! - reprepro package indexing

pub mod registry;
pub mod reprepro;
