//! Command implementations, one module per subcommand

pub mod build_number;
pub mod repository;
