use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod domain;
mod error;
mod infrastructure;
mod tools;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging with LOGGING env var support
    // LOGGING=debug,info,warn,error or just LOGGING=debug
    let log_level = std::env::var("LOGGING")
        .or_else(|_| std::env::var("LOG_LEVEL"))
        .unwrap_or_else(|_| {
            if cli.verbose {
                "debug".to_string()
            } else {
                "info".to_string()
            }
        });

    // Diagnostics on stderr; stdout is reserved for command output
    // (a bare build number, or the module result envelope)
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::BuildNumber {
            registry,
            branch,
            container,
            username,
            password,
        } => {
            commands::build_number::execute(registry, branch, container, username, password)
                .await?;
        }
        Commands::Repository {
            repo_type,
            state,
            linux_release,
            repository,
            root,
        } => {
            commands::repository::execute(repo_type, state, linux_release, repository, root)?;
        }
    }

    Ok(())
}
