//! CLI mode
//!
//! This module contains the CLI mode startup logic.
//! It delegates to the actual CLI implementation.

use crate::cli::Commands;
use crate::config::AppConfig;
use crate::interfaces::cli::{self, CliError};

/// Run a non-server command
pub async fn run_cli(command: Commands, config: &AppConfig) -> Result<(), CliError> {
    match command {
        Commands::User { action } => cli::run_user_command(action, config).await,
        Commands::Config { action } => cli::run_config_command(action).await,
        Commands::Serve => Err(CliError::CommandError(
            "serve is handled by server mode".to_string(),
        )),
    }
}
