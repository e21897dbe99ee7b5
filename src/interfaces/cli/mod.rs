//! CLI interface module
//!
//! Operator commands that work directly against the configured database,
//! without going through the HTTP API.

pub mod commands;

use std::fmt;

use crate::cli::{ConfigCommands, UserCommands};
use crate::config::AppConfig;
use crate::storage::StorageFactory;
use commands::{config_generate, create_user, set_admin, set_limit};

#[derive(Debug)]
pub enum CliError {
    StorageError(String),
    ParseError(String),
    CommandError(String),
}

impl CliError {
    /// Format as simple output
    pub fn format_simple(&self) -> String {
        match self {
            CliError::StorageError(msg) => format!("Storage error: {}", msg),
            CliError::ParseError(msg) => format!("Parse error: {}", msg),
            CliError::CommandError(msg) => format!("Command error: {}", msg),
        }
    }

    /// Format as colored output
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        match self {
            CliError::StorageError(msg) => {
                format!("{} {}", "Storage error:".red().bold(), msg.white())
            }
            CliError::ParseError(msg) => {
                format!("{} {}", "Parse error:".yellow().bold(), msg.white())
            }
            CliError::CommandError(msg) => {
                format!("{} {}", "Command error:".red().bold(), msg.white())
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CliError {}

impl From<crate::errors::UrlVaultError> for CliError {
    fn from(err: crate::errors::UrlVaultError) -> Self {
        use crate::errors::ErrorCategory;
        match err.category() {
            ErrorCategory::Storage => CliError::StorageError(err.to_string()),
            ErrorCategory::Validation => CliError::ParseError(err.to_string()),
            _ => CliError::CommandError(err.to_string()),
        }
    }
}

/// Run a `config` subcommand. None of them need the database.
pub async fn run_config_command(action: ConfigCommands) -> Result<(), CliError> {
    match action {
        ConfigCommands::Generate { output_path, force } => {
            config_generate(output_path, force).await
        }
    }
}

/// Run a `user` subcommand against the configured database
pub async fn run_user_command(action: UserCommands, config: &AppConfig) -> Result<(), CliError> {
    let stores = StorageFactory::create(&config.database)
        .await
        .map_err(|e| CliError::StorageError(e.to_string()))?;

    let result = match action {
        UserCommands::Create {
            user_id,
            password,
            admin,
            limit,
        } => create_user(&stores, config, user_id, password, admin, limit).await,
        UserCommands::SetAdmin { user_id, is_admin } => {
            set_admin(&stores, user_id, is_admin).await
        }
        UserCommands::SetLimit { user_id, url_limit } => {
            set_limit(&stores, user_id, url_limit).await
        }
    };

    stores.close().await;
    result
}
