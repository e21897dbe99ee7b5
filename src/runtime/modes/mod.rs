//! Mode routing
//!
//! Unified entry points for the two execution modes:
//! - Server mode (HTTP server)
//! - CLI mode (operator commands)

pub mod cli;
pub mod server;

pub use cli::run_cli;
pub use server::run_server;

use crate::cli::Commands;

/// Mode detection result
#[derive(Debug, PartialEq)]
pub enum Mode {
    Server,
    Cli,
}

/// No command, or `serve`, runs the server. Anything else is a CLI command.
pub fn detect_mode(command: Option<&Commands>) -> Mode {
    match command {
        None | Some(Commands::Serve) => Mode::Server,
        Some(_) => Mode::Cli,
    }
}
