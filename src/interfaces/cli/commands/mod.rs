//! CLI command implementations
//!
//! This module re-exports all CLI command functions.

mod config_gen;
mod user_management;

pub use config_gen::*;
pub use user_management::*;
