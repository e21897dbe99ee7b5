//! urlvault - A multi-user URL shortener
//!
//! Authenticated users shorten URLs into random or custom short codes,
//! bounded by a per-user quota. Anyone can follow a code to its target.
//!
//! # Architecture
//! - `services`: code generation, allocation, quota, redirect, accounts and sessions
//! - `storage`: store traits with SeaORM and in-memory backends
//! - `api`: HTTP handlers and middleware
//! - `interfaces`: operator CLI commands
//! - `config`: configuration loading
//! - `runtime`: application lifecycle and execution modes
//! - `system`: logging setup

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
