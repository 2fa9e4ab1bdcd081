//! CLI, configuration and output rendering
//!
//! This crate provides the `hearthcal` command-line interface.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod render;

pub use cli::Cli;
pub use config::CliConfig;
pub use error::{CliError, CliResult};
