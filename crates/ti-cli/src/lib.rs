//! Time range walker CLI library.
//!
//! This crate provides the CLI interface for the time range walker.

mod cli;
pub mod commands;
mod config;

pub use cli::{AggregateArgs, Cli, Commands, RangeArgs};
pub use config::Config;
