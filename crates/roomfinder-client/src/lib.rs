//! Command-line room finder
//!
//! This crate provides the `roomfinder` command-line interface on top of
//! `roomfinder-engine`.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod secret;

pub use cli::Cli;
pub use error::{ClientError, ClientResult};
