//! Calendar time grid CLI library.
//!
//! This crate provides the `tg` command-line front end to the layout engine.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands};
pub use config::Config;
