//! CLI module for bugprompt
//!
//! This module contains all CLI command definitions and handlers using clap.

pub mod commands;
pub mod config;
pub mod submit;

pub use commands::{Cli, Commands};
