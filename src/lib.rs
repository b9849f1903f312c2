//! bugprompt - turn a bug report into a ready-to-paste prompt
//!
//! This library provides a terminal form that collects a request, related
//! file paths and a problem description, submits them to a prompt endpoint
//! and presents the generated prompt for copying. A non-interactive CLI
//! drives the same form logic.

pub mod api;
pub mod cli;
pub mod core;
pub mod error;
pub mod tui;

pub use error::{BugpromptError, Result};
