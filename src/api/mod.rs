//! Prompt endpoint integration
//!
//! The endpoint takes the form as JSON and answers with the generated
//! prompt text.

pub mod client;

pub use client::{PromptClient, ProcessResponse};
