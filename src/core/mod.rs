//! Core functionality for bugprompt
//!
//! This module contains the presentation-independent state machines:
//! - Form controller with debounced validation
//! - Result presenter and clipboard capability
//! - Single-slot notification center
//! - Application configuration

pub mod config;
pub mod form;
pub mod notification;
pub mod presenter;
pub mod session;
pub mod timer;

pub use config::Config;
pub use form::{Field, FormController, FormState, SubmissionState, SubmissionTicket};
pub use notification::{Notification, NotificationCenter, Severity};
pub use presenter::{Clipboard, DismissReason, ResultPresenter, SystemClipboard};
pub use session::Session;
