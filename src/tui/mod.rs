//! Terminal User Interface module
//!
//! The ratatui page hosting the prompt form, the result overlay and
//! the notification toast.

pub mod app;
pub mod event;
pub mod theme;
pub mod ui;

pub use app::App;
