//! Result presenter
//!
//! A dismissible overlay holding the generated prompt, with a copy action.
//! While it is open the form behind it is locked: no input, no scrolling.

use std::time::Instant;

use chrono::{DateTime, Local};

use crate::api::ProcessResponse;
use crate::core::notification::{NotificationCenter, Severity};
use crate::error::Result;

pub const COPY_SUCCESS_MESSAGE: &str = "Copied to clipboard!";
pub const COPY_FAILURE_MESSAGE: &str = "Failed to copy to clipboard";

/// Write-text clipboard capability
#[cfg_attr(test, mockall::automock)]
pub trait Clipboard {
    fn set_text(&mut self, text: &str) -> Result<()>;
}

/// System clipboard backed by `arboard`.
///
/// The handle is opened on first use and kept, since some platforms drop
/// the contents when the owning handle goes away.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
    hold: bool,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clipboard for a process that exits right after copying.
    ///
    /// On Linux the writing process serves the selection itself, so each
    /// write blocks until another program takes the clipboard over.
    pub fn holding() -> Self {
        Self {
            inner: None,
            hold: true,
        }
    }

    /// Whether a write blocks until the clipboard is replaced
    pub fn holds_until_replaced(&self) -> bool {
        self.hold && cfg!(target_os = "linux")
    }
}

impl Clipboard for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        if self.inner.is_none() {
            self.inner = Some(arboard::Clipboard::new()?);
        }
        let Some(clipboard) = self.inner.as_mut() else {
            return Ok(());
        };

        #[cfg(target_os = "linux")]
        {
            if self.hold {
                use arboard::SetExtLinux;
                clipboard.set().wait().text(text)?;
                return Ok(());
            }
        }

        clipboard.set_text(text)?;
        Ok(())
    }
}

/// What closed the overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissReason {
    CloseControl,
    Backdrop,
    Escape,
    Teardown,
}

/// The overlay state
#[derive(Debug, Default)]
pub struct ResultPresenter {
    visible: bool,
    content: String,
    /// Server request id shown in the footer
    reference: Option<String>,
    opened_at: Option<DateTime<Local>>,
    scroll: u16,
}

impl ResultPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show `content`
    pub fn open(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.reference = None;
        self.opened_at = Some(Local::now());
        self.scroll = 0;
        self.visible = true;
    }

    /// Show the prompt from an endpoint response
    pub fn open_response(&mut self, response: &ProcessResponse) {
        self.open(response.prompt.clone());
        self.reference = response.request_id.clone();
    }

    pub fn close(&mut self, reason: DismissReason) {
        if self.visible {
            tracing::debug!(?reason, "Closing result overlay");
        }
        self.visible = false;
    }

    pub fn is_open(&self) -> bool {
        self.visible
    }

    /// Whether the page behind the overlay is locked.
    ///
    /// Derived from visibility, so the two can never disagree.
    pub fn locks_background(&self) -> bool {
        self.visible
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    pub fn opened_at(&self) -> Option<DateTime<Local>> {
        self.opened_at
    }

    /// Copy the content to `clipboard` and report the outcome.
    ///
    /// The overlay stays open either way.
    pub fn copy(
        &self,
        clipboard: &mut dyn Clipboard,
        notices: &mut NotificationCenter,
        now: Instant,
    ) -> bool {
        match clipboard.set_text(&self.content) {
            Ok(()) => {
                notices.notify(COPY_SUCCESS_MESSAGE, Severity::Success, now);
                true
            }
            Err(e) => {
                tracing::warn!("Clipboard write failed: {}", e);
                notices.notify(COPY_FAILURE_MESSAGE, Severity::Error, now);
                false
            }
        }
    }

    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    pub fn scroll_down(&mut self, max: u16) {
        self.scroll = self.scroll.saturating_add(1).min(max);
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BugpromptError;

    #[test]
    fn test_open_and_close() {
        let mut presenter = ResultPresenter::new();
        assert!(!presenter.is_open());

        presenter.open("X");
        assert!(presenter.is_open());
        assert!(presenter.locks_background());
        assert_eq!(presenter.content(), "X");
        assert!(presenter.opened_at().is_some());

        for reason in [
            DismissReason::CloseControl,
            DismissReason::Backdrop,
            DismissReason::Escape,
            DismissReason::Teardown,
        ] {
            presenter.open("X");
            presenter.close(reason);
            assert!(!presenter.is_open());
            assert!(!presenter.locks_background());
        }
    }

    #[test]
    fn test_open_response_keeps_reference() {
        let mut presenter = ResultPresenter::new();
        let mut response = ProcessResponse::with_prompt("prompt text");
        response.request_id = Some("req_42".to_string());

        presenter.open_response(&response);
        assert_eq!(presenter.content(), "prompt text");
        assert_eq!(presenter.reference(), Some("req_42"));

        presenter.open("plain");
        assert_eq!(presenter.reference(), None);
    }

    #[test]
    fn test_copy_success_notifies() {
        let mut presenter = ResultPresenter::new();
        presenter.open("X");
        let mut notices = NotificationCenter::new();
        let mut clipboard = MockClipboard::new();
        clipboard
            .expect_set_text()
            .withf(|text| text == "X")
            .times(1)
            .returning(|_| Ok(()));

        assert!(presenter.copy(&mut clipboard, &mut notices, Instant::now()));
        let shown = notices.visible().unwrap();
        assert_eq!(shown.message, COPY_SUCCESS_MESSAGE);
        assert_eq!(shown.severity, Severity::Success);
    }

    #[test]
    fn test_copy_failure_keeps_overlay_open() {
        let mut presenter = ResultPresenter::new();
        presenter.open("X");
        let mut notices = NotificationCenter::new();
        let mut clipboard = MockClipboard::new();
        clipboard
            .expect_set_text()
            .times(1)
            .returning(|_| Err(BugpromptError::Clipboard("no display".into())));

        assert!(!presenter.copy(&mut clipboard, &mut notices, Instant::now()));
        assert!(presenter.is_open());
        let shown = notices.visible().unwrap();
        assert_eq!(shown.message, COPY_FAILURE_MESSAGE);
        assert_eq!(shown.severity, Severity::Error);
    }

    #[test]
    fn test_only_holding_clipboard_waits() {
        assert!(!SystemClipboard::new().holds_until_replaced());
        assert_eq!(
            SystemClipboard::holding().holds_until_replaced(),
            cfg!(target_os = "linux")
        );
    }

    #[test]
    fn test_scroll_is_clamped_and_reset() {
        let mut presenter = ResultPresenter::new();
        presenter.open("a\nb\nc");
        presenter.scroll_up();
        assert_eq!(presenter.scroll(), 0);
        for _ in 0..5 {
            presenter.scroll_down(2);
        }
        assert_eq!(presenter.scroll(), 2);

        presenter.open("again");
        assert_eq!(presenter.scroll(), 0);
    }
}
