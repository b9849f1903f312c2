//! Page-level container
//!
//! Composes the form controller, the result presenter and the notification
//! center. Each component owns its own state; the session only routes.

use std::time::Instant;

use crate::api::ProcessResponse;
use crate::core::form::{FormController, FormState, SubmissionTicket};
use crate::core::notification::NotificationCenter;
use crate::core::presenter::{Clipboard, DismissReason, ResultPresenter};
use crate::error::Result;

#[derive(Debug, Default)]
pub struct Session {
    pub form: FormController,
    pub presenter: ResultPresenter,
    pub notices: NotificationCenter,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and, if the form is complete, start a submission
    pub fn submit(&mut self, now: Instant) -> Option<(SubmissionTicket, FormState)> {
        self.form.submit(&mut self.notices, now)
    }

    /// Apply the endpoint outcome for `ticket`
    pub fn complete_submission(
        &mut self,
        ticket: SubmissionTicket,
        outcome: Result<ProcessResponse>,
        now: Instant,
    ) -> Result<bool> {
        self.form.complete_submission(
            ticket,
            outcome,
            &mut self.presenter,
            &mut self.notices,
            now,
        )
    }

    /// Copy the presented prompt
    pub fn copy_result(&mut self, clipboard: &mut dyn Clipboard, now: Instant) -> bool {
        self.presenter.copy(clipboard, &mut self.notices, now)
    }

    /// Fire due timers
    pub fn tick(&mut self, now: Instant) {
        self.form.poll(now);
        self.notices.tick(now);
    }

    /// Page is going away: release the overlay lock and drop any pending response
    pub fn teardown(&mut self) {
        self.presenter.close(DismissReason::Teardown);
        self.form.abandon_submission();
    }
}
