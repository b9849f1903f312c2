//! Form controller
//!
//! Owns the form values, the per-field validation errors and the
//! submission lifecycle. Required fields are re-validated on a trailing
//! debounce after each edit and exhaustively at submit time.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::api::ProcessResponse;
use crate::core::notification::{NotificationCenter, Severity};
use crate::core::presenter::ResultPresenter;
use crate::core::timer::Deadline;
use crate::error::Result;

/// Quiet period after the last edit before a field is validated
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(300);

/// Upper bound on file-path slots
pub const MAX_FILE_PATHS: usize = 10;

/// Notification shown when submit finds blank required fields
pub const INCOMPLETE_FORM_MESSAGE: &str = "Please fill in all required fields";

/// Notification shown when the endpoint returns a prompt
pub const SUBMIT_SUCCESS_MESSAGE: &str = "Request processed successfully";

static CAMEL_BOUNDARY: Lazy<Regex> = Lazy::new(|| Regex::new(r"([a-z0-9])([A-Z])").unwrap());

/// Turn a camel-case key into a sentence-case label (`bugFilePath` → `Bug file path`)
pub fn label_from_key(key: &str) -> String {
    let spaced = CAMEL_BOUNDARY.replace_all(key, "$1 $2").to_lowercase();
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// The four required scalar fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Request,
    CurrentProblem,
    BugFilePath,
    SolutionFilePath,
}

impl Field {
    pub const ALL: [Field; 4] = [
        Field::Request,
        Field::CurrentProblem,
        Field::BugFilePath,
        Field::SolutionFilePath,
    ];

    /// Key used in the request body and in error maps
    pub fn key(&self) -> &'static str {
        match self {
            Field::Request => "request",
            Field::CurrentProblem => "currentProblem",
            Field::BugFilePath => "bugFilePath",
            Field::SolutionFilePath => "solutionFilePath",
        }
    }

    /// Human-readable label derived from the key
    pub fn label(&self) -> String {
        label_from_key(self.key())
    }

    /// Validation message for a blank value
    pub fn required_message(&self) -> String {
        format!("{} is required", self.label())
    }

    /// Whether the field takes multi-line input
    pub fn is_multiline(&self) -> bool {
        matches!(self, Field::Request | Field::CurrentProblem)
    }

    fn slot(self) -> usize {
        self as usize
    }
}

/// Form values. Serializes to the endpoint's request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormState {
    request: String,
    file_paths: Vec<String>,
    current_problem: String,
    bug_file_path: String,
    solution_file_path: String,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            request: String::new(),
            file_paths: vec![String::new()],
            current_problem: String::new(),
            bug_file_path: String::new(),
            solution_file_path: String::new(),
        }
    }
}

impl FormState {
    /// Current value of a required field
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Request => &self.request,
            Field::CurrentProblem => &self.current_problem,
            Field::BugFilePath => &self.bug_file_path,
            Field::SolutionFilePath => &self.solution_file_path,
        }
    }

    fn value_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Request => &mut self.request,
            Field::CurrentProblem => &mut self.current_problem,
            Field::BugFilePath => &mut self.bug_file_path,
            Field::SolutionFilePath => &mut self.solution_file_path,
        }
    }

    /// File-path entries in order, blanks included
    pub fn file_paths(&self) -> &[String] {
        &self.file_paths
    }
}

/// Field → message for every field currently failing validation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<Field, String>);

impl ValidationErrors {
    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }

    /// Messages in field order
    pub fn messages(&self) -> Vec<String> {
        self.0.values().cloned().collect()
    }
}

/// Whether a submission round trip is outstanding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    Submitting,
}

/// Identifies one submission so late responses can be recognised
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionTicket(u64);

/// The form controller
#[derive(Debug, Default)]
pub struct FormController {
    state: FormState,
    errors: ValidationErrors,
    /// One debounce timer per required field, indexed by `Field::slot`
    pending: [Deadline; 4],
    in_flight: Option<SubmissionTicket>,
    next_ticket: u64,
}

impl FormController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn submission_state(&self) -> SubmissionState {
        if self.in_flight.is_some() {
            SubmissionState::Submitting
        } else {
            SubmissionState::Idle
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Set a required field and restart its debounce window
    pub fn update_field(&mut self, field: Field, value: impl Into<String>, now: Instant) {
        *self.state.value_mut(field) = value.into();
        self.pending[field.slot()].arm(now, DEBOUNCE_WINDOW);
    }

    /// Run every debounced validation whose window has elapsed.
    ///
    /// Validation reads the value as it is now, not as it was when scheduled.
    pub fn poll(&mut self, now: Instant) {
        for field in Field::ALL {
            if self.pending[field.slot()].fire(now) {
                self.validate_field(field);
            }
        }
    }

    /// Whether a debounced validation is pending for `field`
    pub fn has_pending_validation(&self, field: Field) -> bool {
        self.pending[field.slot()].is_armed()
    }

    fn validate_field(&mut self, field: Field) {
        if self.state.value(field).trim().is_empty() {
            self.errors.0.insert(field, field.required_message());
        } else {
            self.errors.0.remove(&field);
        }
    }

    /// Validate all required fields now, replacing the error set wholesale.
    ///
    /// Pending debounced validations are cancelled. Returns `true` when the
    /// form is valid.
    pub fn validate_all(&mut self) -> bool {
        for deadline in &mut self.pending {
            deadline.disarm();
        }
        self.errors = ValidationErrors(
            Field::ALL
                .into_iter()
                .filter(|field| self.state.value(*field).trim().is_empty())
                .map(|field| (field, field.required_message()))
                .collect(),
        );
        self.errors.is_empty()
    }

    pub fn can_add_file_path(&self) -> bool {
        self.state.file_paths.len() < MAX_FILE_PATHS
    }

    /// Append a blank file-path slot. No-op at the bound.
    pub fn add_file_path(&mut self) -> bool {
        if !self.can_add_file_path() {
            return false;
        }
        self.state.file_paths.push(String::new());
        true
    }

    /// Replace the entry at `index`. File paths are never validated.
    pub fn update_file_path(&mut self, index: usize, value: impl Into<String>) -> bool {
        match self.state.file_paths.get_mut(index) {
            Some(entry) => {
                *entry = value.into();
                true
            }
            None => false,
        }
    }

    /// The first slot is never removable
    pub fn can_remove_file_path(&self, index: usize) -> bool {
        index > 0 && index < self.state.file_paths.len()
    }

    pub fn remove_file_path(&mut self, index: usize) -> bool {
        if !self.can_remove_file_path(index) {
            return false;
        }
        self.state.file_paths.remove(index);
        true
    }

    /// Start a submission.
    ///
    /// Returns the ticket and request body when a network call must be
    /// issued. Returns `None` while another submission is outstanding, or
    /// after emitting the incomplete-form notification.
    pub fn submit(
        &mut self,
        notices: &mut NotificationCenter,
        now: Instant,
    ) -> Option<(SubmissionTicket, FormState)> {
        if self.in_flight.is_some() {
            tracing::debug!("Submit ignored: a submission is already outstanding");
            return None;
        }

        if !self.validate_all() {
            tracing::info!(invalid = self.errors.len(), "Submit blocked by validation");
            notices.notify(INCOMPLETE_FORM_MESSAGE, Severity::Error, now);
            return None;
        }

        self.next_ticket += 1;
        let ticket = SubmissionTicket(self.next_ticket);
        self.in_flight = Some(ticket);
        tracing::info!(
            file_paths = self.state.file_paths.len(),
            "Submitting form"
        );
        Some((ticket, self.state.clone()))
    }

    /// Apply the endpoint's answer for `ticket`.
    ///
    /// Returns `Ok(true)` when a result was applied and `Ok(false)` when the
    /// ticket is not the outstanding one. A failure is notified and then
    /// handed back to the caller.
    pub fn complete_submission(
        &mut self,
        ticket: SubmissionTicket,
        outcome: Result<ProcessResponse>,
        presenter: &mut ResultPresenter,
        notices: &mut NotificationCenter,
        now: Instant,
    ) -> Result<bool> {
        if self.in_flight != Some(ticket) {
            tracing::warn!(?ticket, "Discarding response for a stale submission");
            return Ok(false);
        }
        self.in_flight = None;

        match outcome {
            Ok(response) => {
                presenter.open_response(&response);
                notices.notify(SUBMIT_SUCCESS_MESSAGE, Severity::Success, now);
                Ok(true)
            }
            Err(err) => {
                tracing::error!("Submission failed: {:?}", err);
                notices.notify(err.notification_message(), Severity::Error, now);
                Err(err)
            }
        }
    }

    /// Forget the outstanding submission; its response will be discarded
    pub fn abandon_submission(&mut self) {
        self.in_flight = None;
    }
}
