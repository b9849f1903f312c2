//! End-to-end behaviour of the form page against a local endpoint

use std::time::{Duration, Instant};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use bugprompt::api::{ProcessResponse, PromptClient};
use bugprompt::core::form::{DEBOUNCE_WINDOW, SUBMIT_SUCCESS_MESSAGE};
use bugprompt::core::notification::NOTIFICATION_LIFETIME;
use bugprompt::core::{Clipboard, DismissReason, Field, Session, Severity, SubmissionState};
use bugprompt::{BugpromptError, Result};

/// Answer a single HTTP request and hand back what was received
async fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut raw = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            raw.extend_from_slice(&buf[..n]);
            if let Some(end) = raw.windows(4).position(|w| w == b"\r\n\r\n") {
                let headers = String::from_utf8_lossy(&raw[..end]).to_lowercase();
                let content_length = headers
                    .lines()
                    .find_map(|line| line.strip_prefix("content-length:"))
                    .and_then(|value| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if raw.len() >= end + 4 + content_length {
                    break;
                }
            }
        }

        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        let _ = socket.shutdown().await;
        String::from_utf8_lossy(&raw).to_string()
    });

    (format!("http://{}/api/process", addr), handle)
}

fn filled_session(now: Instant) -> Session {
    let mut session = Session::new();
    session.form.update_field(Field::Request, "add caching", now);
    session.form.update_field(Field::CurrentProblem, "cache misses", now);
    session.form.update_field(Field::BugFilePath, "bug.md", now);
    session.form.update_field(Field::SolutionFilePath, "fix.md", now);
    session
}

struct BrokenClipboard;

impl Clipboard for BrokenClipboard {
    fn set_text(&mut self, _text: &str) -> Result<()> {
        Err(BugpromptError::Clipboard("no display".into()))
    }
}

#[derive(Default)]
struct RecordingClipboard(Vec<String>);

impl Clipboard for RecordingClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        self.0.push(text.to_string());
        Ok(())
    }
}

#[test]
fn empty_form_submit_reports_every_missing_field() {
    let now = Instant::now();
    let mut session = Session::new();

    assert!(session.submit(now).is_none());

    assert_eq!(session.form.errors().len(), 4);
    for field in Field::ALL {
        assert!(session.form.errors().contains(field));
    }
    assert_eq!(session.form.submission_state(), SubmissionState::Idle);
    let notice = session.notices.visible().unwrap();
    assert_eq!(notice.message, "Please fill in all required fields");
    assert_eq!(notice.severity, Severity::Error);
}

#[tokio::test]
async fn successful_submission_opens_result() {
    let (url, server) = serve_once("200 OK", r#"{"prompt":"X"}"#).await;
    let client = PromptClient::new(&url, Duration::from_secs(5)).unwrap();
    let now = Instant::now();
    let mut session = filled_session(now);
    session.form.add_file_path();
    session.form.update_file_path(0, "src/lib.rs");

    let (ticket, form) = session.submit(now).unwrap();
    assert_eq!(session.form.submission_state(), SubmissionState::Submitting);

    let outcome = client.process(&form).await;
    assert!(session.complete_submission(ticket, outcome, Instant::now()).unwrap());

    assert!(session.presenter.is_open());
    assert!(session.presenter.locks_background());
    assert_eq!(session.presenter.content(), "X");
    assert_eq!(session.form.submission_state(), SubmissionState::Idle);
    let notice = session.notices.visible().unwrap();
    assert_eq!(notice.message, SUBMIT_SUCCESS_MESSAGE);
    assert_eq!(notice.severity, Severity::Success);

    let raw = server.await.unwrap();
    let body = &raw[raw.find("\r\n\r\n").unwrap() + 4..];
    let json: serde_json::Value = serde_json::from_str(body).unwrap();
    assert_eq!(json["filePaths"], serde_json::json!(["src/lib.rs", ""]));
    assert_eq!(json["request"], "add caching");
    assert_eq!(json["currentProblem"], "cache misses");
    assert_eq!(json["solutionFilePath"], "fix.md");
}

#[tokio::test]
async fn server_error_keeps_form_and_shows_message() {
    let (url, server) =
        serve_once("500 Internal Server Error", r#"{"error":"server exploded"}"#).await;
    let client = PromptClient::new(&url, Duration::from_secs(5)).unwrap();
    let now = Instant::now();
    let mut session = filled_session(now);

    let (ticket, form) = session.submit(now).unwrap();
    let outcome = client.process(&form).await;
    let result = session.complete_submission(ticket, outcome, Instant::now());

    assert!(result.is_err());
    assert_eq!(session.form.submission_state(), SubmissionState::Idle);
    assert!(!session.presenter.is_open());
    assert_eq!(session.form.state().value(Field::Request), "add caching");
    let notice = session.notices.visible().unwrap();
    assert_eq!(notice.message, "server exploded");
    assert_eq!(notice.severity, Severity::Error);
    server.await.unwrap();
}

#[test]
fn failed_copy_keeps_result_open() {
    let now = Instant::now();
    let mut session = Session::new();
    session.presenter.open("X");

    assert!(!session.copy_result(&mut BrokenClipboard, now));

    assert!(session.presenter.is_open());
    let notice = session.notices.visible().unwrap();
    assert_eq!(notice.message, "Failed to copy to clipboard");
    assert_eq!(notice.severity, Severity::Error);
}

#[test]
fn copy_writes_exact_content_and_keeps_result_open() {
    let now = Instant::now();
    let mut session = Session::new();
    session.presenter.open("line one\n  line two\n");
    let mut clipboard = RecordingClipboard::default();

    assert!(session.copy_result(&mut clipboard, now));

    assert_eq!(clipboard.0, vec!["line one\n  line two\n".to_string()]);
    assert!(session.presenter.is_open());
    assert_eq!(session.notices.visible().unwrap().message, "Copied to clipboard!");
}

#[test]
fn debounced_validation_uses_latest_value() {
    let start = Instant::now();
    let mut session = Session::new();

    session.form.update_field(Field::Request, "a", start);
    session.form.update_field(Field::Request, "", start + Duration::from_millis(100));

    // Window restarts on every keystroke
    session.tick(start + DEBOUNCE_WINDOW);
    assert!(!session.form.errors().contains(Field::Request));

    session.tick(start + Duration::from_millis(100) + DEBOUNCE_WINDOW);
    assert_eq!(
        session.form.errors().get(Field::Request),
        Some("Request is required")
    );

    session.form.update_field(Field::Request, "fixed", start + Duration::from_secs(1));
    session.tick(start + Duration::from_secs(2));
    assert!(session.form.errors().is_empty());
}

#[test]
fn notification_expires_and_is_replaced() {
    let start = Instant::now();
    let mut session = Session::new();

    session.submit(start);
    let later = start + Duration::from_millis(2000);
    session.presenter.open("X");
    session.copy_result(&mut RecordingClipboard::default(), later);
    assert_eq!(session.notices.visible().unwrap().message, "Copied to clipboard!");

    // The replacement gets a full lifetime of its own
    session.tick(start + NOTIFICATION_LIFETIME);
    assert!(session.notices.visible().is_some());

    session.tick(later + NOTIFICATION_LIFETIME);
    assert!(session.notices.visible().is_none());
}

#[test]
fn response_after_teardown_is_discarded() {
    let now = Instant::now();
    let mut session = filled_session(now);
    let (ticket, _) = session.submit(now).unwrap();

    session.teardown();
    let applied = session
        .complete_submission(ticket, Ok(ProcessResponse::with_prompt("late")), now)
        .unwrap();

    assert!(!applied);
    assert!(!session.presenter.is_open());
}

#[test]
fn closing_result_releases_background_lock() {
    let mut session = Session::new();
    for reason in [
        DismissReason::CloseControl,
        DismissReason::Backdrop,
        DismissReason::Escape,
    ] {
        session.presenter.open("X");
        assert!(session.presenter.locks_background());
        session.presenter.close(reason);
        assert!(!session.presenter.locks_background());
    }
}
