//! One-shot submission without the terminal UI

use std::io::{self, Write};
use std::time::Instant;

use crate::api::PromptClient;
use crate::cli::commands::SubmitArgs;
use crate::core::config::Config;
use crate::core::form::{Field, MAX_FILE_PATHS};
use crate::core::presenter::SystemClipboard;
use crate::core::session::Session;
use crate::error::{BugpromptError, Result};

/// Fill a session's form from the command-line arguments
pub fn fill_session(args: &SubmitArgs, now: Instant) -> Result<Session> {
    if args.files.len() > MAX_FILE_PATHS {
        return Err(BugpromptError::InvalidInput(format!(
            "At most {} file paths can be submitted, got {}",
            MAX_FILE_PATHS,
            args.files.len()
        )));
    }

    let mut session = Session::new();
    let form = &mut session.form;
    form.update_field(Field::Request, args.request.as_str(), now);
    form.update_field(Field::CurrentProblem, args.problem.as_str(), now);
    form.update_field(Field::BugFilePath, args.bug_file.as_str(), now);
    form.update_field(Field::SolutionFilePath, args.solution_file.as_str(), now);

    for (index, path) in args.files.iter().enumerate() {
        if index > 0 {
            form.add_file_path();
        }
        form.update_file_path(index, path.as_str());
    }

    Ok(session)
}

/// Handle the submit command
pub async fn handle_submit(args: SubmitArgs, endpoint: Option<&str>) -> Result<()> {
    let config = Config::load()?.with_endpoint_override(endpoint)?;
    let client = PromptClient::from_config(&config)?;

    let now = Instant::now();
    let mut session = fill_session(&args, now)?;

    let Some((ticket, form)) = session.submit(now) else {
        return Err(BugpromptError::Incomplete(session.form.errors().messages()));
    };

    eprintln!("Submitting to {}...", client.endpoint());
    let outcome = client.process(&form).await;
    session.complete_submission(ticket, outcome, Instant::now())?;

    println!("{}", session.presenter.content());
    if let Some(reference) = session.presenter.reference() {
        eprintln!("Request id: {}", reference);
    }

    if args.copy {
        let mut clipboard = SystemClipboard::holding();
        if clipboard.holds_until_replaced() {
            // The prompt must reach a pipe before the copy blocks
            io::stdout().flush()?;
            eprintln!("Holding the prompt on the clipboard until something else is copied...");
        }
        session.copy_result(&mut clipboard, Instant::now());
        if let Some(notice) = session.notices.visible() {
            eprintln!("{} {}", notice.severity.icon(), notice.message);
        }
    }

    Ok(())
}
