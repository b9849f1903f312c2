//! Main TUI application state and logic

use std::cell::Cell;
use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, KeyCode, KeyEvent, KeyModifiers, MouseButton,
    MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::prelude::*;
use ratatui::Terminal;
use tokio::sync::mpsc;

use crate::api::{ProcessResponse, PromptClient};
use crate::core::form::{Field, SubmissionTicket};
use crate::core::presenter::{Clipboard, DismissReason, SystemClipboard};
use crate::core::session::Session;
use crate::error::{BugpromptError, Result};
use crate::tui::event::{is_quit_key, is_submit_key, AppEvent, EventHandler};
use crate::tui::ui;

/// Tick rate; bounds how late a debounce or auto-dismiss can fire
const TICK_RATE: Duration = Duration::from_millis(50);

/// Message type for async operation results
#[derive(Debug)]
pub enum AsyncMessage {
    /// The endpoint answered (or the request failed) for a submission
    SubmissionFinished {
        ticket: SubmissionTicket,
        outcome: Result<ProcessResponse>,
    },
}

/// Focusable element of the form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Field(Field),
    FilePath(usize),
    AddFilePath,
    Submit,
}

/// Button selected in the result overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlayButton {
    #[default]
    Copy,
    Close,
}

/// Main TUI application
pub struct App {
    /// Whether the app is running
    pub running: bool,
    /// Form, result overlay and notifications
    pub session: Session,
    /// Focused form element
    pub focus: Focus,
    /// Whether to show the help overlay
    pub show_help: bool,
    /// Selected overlay button
    pub overlay_button: OverlayButton,
    /// Tick counter for spinner animation
    pub tick_counter: u64,
    /// Vertical scroll of the form (adjusted during render to follow focus)
    pub form_scroll: Cell<u16>,
    /// Focus at the last render; the form only re-follows focus when it moves
    pub rendered_focus: Cell<Option<Focus>>,
    /// Maximum scroll position for the result overlay (updated during render)
    pub presenter_max_scroll: Cell<u16>,
    /// Where the result overlay was last drawn, for backdrop clicks
    pub presenter_area: Cell<Rect>,

    client: PromptClient,
    clipboard: Box<dyn Clipboard>,

    /// Sender for async messages (cloned into tasks)
    pub async_tx: mpsc::Sender<AsyncMessage>,
    /// Receiver for async messages
    pub async_rx: mpsc::Receiver<AsyncMessage>,
}

impl App {
    /// Create a new app instance talking to `client`
    pub fn new(client: PromptClient) -> Self {
        let (async_tx, async_rx) = mpsc::channel(32);

        Self {
            running: true,
            session: Session::new(),
            focus: Focus::Field(Field::Request),
            show_help: false,
            overlay_button: OverlayButton::default(),
            tick_counter: 0,
            form_scroll: Cell::new(0),
            rendered_focus: Cell::new(None),
            presenter_max_scroll: Cell::new(0),
            presenter_area: Cell::new(Rect::default()),
            client,
            clipboard: Box::new(SystemClipboard::new()),
            async_tx,
            async_rx,
        }
    }

    /// Use a different clipboard backend
    pub fn with_clipboard(mut self, clipboard: Box<dyn Clipboard>) -> Self {
        self.clipboard = clipboard;
        self
    }

    pub fn endpoint(&self) -> &str {
        self.client.endpoint().as_str()
    }

    /// Setup terminal for TUI
    fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
        enable_raw_mode().map_err(|e| BugpromptError::Terminal(e.to_string()))?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
            .map_err(|e| BugpromptError::Terminal(e.to_string()))?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend).map_err(|e| BugpromptError::Terminal(e.to_string()))?;
        Ok(terminal)
    }

    /// Restore terminal to normal state
    fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        disable_raw_mode().map_err(|e| BugpromptError::Terminal(e.to_string()))?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )
        .map_err(|e| BugpromptError::Terminal(e.to_string()))?;
        terminal
            .show_cursor()
            .map_err(|e| BugpromptError::Terminal(e.to_string()))?;
        Ok(())
    }

    /// Run the TUI application
    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = Self::setup_terminal()?;
        let result = self.event_loop(&mut terminal).await;

        // Page is going away: the overlay lock is released and any pending
        // response is dropped, whichever way the loop ended
        self.session.teardown();
        Self::restore_terminal(&mut terminal)?;
        result
    }

    async fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        let mut events = EventHandler::new(TICK_RATE);

        while self.running {
            terminal
                .draw(|frame| ui::render(frame, self))
                .map_err(|e| BugpromptError::Terminal(e.to_string()))?;

            // Check for async messages (non-blocking)
            while let Ok(msg) = self.async_rx.try_recv() {
                self.handle_async_message(msg, Instant::now());
            }

            match events.next().await {
                Some(AppEvent::Key(key)) => self.handle_key_event(key, Instant::now()),
                Some(AppEvent::Mouse(mouse)) => self.handle_mouse_event(mouse),
                Some(AppEvent::Resize(_, _)) => {
                    // Terminal resize is handled automatically by ratatui
                }
                Some(AppEvent::Tick) => self.on_tick(Instant::now()),
                None => self.running = false,
            }
        }

        Ok(())
    }

    /// Advance timers and the spinner
    pub fn on_tick(&mut self, now: Instant) {
        self.tick_counter = self.tick_counter.wrapping_add(1);
        self.session.tick(now);
    }

    /// Handle async message from background tasks
    pub fn handle_async_message(&mut self, msg: AsyncMessage, now: Instant) {
        match msg {
            AsyncMessage::SubmissionFinished { ticket, outcome } => {
                match self.session.complete_submission(ticket, outcome, now) {
                    Ok(true) => self.overlay_button = OverlayButton::Copy,
                    Ok(false) => {}
                    // Already logged and notified; the form stays as it was
                    Err(_) => {}
                }
            }
        }
    }

    /// Validate and submit the form in the background
    pub fn submit(&mut self, now: Instant) {
        let Some((ticket, form)) = self.session.submit(now) else {
            if let Some((field, _)) = self.session.form.errors().iter().next() {
                self.focus = Focus::Field(field);
            }
            return;
        };

        let tx = self.async_tx.clone();
        let client = self.client.clone();
        tokio::spawn(async move {
            let outcome = client.process(&form).await;
            let _ = tx
                .send(AsyncMessage::SubmissionFinished { ticket, outcome })
                .await;
        });
    }

    /// Handle a key press
    pub fn handle_key_event(&mut self, key: KeyEvent, now: Instant) {
        if is_quit_key(&key) {
            self.quit();
            return;
        }

        // If help is shown, any key dismisses it
        if self.show_help {
            self.show_help = false;
            return;
        }

        // The overlay captures all input while it is open
        if self.session.presenter.locks_background() {
            self.handle_overlay_key(key, now);
            return;
        }

        self.handle_form_key(key, now);
    }

    fn handle_overlay_key(&mut self, key: KeyEvent, now: Instant) {
        match key.code {
            KeyCode::Esc => self.session.presenter.close(DismissReason::Escape),
            KeyCode::Char('q') | KeyCode::Char('c') => {
                self.session.presenter.close(DismissReason::CloseControl)
            }
            KeyCode::Char('y') => self.copy_result(now),
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Left | KeyCode::Right => {
                self.overlay_button = match self.overlay_button {
                    OverlayButton::Copy => OverlayButton::Close,
                    OverlayButton::Close => OverlayButton::Copy,
                };
            }
            KeyCode::Enter => match self.overlay_button {
                OverlayButton::Copy => self.copy_result(now),
                OverlayButton::Close => self.session.presenter.close(DismissReason::CloseControl),
            },
            KeyCode::Char('j') | KeyCode::Down => {
                let max = self.presenter_max_scroll.get();
                self.session.presenter.scroll_down(max);
            }
            KeyCode::Char('k') | KeyCode::Up => self.session.presenter.scroll_up(),
            _ => {}
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent, now: Instant) {
        if is_submit_key(&key) {
            self.submit(now);
            return;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::F(1) => self.show_help = true,
            KeyCode::Esc => self.session.notices.dismiss(),
            KeyCode::Tab | KeyCode::Down => self.focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.focus_prev(),
            KeyCode::PageDown => self.scroll_form(5),
            KeyCode::PageUp => self.scroll_form(-5),
            KeyCode::Char('n') if ctrl => self.add_file_path(),
            KeyCode::Char('d') if ctrl => self.remove_focused_file_path(),
            KeyCode::Enter => match self.focus {
                Focus::Field(field) if field.is_multiline() => {
                    self.edit_focused(now, |value| value.push('\n'));
                }
                Focus::AddFilePath => self.add_file_path(),
                Focus::Submit => self.submit(now),
                _ => self.focus_next(),
            },
            KeyCode::Backspace => self.edit_focused(now, |value| {
                value.pop();
            }),
            KeyCode::Char(c) if !ctrl => self.edit_focused(now, |value| value.push(c)),
            _ => {}
        }
    }

    /// Handle a mouse event; a click outside the overlay dismisses it
    pub fn handle_mouse_event(&mut self, mouse: MouseEvent) {
        if !self.session.presenter.is_open() {
            return;
        }
        if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
            if !contains(self.presenter_area.get(), mouse.column, mouse.row) {
                self.session.presenter.close(DismissReason::Backdrop);
            }
        }
    }

    fn copy_result(&mut self, now: Instant) {
        self.session.copy_result(self.clipboard.as_mut(), now);
    }

    /// Apply an edit to the focused text input
    fn edit_focused(&mut self, now: Instant, edit: impl FnOnce(&mut String)) {
        let form = &mut self.session.form;
        match self.focus {
            Focus::Field(field) => {
                let mut value = form.state().value(field).to_string();
                edit(&mut value);
                form.update_field(field, value, now);
            }
            Focus::FilePath(index) => {
                if let Some(mut value) = form.state().file_paths().get(index).cloned() {
                    edit(&mut value);
                    form.update_file_path(index, value);
                }
            }
            Focus::AddFilePath | Focus::Submit => {}
        }
    }

    fn add_file_path(&mut self) {
        if self.session.form.add_file_path() {
            self.focus = Focus::FilePath(self.session.form.state().file_paths().len() - 1);
        }
    }

    fn remove_focused_file_path(&mut self) {
        if let Focus::FilePath(index) = self.focus {
            if self.session.form.remove_file_path(index) {
                self.focus = Focus::FilePath(index - 1);
            }
        }
    }

    fn scroll_form(&mut self, delta: i32) {
        if self.session.presenter.locks_background() {
            return;
        }
        let current = i32::from(self.form_scroll.get());
        let next = (current + delta).clamp(0, i32::from(u16::MAX));
        self.form_scroll.set(next as u16);
    }

    /// Focusable elements in display order
    pub fn focus_order(&self) -> Vec<Focus> {
        let form = &self.session.form;
        let mut order = vec![Focus::Field(Field::Request)];
        order.extend((0..form.state().file_paths().len()).map(Focus::FilePath));
        if form.can_add_file_path() {
            order.push(Focus::AddFilePath);
        }
        order.extend([
            Focus::Field(Field::CurrentProblem),
            Focus::Field(Field::BugFilePath),
            Focus::Field(Field::SolutionFilePath),
            Focus::Submit,
        ]);
        order
    }

    fn focus_position(&self, order: &[Focus]) -> usize {
        order.iter().position(|f| *f == self.focus).unwrap_or(0)
    }

    pub fn focus_next(&mut self) {
        let order = self.focus_order();
        let pos = self.focus_position(&order);
        self.focus = order[(pos + 1) % order.len()];
    }

    pub fn focus_prev(&mut self) {
        let order = self.focus_order();
        let pos = self.focus_position(&order);
        self.focus = order[pos.checked_sub(1).unwrap_or(order.len() - 1)];
    }

    /// Quit the application
    pub fn quit(&mut self) {
        self.running = false;
    }
}

fn contains(area: Rect, x: u16, y: u16) -> bool {
    x >= area.x && x < area.x.saturating_add(area.width) && y >= area.y && y < area.y.saturating_add(area.height)
}
