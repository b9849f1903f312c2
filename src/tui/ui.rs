//! Main UI renderer

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::core::form::{Field, MAX_FILE_PATHS};
use crate::tui::app::{App, Focus, OverlayButton};
use crate::tui::theme::Theme;

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// One vertical slot of the form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Row {
    Field(Field),
    FilePathsHeader,
    FilePath(usize),
    AddFilePath,
    Submit,
}

impl Row {
    fn focus(self) -> Option<Focus> {
        match self {
            Row::Field(field) => Some(Focus::Field(field)),
            Row::FilePath(index) => Some(Focus::FilePath(index)),
            Row::AddFilePath => Some(Focus::AddFilePath),
            Row::Submit => Some(Focus::Submit),
            Row::FilePathsHeader => None,
        }
    }
}

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Form
            Constraint::Length(3), // Status bar
        ])
        .split(frame.area());

    render_header(frame, chunks[0], app);
    render_form(frame, chunks[1], app);
    render_status_bar(frame, chunks[2], app);

    if app.session.presenter.is_open() {
        render_presenter(frame, app);
    }

    // Notifications stay above the overlay
    render_notification(frame, chunks[1], app);

    if app.show_help {
        render_help_overlay(frame);
    }
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let title = format!(" bugprompt │ {} ", app.endpoint());

    let header = Paragraph::new(title)
        .style(Theme::header())
        .block(Block::default().borders(Borders::BOTTOM));

    frame.render_widget(header, area);
}

fn form_rows(app: &App) -> Vec<Row> {
    let form = &app.session.form;
    let mut rows = vec![Row::Field(Field::Request), Row::FilePathsHeader];
    rows.extend((0..form.state().file_paths().len()).map(Row::FilePath));
    if form.can_add_file_path() {
        rows.push(Row::AddFilePath);
    }
    rows.extend([
        Row::Field(Field::CurrentProblem),
        Row::Field(Field::BugFilePath),
        Row::Field(Field::SolutionFilePath),
        Row::Submit,
    ]);
    rows
}

fn row_height(app: &App, row: Row) -> u16 {
    match row {
        Row::Field(field) => {
            let input = if field.is_multiline() { 6 } else { 3 };
            let error = u16::from(app.session.form.errors().contains(field));
            input + error
        }
        Row::FilePathsHeader => 1,
        Row::FilePath(_) | Row::AddFilePath | Row::Submit => 3,
    }
}

fn render_form(frame: &mut Frame, area: Rect, app: &App) {
    let rows = form_rows(app);
    let heights: Vec<u16> = rows.iter().map(|row| row_height(app, *row)).collect();
    let total: u16 = heights.iter().sum();

    // Bring a newly focused row into view, then clamp to the content.
    // Scrolling with an unchanged focus is left alone.
    let mut scroll = app.form_scroll.get();
    if app.rendered_focus.replace(Some(app.focus)) != Some(app.focus) {
        let mut top = 0u16;
        for (row, height) in rows.iter().zip(&heights) {
            if row.focus() == Some(app.focus) {
                if top < scroll {
                    scroll = top;
                } else if top + height > scroll + area.height {
                    scroll = (top + height).saturating_sub(area.height);
                }
                break;
            }
            top += height;
        }
    }
    scroll = scroll.min(total.saturating_sub(area.height));
    app.form_scroll.set(scroll);

    let mut top = 0u16;
    for (row, height) in rows.into_iter().zip(heights) {
        let start = top;
        top += height;
        // Only rows that fit entirely are drawn
        if start < scroll || top > scroll + area.height {
            continue;
        }
        let rect = Rect::new(area.x, area.y + start - scroll, area.width, height);
        render_row(frame, rect, app, row);
    }
}

fn render_row(frame: &mut Frame, area: Rect, app: &App, row: Row) {
    match row {
        Row::Field(field) => render_field(frame, area, app, field),
        Row::FilePathsHeader => {
            let count = app.session.form.state().file_paths().len();
            let header = Paragraph::new(Line::from(vec![
                Span::styled(" File paths ", Theme::header()),
                Span::styled(format!("({}/{})", count, MAX_FILE_PATHS), Theme::muted()),
            ]));
            frame.render_widget(header, area);
        }
        Row::FilePath(index) => render_file_path(frame, area, app, index),
        Row::AddFilePath => {
            let focused = app.focus == Focus::AddFilePath;
            render_button(frame, area, "+ Add file path", focused);
        }
        Row::Submit => render_submit(frame, area, app),
    }
}

fn border_style(focused: bool, invalid: bool) -> Style {
    if invalid {
        Theme::invalid()
    } else if focused {
        Theme::focused()
    } else {
        Theme::normal()
    }
}

fn render_field(frame: &mut Frame, area: Rect, app: &App, field: Field) {
    let focused = app.focus == Focus::Field(field);
    let error = app.session.form.errors().get(field);
    let value = app.session.form.state().value(field);

    let input_height = area.height - u16::from(error.is_some());
    let input_area = Rect::new(area.x, area.y, area.width, input_height);

    let text = if value.is_empty() && !focused {
        Text::from(Span::styled(format!("Enter {}", field.label().to_lowercase()), Theme::muted()))
    } else if focused {
        Text::raw(format!("{}█", value))
    } else {
        Text::raw(value)
    };

    // Follow the end of long multiline input
    let line_count = text.lines.len() as u16;
    let scroll = line_count.saturating_sub(input_height.saturating_sub(2));

    let input = Paragraph::new(text)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .block(
            Block::default()
                .title(format!(" {} * ", field.label()))
                .borders(Borders::ALL)
                .border_style(border_style(focused, error.is_some())),
        );
    frame.render_widget(input, input_area);

    if let Some(message) = error {
        let error_area = Rect::new(area.x + 1, area.y + input_height, area.width.saturating_sub(1), 1);
        frame.render_widget(Paragraph::new(Span::styled(message, Theme::error_text())), error_area);
    }
}

fn render_file_path(frame: &mut Frame, area: Rect, app: &App, index: usize) {
    let form = &app.session.form;
    let focused = app.focus == Focus::FilePath(index);
    let value = form
        .state()
        .file_paths()
        .get(index)
        .map(String::as_str)
        .unwrap_or_default();

    let title = if form.can_remove_file_path(index) {
        format!(" File {} · Ctrl+D remove ", index + 1)
    } else {
        format!(" File {} ", index + 1)
    };

    let text = if focused {
        Span::raw(format!("{}█", value))
    } else if value.is_empty() {
        Span::styled("path/to/file", Theme::muted())
    } else {
        Span::raw(value)
    };

    let input = Paragraph::new(text).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border_style(focused, false)),
    );
    frame.render_widget(input, area);
}

fn render_button(frame: &mut Frame, area: Rect, label: &str, focused: bool) {
    let style = if focused {
        Theme::button_active()
    } else {
        Theme::normal()
    };
    let width = (label.chars().count() as u16 + 4).min(area.width);
    let button_area = Rect::new(area.x, area.y, width, area.height);
    let button = Paragraph::new(Span::styled(label.to_string(), style))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style(focused, false)),
        );
    frame.render_widget(button, button_area);
}

fn render_submit(frame: &mut Frame, area: Rect, app: &App) {
    let focused = app.focus == Focus::Submit;
    if app.session.form.is_submitting() {
        let frame_index = (app.tick_counter / 2) as usize % SPINNER_FRAMES.len();
        let label = format!("{} Generating...", SPINNER_FRAMES[frame_index]);
        render_button(frame, area, &label, focused);
    } else {
        render_button(frame, area, "Generate prompt", focused);
    }
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let hints = if app.session.presenter.is_open() {
        " y copy │ j/k scroll │ Tab switch button │ c/Esc close "
    } else {
        " Tab next │ Ctrl+S submit │ Ctrl+N add file │ F1 help │ Ctrl+Q quit "
    };

    let status = Paragraph::new(hints)
        .style(Theme::status_bar())
        .block(Block::default().borders(Borders::TOP));

    frame.render_widget(status, area);
}

fn render_notification(frame: &mut Frame, area: Rect, app: &App) {
    let Some(notice) = app.session.notices.visible() else {
        return;
    };

    let width = (notice.message.chars().count() as u16 + 12)
        .min(area.width.saturating_sub(4))
        .max(20)
        .min(area.width);
    let height = 3.min(area.height);
    let toast_area = Rect::new(
        area.x + area.width.saturating_sub(width) / 2,
        area.y + area.height.saturating_sub(height),
        width,
        height,
    );

    let color = Theme::severity(notice.severity);
    let toast = Paragraph::new(Line::from(vec![
        Span::styled(format!("{} ", notice.severity.icon()), Style::default().fg(color)),
        Span::raw(notice.message.clone()),
        Span::styled("  [Esc]", Theme::muted()),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color)),
    )
    .style(Style::default().bg(Color::Black));

    frame.render_widget(Clear, toast_area);
    frame.render_widget(toast, toast_area);
}

/// `pct` percent of a terminal dimension
fn percent(value: u16, pct: u32) -> u16 {
    (u32::from(value) * pct / 100) as u16
}

/// Area of the result overlay within the terminal
pub fn presenter_area(area: Rect) -> Rect {
    let width = percent(area.width, 80).max(40).min(area.width);
    let height = percent(area.height, 70).max(12).min(area.height);
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width, height)
}

fn render_presenter(frame: &mut Frame, app: &App) {
    let presenter = &app.session.presenter;
    let popup_area = presenter_area(frame.area());
    app.presenter_area.set(popup_area);

    frame.render_widget(Clear, popup_area);

    let title = match presenter.opened_at() {
        Some(at) => format!(" Generated prompt · {} ", at.format("%H:%M:%S")),
        None => " Generated prompt ".to_string(),
    };
    let outer_block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Theme::SUCCESS))
        .style(Style::default().bg(Color::Black));
    frame.render_widget(outer_block, popup_area);

    let inner_area = popup_area.inner(Margin::new(1, 1));
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),    // Body
            Constraint::Length(1), // Reference / scroll position
            Constraint::Length(3), // Buttons
        ])
        .split(inner_area);

    // Estimate wrapped line count the same way for every frame
    let width = chunks[0].width.max(1) as usize;
    let wrapped_lines: usize = presenter
        .content()
        .split('\n')
        .map(|line| line.chars().count().max(1).div_ceil(width))
        .sum();
    let max_scroll = wrapped_lines.saturating_sub(chunks[0].height as usize) as u16;
    app.presenter_max_scroll.set(max_scroll);
    let scroll = presenter.scroll().min(max_scroll);

    let body = Paragraph::new(presenter.content())
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    frame.render_widget(body, chunks[0]);

    let mut info = Vec::new();
    if let Some(reference) = presenter.reference() {
        info.push(Span::styled(format!("Request {} ", reference), Theme::muted()));
    }
    if max_scroll > 0 {
        info.push(Span::styled(
            format!("[{}/{}] j/k to scroll", scroll + 1, max_scroll + 1),
            Theme::muted(),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(info)), chunks[1]);

    let buttons = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(24), Constraint::Length(12), Constraint::Min(0)])
        .split(chunks[2]);
    render_button(
        frame,
        buttons[0],
        "Copy to clipboard",
        app.overlay_button == OverlayButton::Copy,
    );
    render_button(
        frame,
        buttons[1],
        "Close",
        app.overlay_button == OverlayButton::Close,
    );
}

fn render_help_overlay(frame: &mut Frame) {
    let area = frame.area();

    // Calculate centered popup area (60% width, 70% height)
    let popup_width = percent(area.width, 60).max(44).min(area.width);
    let popup_height = percent(area.height, 70).max(16).min(area.height);
    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;

    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    frame.render_widget(Clear, popup_area);

    let help_lines = [
        ("Tab/↓", "Next field"),
        ("Shift+Tab/↑", "Previous field"),
        ("Enter", "Newline / next field / activate"),
        ("Ctrl+S", "Generate prompt"),
        ("Ctrl+N", "Add file path"),
        ("Ctrl+D", "Remove focused file path"),
        ("PgUp/PgDn", "Scroll form"),
        ("Esc", "Dismiss notification / close result"),
        ("y", "Copy result"),
        ("c", "Close result"),
        ("Ctrl+Q", "Quit"),
    ];

    let text: Vec<Line> = help_lines
        .into_iter()
        .map(|(key, desc)| {
            Line::from(vec![
                Span::styled(format!("  {:12}", key), Style::default().fg(Color::Cyan)),
                Span::raw(desc),
            ])
        })
        .collect();

    let help = Paragraph::new(text)
        .block(
            Block::default()
                .title(" Help ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .style(Style::default().bg(Color::Black));

    frame.render_widget(help, popup_area);
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::{Duration, Instant};

    use ratatui::backend::TestBackend;

    use crate::api::PromptClient;

    fn app() -> App {
        let client =
            PromptClient::new("http://127.0.0.1:9/api/process", Duration::from_secs(1)).unwrap();
        App::new(client)
    }

    fn draw(app: &App) -> String {
        draw_sized(app, 100, 50)
    }

    fn draw_sized(app: &App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_presenter_area_is_centered_inside_terminal() {
        let area = presenter_area(Rect::new(0, 0, 100, 50));
        assert_eq!(area, Rect::new(10, 7, 80, 35));

        let small = presenter_area(Rect::new(0, 0, 30, 10));
        assert_eq!(small, Rect::new(0, 0, 30, 10));
    }

    #[test]
    fn test_overlay_sizes_on_huge_terminals() {
        let area = presenter_area(Rect::new(0, 0, 1000, 1000));
        assert_eq!(area, Rect::new(100, 150, 800, 700));
        assert_eq!(percent(u16::MAX, 80), 52428);
    }

    #[test]
    fn test_page_down_survives_render() {
        let mut app = app();
        for _ in 1..MAX_FILE_PATHS {
            app.session.form.add_file_path();
        }
        draw_sized(&app, 80, 20);
        assert_eq!(app.form_scroll.get(), 0);

        app.handle_key_event(
            crossterm::event::KeyEvent::new(
                crossterm::event::KeyCode::PageDown,
                crossterm::event::KeyModifiers::NONE,
            ),
            Instant::now(),
        );
        draw_sized(&app, 80, 20);
        assert_eq!(app.form_scroll.get(), 5);

        // Moving focus still brings the focused row into view
        app.focus_prev();
        assert_eq!(app.focus, Focus::Submit);
        draw_sized(&app, 80, 20);
        assert_eq!(app.form_scroll.get(), 38);
    }

    #[test]
    fn test_renders_form_labels_and_errors() {
        let mut app = app();
        app.session.submit(Instant::now());
        let screen = draw(&app);

        assert!(screen.contains("Request *"));
        assert!(screen.contains("Current problem is required"));
        assert!(screen.contains("Please fill in all required fields"));
    }

    #[test]
    fn test_render_records_presenter_area() {
        let mut app = app();
        app.session.presenter.open("generated prompt text");
        let screen = draw(&app);

        assert!(screen.contains("generated prompt text"));
        assert!(screen.contains("Copy to clipboard"));
        assert_eq!(app.presenter_area.get(), presenter_area(Rect::new(0, 0, 100, 50)));
    }
}
