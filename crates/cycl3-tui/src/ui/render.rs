use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use cycl3_core::{AuthStatus, Gate, Route};

use crate::app::{App, AppState, LoginFocus};

use super::styles;
use super::tabs::{feed, functions, messages};

const LOGO: [&str; 3] = [
    "  ╔═╗╦ ╦╔═╗╦  ╔═╗",
    "  ║  ╚╦╝║  ║   ═╣",
    "  ╚═╝ ╩ ╚═╝╩═╝╚═╝",
];

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Length(3), // Navigation
            Constraint::Min(10),   // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_nav_bar(frame, app, chunks[1]);
    render_main_content(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);

    // Render overlays
    if matches!(app.state, AppState::ShowingHelp) {
        render_help_overlay(frame);
    }

    if matches!(app.state, AppState::LoggingIn) {
        render_login_overlay(frame, app);
    }

    if matches!(app.state, AppState::ConfirmingQuit) {
        render_quit_overlay(frame);
    }
}

fn logo_lines(indent: &str) -> Vec<Line<'static>> {
    LOGO.iter()
        .map(|row| Line::from(Span::styled(format!("{}{}", indent, row), styles::title_style())))
        .collect()
}

fn render_title_bar(frame: &mut Frame, _app: &App, area: Rect) {
    let title = "  cycl3";
    let help_hint = "[?] Help";
    let title_len = title.len();

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat(
            area.width
                .saturating_sub(title_len as u16 + help_hint.len() as u16 + 4)
                as usize,
        )),
        Span::styled(help_hint, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(title_line).block(block);
    frame.render_widget(paragraph, area);
}

fn render_nav_bar(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    if app.auth != AuthStatus::Authenticated {
        let paragraph = Paragraph::new(Line::from(Span::styled(" Not signed in", styles::muted_style())))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let handle = format!(" @{}  ", app.handle().unwrap_or_default());

    let views = [
        ("[1] Feed", Route::Feed),
        ("[2] Messages", Route::Messages),
        ("[3] Functions", Route::Functions),
    ];

    let mut spans = vec![Span::styled(handle, styles::handle_style())];
    for (i, (label, route)) in views.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", styles::muted_style()));
        }
        let style = if app.route == *route {
            styles::nav_style(true)
        } else {
            styles::muted_style()
        };
        spans.push(Span::styled(*label, style));
    }

    // Logout sits on the right
    let logout = "[L]ogout";
    let used: usize = spans.iter().map(|s| s.content.chars().count()).sum();
    let padding = (area.width as usize).saturating_sub(used + logout.len() + 2);
    spans.push(Span::raw(" ".repeat(padding)));
    spans.push(Span::styled(logout, styles::muted_style()));

    let paragraph = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(paragraph, area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    match app.gate() {
        Gate::Loading => render_loading(frame, area),
        // Redirects are followed by `App::navigate`; nothing to draw meanwhile
        Gate::Redirect(_) => {}
        Gate::Render(Route::Login) => render_signed_out(frame, area),
        Gate::Render(Route::Feed) => feed::render(frame, app, area),
        Gate::Render(Route::Messages) => messages::render(frame, app, area),
        Gate::Render(Route::Functions) => functions::render(frame, app, area),
    }
}

fn render_loading(frame: &mut Frame, area: Rect) {
    let mut lines = vec![Line::from(""); (area.height / 2) as usize];
    lines.push(Line::from(Span::styled("Loading...", styles::muted_style())));
    let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

fn render_signed_out(frame: &mut Frame, area: Rect) {
    let mut lines = vec![Line::from(""); (area.height / 2) as usize];
    lines.push(Line::from(vec![
        Span::styled("Press ", styles::muted_style()),
        Span::styled("Enter", styles::key_style()),
        Span::styled(" to sign in", styles::muted_style()),
    ]));
    let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let shortcuts = match app.state {
        AppState::Searching => "type to filter | [Enter/Esc] done",
        AppState::Composing => "[Enter] post | [Alt+Enter] newline | [Esc] done",
        AppState::FindingActors => "[Enter] search | [Esc] done",
        _ => match app.route {
            Route::Feed => "[/] search | [c]ompose | [o]pen image | [u]pdate | [q]uit",
            Route::Functions => "[/] find | [Enter] profile | [f]ollow | [q]uit",
            _ => "[q]uit",
        },
    };

    let left_text = match &app.status_message {
        Some(msg) => format!(" {} ", msg),
        None => String::new(),
    };
    let right_text = format!(" {} ", shortcuts);

    let width = area.width as usize;
    let padding_len = width
        .saturating_sub(left_text.chars().count())
        .saturating_sub(right_text.chars().count());
    let status_line = Line::from(vec![
        Span::styled(left_text, styles::muted_style()),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);
    let paragraph = Paragraph::new(status_line).style(styles::status_bar_style());
    frame.render_widget(paragraph, area);
}

fn help_row(key: &'static str, desc: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<10}", key), styles::key_style()),
        Span::styled(desc, styles::key_desc_style()),
    ])
}

fn render_help_overlay(frame: &mut Frame) {
    // Fixed size dialog matching login/quit overlays
    let area = centered_rect_fixed(52, 28, frame.area());

    // Clear the area
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let mut help_text = logo_lines("             ");
    help_text.extend(vec![
        Line::from(Span::styled(
            format!("              version {}", version),
            styles::muted_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(" Navigation", styles::highlight_style())),
        help_row("1-3", "Feed / Messages / Functions"),
        help_row("←/→", "Prev/next view"),
        help_row("↑/↓", "Navigate list"),
        help_row("Esc", "Leave an input box"),
        Line::from(""),
        Line::from(Span::styled(" Feed", styles::highlight_style())),
        help_row("/", "Filter by text or author"),
        help_row("c", "Compose a post"),
        help_row("o", "Open image full size"),
        help_row("u", "Reload timeline"),
        Line::from(""),
        Line::from(Span::styled(" Functions", styles::highlight_style())),
        help_row("/", "Search people"),
        help_row("Enter", "Show profile"),
        help_row("f", "Follow"),
        Line::from(""),
        help_row("L", "Log out"),
        help_row("q", "Quit"),
        Line::from(""),
        Line::from(vec![
            Span::styled("       Press ", styles::muted_style()),
            Span::styled("?", styles::key_style()),
            Span::styled(" or ", styles::muted_style()),
            Span::styled("Esc", styles::key_style()),
            Span::styled(" to close", styles::muted_style()),
        ]),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    let paragraph = Paragraph::new(help_text).block(block);

    frame.render_widget(paragraph, area);
}

/// Render a single form field, masked if needed
fn field_line(label: &'static str, value: &str, focused: bool, masked: bool) -> Line<'static> {
    let style = styles::row_style(focused);
    let shown: String = if masked {
        "*".repeat(value.chars().count().min(22))
    } else {
        let count = value.chars().count();
        // Keep the tail visible while typing long handles
        value.chars().skip(count.saturating_sub(22)).collect()
    };
    let cursor = if focused { "▌" } else { "" };
    Line::from(vec![
        Span::raw("  "),
        Span::styled(label, styles::muted_style()),
        Span::styled(" [", styles::muted_style()),
        Span::styled(format!("{:<22}{}", shown, cursor), style),
        Span::styled("]", styles::muted_style()),
    ])
}

fn render_login_overlay(frame: &mut Frame, app: &App) {
    // Fixed size dialog - compact
    let height = if app.login_error.is_some() { 14 } else { 12 };
    let area = centered_rect_fixed(46, height, frame.area());

    // Clear the area
    frame.render_widget(Clear, area);

    let mut lines = logo_lines("          ");
    lines.push(Line::from(""));

    lines.push(field_line(
        "Handle:  ",
        &app.login_identifier,
        app.login_focus == LoginFocus::Identifier,
        false,
    ));
    lines.push(field_line(
        "Password:",
        &app.login_password,
        app.login_focus == LoginFocus::Password,
        true,
    ));

    // Login button (centered)
    let button_focused = app.login_focus == LoginFocus::Button;
    let button_style = styles::row_style(button_focused);
    lines.push(Line::from(""));
    let label = if button_focused { " ▶ Sign in ◀ " } else { "   Sign in   " };
    lines.push(Line::from(vec![
        Span::raw("              ["),
        Span::styled(label, button_style),
        Span::raw("]"),
    ]));

    // Error message
    if let Some(ref error) = app.login_error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(" {}", error),
            styles::error_style(),
        )));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    let paragraph = Paragraph::new(lines).block(block);

    frame.render_widget(paragraph, area);
}

/// Create a centered rectangle with fixed dimensions
fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

fn render_quit_overlay(frame: &mut Frame) {
    // Fixed size dialog matching login screen
    let area = centered_rect_fixed(46, 10, frame.area());

    // Clear the area
    frame.render_widget(Clear, area);

    let mut lines = logo_lines("          ");
    lines.extend(vec![
        Line::from(""),
        Line::from(Span::styled(
            "   Are you sure you want to quit?",
            styles::highlight_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::key_style()),
            Span::styled(" to quit, ", styles::muted_style()),
            Span::styled("[N]", styles::key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    let paragraph = Paragraph::new(lines).block(block);

    frame.render_widget(paragraph, area);
}
