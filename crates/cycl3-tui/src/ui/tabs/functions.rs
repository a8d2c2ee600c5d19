use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use cycl3_core::models::Profile;
use cycl3_core::utils::format_count;

use crate::app::{App, AppState};
use crate::ui::styles;

/// Render the functions view - people search, profile and follow
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5)])
        .split(area);

    render_query_box(frame, app, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(chunks[1]);

    render_actor_list(frame, app, body[0]);
    render_profile(frame, app, body[1]);
}

fn render_query_box(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.state == AppState::FindingActors;
    let cursor = if focused { "▌" } else { "" };

    let line = if app.functions.query.is_empty() && !focused {
        Line::from(Span::styled("Find people...", styles::muted_style()))
    } else {
        Line::from(Span::styled(
            format!("{}{}", app.functions.query, cursor),
            styles::query_style(),
        ))
    };

    let block = Block::default()
        .title(" [/] Search people ")
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused));

    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn render_actor_list(frame: &mut Frame, app: &App, area: Rect) {
    let state = &app.functions;
    let title = if state.busy {
        " People (working...) ".to_string()
    } else {
        format!(" People ({}) ", state.actors.len())
    };

    let mut block = Block::default()
        .title(title)
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(app.state == AppState::Normal));

    // Errors ride on the border so earlier results stay listed
    if let Some(ref error) = state.error {
        block = block.title_bottom(Line::from(Span::styled(format!(" {} ", error), styles::error_style())));
    }

    if state.actors.is_empty() {
        let paragraph = Paragraph::new(Line::from(Span::styled(
            "Search for someone to see results",
            styles::muted_style(),
        )))
        .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = state
        .actors
        .iter()
        .enumerate()
        .map(|(i, actor)| {
            let style = styles::row_style(i == state.selection);
            ListItem::new(Line::from(vec![
                Span::raw(actor.display_name().to_string()),
                Span::styled(format!("  @{}", actor.handle), styles::muted_style()),
            ]))
            .style(style)
        })
        .collect();

    let list = List::new(items).block(block);

    let mut list_state = ListState::default();
    list_state.select(Some(state.selection));

    frame.render_stateful_widget(list, area, &mut list_state);
}

fn profile_lines(profile: &Profile) -> Vec<Line<'static>> {
    let name = profile.display_name.clone().unwrap_or_else(|| profile.handle.clone());
    let mut lines = vec![
        Line::from(Span::styled(name, styles::title_style())),
        Line::from(Span::styled(format!("@{}", profile.handle), styles::handle_style())),
        Line::from(Span::styled(profile.did.clone(), styles::muted_style())),
        Line::from(""),
        Line::from(vec![
            Span::styled(format_count(profile.followers_count), styles::highlight_style()),
            Span::styled(" followers  ", styles::muted_style()),
            Span::styled(format_count(profile.follows_count), styles::highlight_style()),
            Span::styled(" following  ", styles::muted_style()),
            Span::styled(format_count(profile.posts_count), styles::highlight_style()),
            Span::styled(" posts", styles::muted_style()),
        ]),
        Line::from(""),
    ];

    if let Some(ref description) = profile.description {
        lines.extend(description.lines().map(|l| Line::from(l.to_string())));
        lines.push(Line::from(""));
    }

    if profile.is_followed() {
        lines.push(Line::from(Span::styled("✓ Following", styles::follow_style(true))));
    } else {
        lines.push(Line::from(Span::styled("[f] Follow", styles::follow_style(false))));
    }
    lines
}

fn render_profile(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Profile ")
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    let lines = match app.functions.profile {
        Some(ref profile) => profile_lines(profile),
        None if app.functions.selected_actor().is_some() => vec![Line::from(Span::styled(
            "[Enter] show profile",
            styles::muted_style(),
        ))],
        None => Vec::new(),
    };

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}
