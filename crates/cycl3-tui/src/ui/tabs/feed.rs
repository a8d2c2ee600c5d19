use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use cycl3_core::models::Post;
use cycl3_core::utils::truncate;

use crate::app::{App, AppState, POST_LENGTH_LIMIT};
use crate::ui::styles;

/// Render the feed view: search, compose, then the timeline
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let error_height = if app.feed.error.is_some() { 1 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),            // Search
            Constraint::Length(5),            // Compose
            Constraint::Length(error_height), // Error line
            Constraint::Min(5),               // Posts
        ])
        .split(area);

    render_search_box(frame, app, chunks[0]);
    render_compose_box(frame, app, chunks[1]);

    if let Some(ref error) = app.feed.error {
        let line = Line::from(Span::styled(format!(" {}", error), styles::error_style()));
        frame.render_widget(Paragraph::new(line), chunks[2]);
    }

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[3]);

    render_post_list(frame, app, body[0]);
    render_post_detail(frame, app.selected_post(), body[1]);
}

fn render_search_box(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.state == AppState::Searching;
    let cursor = if focused { "▌" } else { "" };

    let line = if app.feed.search_term.is_empty() && !focused {
        Line::from(Span::styled("Search posts...", styles::muted_style()))
    } else {
        Line::from(Span::styled(
            format!("{}{}", app.feed.search_term, cursor),
            styles::query_style(),
        ))
    };

    let block = Block::default()
        .title(" [/] Search ")
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused));

    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn render_compose_box(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.state == AppState::Composing;
    let cursor = if focused { "▌" } else { "" };
    let length = app.feed.draft.chars().count();

    let text: Vec<Line> = if app.feed.draft.is_empty() && !focused {
        vec![Line::from(Span::styled("What's on your mind?", styles::muted_style()))]
    } else {
        let mut lines: Vec<Line> = app.feed.draft.split('\n').map(|l| Line::from(l.to_string())).collect();
        if let Some(last) = lines.last_mut() {
            last.spans.push(Span::raw(cursor));
        }
        lines
    };

    let title = if app.posting { " Posting... " } else { " [c] Compose " };

    let block = Block::default()
        .title(title)
        .title_style(styles::muted_style())
        .title_bottom(Line::from(Span::styled(format!(" {}/{} ", length, POST_LENGTH_LIMIT), styles::counter_style(length, POST_LENGTH_LIMIT))).right_aligned())
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused));

    let paragraph = Paragraph::new(text).block(block).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn render_post_list(frame: &mut Frame, app: &App, area: Rect) {
    let posts = app.visible_posts();
    let width = area.width.saturating_sub(4) as usize;

    let title = if app.feed.is_loading() {
        " Timeline (loading...) ".to_string()
    } else if app.feed.search_term.is_empty() {
        format!(" Timeline ({}) ", posts.len())
    } else {
        format!(" Timeline ({} of {}) ", posts.len(), app.feed.posts().len())
    };

    let block = Block::default()
        .title(title)
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(app.state == AppState::Normal));

    if posts.is_empty() {
        let message = if app.feed.is_loading() {
            "Loading posts..."
        } else {
            app.feed.empty_message()
        };
        let paragraph = Paragraph::new(Line::from(Span::styled(message, styles::muted_style())))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = posts
        .iter()
        .enumerate()
        .map(|(i, post)| {
            let style = styles::row_style(i == app.feed_selection);

            let image_marker = if post.has_images() { " [img]" } else { "" };
            let header = Line::from(vec![
                Span::styled(format!("@{}", post.author_handle), styles::handle_style()),
                Span::styled(format!("  {}{}", post.formatted_time(), image_marker), styles::muted_style()),
            ]);
            let first_line = post.text.lines().next().unwrap_or_default();
            let body = Line::from(truncate(first_line, width));

            ListItem::new(vec![header, body]).style(style)
        })
        .collect();

    let list = List::new(items).block(block);

    let mut state = ListState::default();
    state.select(Some(app.feed_selection));

    frame.render_stateful_widget(list, area, &mut state);
}

fn render_post_detail(frame: &mut Frame, selected: Option<&Post>, area: Rect) {
    let block = Block::default()
        .title(" Post ")
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    let Some(post) = selected else {
        frame.render_widget(Paragraph::new("").block(block), area);
        return;
    };

    let mut lines = vec![
        Line::from(Span::styled(post.author_display(), styles::title_style())),
        Line::from(Span::styled(post.formatted_time(), styles::muted_style())),
        Line::from(""),
    ];
    lines.extend(post.text.lines().map(|l| Line::from(l.to_string())));

    if post.has_images() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Images", styles::highlight_style())));
        for image in &post.images {
            lines.push(Line::from(vec![
                Span::styled("  • ", styles::muted_style()),
                Span::raw(image.alt_display().to_string()),
            ]));
        }
        lines.push(Line::from(Span::styled("  [o] open full size", styles::muted_style())));
    }

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}
