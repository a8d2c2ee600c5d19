use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::ui::styles;

/// Render the messages view. Direct messages are not available yet.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let handle = app.handle().unwrap_or_default();

    let mut lines = vec![Line::from(""); (area.height / 3) as usize];
    lines.push(Line::from(Span::styled("Messages", styles::title_style())));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("No conversations for @{} yet.", handle),
        styles::muted_style(),
    )));

    let block = Block::default()
        .title(" Messages ")
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center).block(block);
    frame.render_widget(paragraph, area);
}
