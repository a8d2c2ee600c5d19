use ratatui::style::{Color, Modifier, Style};

// Palette, built around the butterfly blue
const SKY: Color = Color::Rgb(32, 139, 254);
const PALE_SKY: Color = Color::Rgb(120, 180, 255);
const LEAF: Color = Color::Rgb(96, 176, 112);
const ALERT: Color = Color::Rgb(224, 80, 80);
const DIM: Color = Color::Rgb(128, 134, 145);
const TEXT: Color = Color::White;
const SELECTION_BG: Color = Color::Rgb(30, 41, 59);
const STATUS_BG: Color = Color::Rgb(22, 30, 42);

/// Share of the post limit at which the counter starts warning
const COUNTER_WARN_RATIO: f32 = 0.9;

pub fn title_style() -> Style {
    Style::default().fg(SKY).add_modifier(Modifier::BOLD)
}

/// List rows, form fields and buttons
pub fn row_style(selected: bool) -> Style {
    if selected {
        Style::default().bg(SELECTION_BG).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(TEXT)
    }
}

pub fn muted_style() -> Style {
    Style::default().fg(DIM)
}

pub fn highlight_style() -> Style {
    Style::default().fg(PALE_SKY)
}

/// Account handles, wherever they appear
pub fn handle_style() -> Style {
    Style::default().fg(PALE_SKY).add_modifier(Modifier::ITALIC)
}

pub fn error_style() -> Style {
    Style::default().fg(ALERT)
}

/// Follow marker on a profile
pub fn follow_style(followed: bool) -> Style {
    if followed {
        Style::default().fg(LEAF)
    } else {
        key_style()
    }
}

/// Compose counter: quiet, then amber near the limit, red past it
pub fn counter_style(length: usize, limit: usize) -> Style {
    if length > limit {
        error_style().add_modifier(Modifier::BOLD)
    } else if length as f32 >= limit as f32 * COUNTER_WARN_RATIO {
        Style::default().fg(Color::Yellow)
    } else {
        muted_style()
    }
}

pub fn nav_style(active: bool) -> Style {
    if active {
        Style::default()
            .fg(SKY)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    } else {
        Style::default().fg(TEXT)
    }
}

pub fn border_style(focused: bool) -> Style {
    Style::default().fg(if focused { SKY } else { DIM })
}

/// Text typed into a search box
pub fn query_style() -> Style {
    Style::default().fg(PALE_SKY)
}

pub fn status_bar_style() -> Style {
    Style::default().bg(STATUS_BG).fg(TEXT)
}

/// Key names in hints and the help overlay
pub fn key_style() -> Style {
    Style::default().fg(PALE_SKY).add_modifier(Modifier::BOLD)
}

pub fn key_desc_style() -> Style {
    Style::default().fg(TEXT)
}
