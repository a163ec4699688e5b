pub mod header;
pub mod image_view;
pub mod prompt_bar;
pub mod status_bar;

use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::Frame;
use unicode_width::UnicodeWidthChar;

use crate::preview::Preview;
use crate::state::AppState;
use crate::theme::ThemeColors;

/// Render the full UI layout.
pub fn render(f: &mut Frame, state: &AppState, preview: Option<&Preview>, theme: &ThemeColors) {
    let size = f.area();

    // Layout: heading, prompt bar, image slot fills the rest, status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // heading
            Constraint::Length(3), // prompt + button
            Constraint::Min(3),    // image slot
            Constraint::Length(1), // status bar
        ])
        .split(size);

    header::render(f, chunks[0], theme);
    prompt_bar::render(f, chunks[1], state, theme);
    image_view::render(f, chunks[2], state, preview, theme);
    status_bar::render(f, chunks[3], state, theme);
}

/// Cut `text` to at most `max_width` terminal columns, marking the cut with an ellipsis.
pub fn truncate(text: &str, max_width: usize) -> String {
    let total: usize = text.chars().map(|c| c.width().unwrap_or(0)).sum();
    if total <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max_width - 1 {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push('…');
    out
}
