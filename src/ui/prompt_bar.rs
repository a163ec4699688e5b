use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::state::AppState;
use crate::theme::ThemeColors;

pub const BUTTON_LABEL: &str = "Generate!";
const BUTTON_WIDTH: u16 = 13;
const PLACEHOLDER: &str = "Enter your prompt";

/// Render the prompt input with the Generate button on its right.
pub fn render(f: &mut Frame, area: Rect, state: &AppState, theme: &ThemeColors) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(10), Constraint::Length(BUTTON_WIDTH)])
        .split(area);

    render_input(f, chunks[0], state, theme);
    render_button(f, chunks[1], state, theme);
}

/// Input with horizontal scrolling so the cursor stays visible.
fn render_input(f: &mut Frame, area: Rect, state: &AppState, theme: &ThemeColors) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.text_dim));

    // 2 borders + 1 space prefix
    let inner_width = area.width.saturating_sub(3) as usize;

    if state.prompt.is_empty() {
        let display_text = Line::from(vec![
            Span::styled(" ", Style::default()),
            Span::styled(" ", Style::default().fg(theme.surface).bg(theme.text)),
            Span::styled(
                PLACEHOLDER,
                Style::default().fg(theme.text_muted).add_modifier(Modifier::ITALIC),
            ),
        ]);
        f.render_widget(Paragraph::new(display_text).block(block), area);
        return;
    }

    // Too narrow for any text inside the borders
    if inner_width == 0 {
        f.render_widget(block, area);
        return;
    }

    let cursor = state.cursor_pos;
    let chars: Vec<char> = state.prompt.chars().collect();
    let total_chars = chars.len();

    let scroll_offset = if cursor < inner_width {
        0
    } else {
        cursor - inner_width + 1
    };

    let visible_end = (scroll_offset + inner_width).min(total_chars);
    let visible: String = chars[scroll_offset.min(visible_end)..visible_end].iter().collect();

    let cursor_in_view = cursor - scroll_offset;
    let before: String = visible.chars().take(cursor_in_view).collect();
    let cursor_char = visible.chars().nth(cursor_in_view).unwrap_or(' ');
    let after: String = visible.chars().skip(cursor_in_view + 1).collect();

    let left_indicator = if scroll_offset > 0 { "…" } else { " " };

    let display_text = Line::from(vec![
        Span::styled(left_indicator, Style::default().fg(theme.text_dim)),
        Span::styled(before, Style::default().fg(theme.text)),
        Span::styled(
            cursor_char.to_string(),
            Style::default().fg(theme.surface).bg(theme.text),
        ),
        Span::styled(after, Style::default().fg(theme.text)),
    ]);

    f.render_widget(Paragraph::new(display_text).block(block), area);
}

/// The button is drawn dimmed while a request is loading, and Enter is ignored.
fn render_button(f: &mut Frame, area: Rect, state: &AppState, theme: &ThemeColors) {
    let (border, label) = if state.loading {
        (
            Style::default().fg(theme.text_dim),
            Style::default().fg(theme.text_dim),
        )
    } else {
        (
            Style::default().fg(theme.primary),
            Style::default().fg(theme.primary).add_modifier(Modifier::BOLD),
        )
    };

    let block = Block::default().borders(Borders::ALL).border_style(border);
    let paragraph = Paragraph::new(Line::from(Span::styled(BUTTON_LABEL, label)))
        .alignment(Alignment::Center)
        .block(block);
    f.render_widget(paragraph, area);
}
