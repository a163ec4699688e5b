use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::state::AppState;
use crate::theme::ThemeColors;

use super::truncate;

const ECHO_MAX_WIDTH: usize = 32;

/// Render the status bar (bottom row).
pub fn render(f: &mut Frame, area: Rect, state: &AppState, theme: &ThemeColors) {
    let (dot, dot_color, label) = if state.loading {
        ("◌", theme.warning, "generating")
    } else {
        ("●", theme.accent, "idle")
    };

    let uptime = state.uptime();

    let mut spans = vec![
        Span::styled(" ", Style::default().fg(theme.text_dim)),
        Span::styled(dot, Style::default().fg(dot_color)),
        Span::styled(format!(" {} ", label), Style::default().fg(theme.text_muted)),
    ];

    if let Some(ref echo) = state.last_prompt_echo {
        spans.push(Span::styled("│ ", Style::default().fg(theme.text_dim)));
        spans.push(Span::styled(
            format!("\"{}\" ", truncate(echo, ECHO_MAX_WIDTH)),
            Style::default().fg(theme.primary),
        ));
    }

    spans.push(Span::styled("│ ", Style::default().fg(theme.text_dim)));
    spans.push(Span::styled(uptime, Style::default().fg(theme.text_muted)));

    if let Some(ref notice) = state.notice {
        spans.push(Span::styled(" │ ", Style::default().fg(theme.text_dim)));
        spans.push(Span::styled(notice.clone(), Style::default().fg(theme.warning)));
    }

    if state.show_errors {
        if let Some(ref error) = state.last_error {
            spans.push(Span::styled(" │ ", Style::default().fg(theme.text_dim)));
            spans.push(Span::styled(
                format!("error: {}", error),
                Style::default().fg(theme.error),
            ));
        }
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
