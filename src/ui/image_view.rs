use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::preview::Preview;
use crate::protocol::ImageSource;
use crate::state::AppState;
use crate::theme::ThemeColors;

use super::truncate;

/// Braille spinner frames.
const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Spinner while loading, the image otherwise.
pub fn render(
    f: &mut Frame,
    area: Rect,
    state: &AppState,
    preview: Option<&Preview>,
    theme: &ThemeColors,
) {
    let lines = if state.loading {
        spinner_lines(state, area, theme)
    } else {
        image_lines(&state.image, preview, area, theme)
    };

    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

fn spinner_lines(state: &AppState, area: Rect, theme: &ThemeColors) -> Vec<Line<'static>> {
    let frame = SPINNER_FRAMES[state.spinner_tick % SPINNER_FRAMES.len()];
    let mut lines: Vec<Line<'static>> =
        vec![Line::from(""); (area.height / 2).saturating_sub(1) as usize];
    lines.push(Line::from(Span::styled(
        frame,
        Style::default().fg(theme.primary).add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(Span::styled(
        format!("{}...", state.current_phrase()),
        Style::default().fg(theme.text_muted).add_modifier(Modifier::ITALIC),
    )));
    lines
}

fn image_lines(
    source: &ImageSource,
    preview: Option<&Preview>,
    area: Rect,
    theme: &ThemeColors,
) -> Vec<Line<'static>> {
    let width = area.width as usize;
    let label_style = Style::default().fg(theme.text_muted);

    match source {
        ImageSource::Placeholder(url) => vec![
            Line::from(""),
            Line::from(Span::styled("placeholder image", label_style)),
            Line::from(Span::styled(
                truncate(url, width),
                Style::default().fg(theme.text).add_modifier(Modifier::UNDERLINED),
            )),
        ],
        ImageSource::DataUri { .. } => {
            // Last row is the source label
            let mut lines = preview
                .map(|p| p.lines(area.width, area.height.saturating_sub(1)))
                .unwrap_or_default();

            let mut label = truncate(&source.src(), width);
            if let Some((w, h)) = preview.map(Preview::dimensions) {
                let size = format!(" ({w}x{h})");
                label = format!("{}{size}", truncate(&source.src(), width.saturating_sub(size.len())));
            }
            lines.push(Line::from(Span::styled(label, label_style)));
            lines
        }
    }
}
