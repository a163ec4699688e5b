use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::theme::ThemeColors;

pub fn render(f: &mut Frame, area: Rect, theme: &ThemeColors) {
    let heading = Line::from(Span::styled(
        "Image Generator",
        Style::default().fg(theme.primary).add_modifier(Modifier::BOLD),
    ));
    f.render_widget(Paragraph::new(heading).alignment(Alignment::Center), area);
}
