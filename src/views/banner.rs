use ratatui::{layout::Rect, text::Span, widgets::Paragraph, Frame};

use crate::ui::{styles, text::truncate};

/// Banner text for a failed fetch; `stale` when older data is still shown
pub fn message(error: &str, stale: bool) -> String {
    if stale {
        t!("Banner.Stale", error = error)
    } else {
        t!("Banner.Failed", error = error)
    }
}

pub fn render(frame: &mut Frame, rect: Rect, error: &str, stale: bool) {
    let text = truncate(&message(error, stale), usize::from(rect.width));
    frame.render_widget(Paragraph::new(Span::styled(text, styles::error())), rect);
}
