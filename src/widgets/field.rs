use ratatui::{
    layout::Rect,
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tui_input::{Input, InputRequest};

use crate::ui::styles;

/// Single-line text input drawn inside a bordered box
#[derive(Clone, Debug, Default)]
pub struct TextField {
    input: Input,
    masked: bool,
}

impl TextField {
    /// Field that renders bullets instead of its value
    pub fn masked() -> Self {
        Self {
            masked: true,
            ..Self::default()
        }
    }

    pub fn value(&self) -> &str {
        self.input.value()
    }

    /// Apply an edit, returning whether the value changed
    pub fn handle(&mut self, request: InputRequest) -> bool {
        self.input.handle(request).is_some_and(|change| change.value)
    }

    pub fn reset(&mut self) {
        self.input.reset();
    }

    pub fn render(&self, frame: &mut Frame, rect: Rect, title: String, focused: bool) {
        let width = usize::from(rect.width.saturating_sub(3));
        let scroll = self.input.visual_scroll(width);
        let text = if self.masked {
            "•".repeat(self.value().chars().count())
        } else {
            self.value().to_string()
        };
        let border = if focused {
            styles::border_focused()
        } else {
            styles::border()
        };
        let paragraph = Paragraph::new(text)
            .scroll((0, u16::try_from(scroll).unwrap_or_default()))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border)
                    .title(title),
            );
        frame.render_widget(paragraph, rect);

        if focused {
            let offset = self.input.visual_cursor().saturating_sub(scroll);
            frame.set_cursor(safe_cursor_x(rect.x, offset), rect.y + 1);
        }
    }
}

fn safe_cursor_x(x: u16, visual_cursor: usize) -> u16 {
    let offset = u16::try_from(visual_cursor).unwrap_or(u16::MAX - 1);
    x.saturating_add(offset).saturating_add(1)
}
