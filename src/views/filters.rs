use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::data::{ColumnConfig, Screener};
use crate::ui::styles;
use crate::widgets::TextField;

/// Checkbox label of every optional column, e.g. `[x] Volume`
pub fn column_chips(optional: &[&ColumnConfig], screener: &Screener) -> Vec<String> {
    optional
        .iter()
        .map(|column| {
            let mark = if screener.is_visible(column.id) { 'x' } else { ' ' };
            format!("[{mark}] {}", column.label)
        })
        .collect()
}

/// Search box on the left, column toggles on the right
pub fn render(
    frame: &mut Frame,
    rect: Rect,
    search: &TextField,
    search_focused: bool,
    optional: &[&ColumnConfig],
    screener: &Screener,
    cursor: Option<usize>,
) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(40), Constraint::Min(10)])
        .split(rect);

    search.render(frame, chunks[0], t!("Filters.Search"), search_focused);

    let mut spans = Vec::new();
    for (idx, chip) in column_chips(optional, screener).into_iter().enumerate() {
        if idx > 0 {
            spans.push(Span::raw("  "));
        }
        let style = if cursor == Some(idx) {
            styles::text_selected()
        } else {
            styles::text()
        };
        spans.push(Span::styled(chip, style));
    }
    if spans.is_empty() {
        spans.push(Span::styled(t!("Filters.NoOptional"), styles::dark_gray()));
    }

    let border = if cursor.is_some() {
        styles::border_focused()
    } else {
        styles::border()
    };
    let paragraph = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(t!("Filters.Columns")),
    );
    frame.render_widget(paragraph, chunks[1]);
}
