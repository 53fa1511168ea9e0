use std::cmp::Ordering;

use ratatui::{
    layout::{Constraint, Rect},
    style::Modifier,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::ui::{styles, text::align_right};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableColumn {
    pub label: String,
    pub align: Align,
    pub width: u16,
}

impl TableColumn {
    /// Width grows to fit the label
    pub fn new(label: impl Into<String>, align: Align, min_width: u16) -> Self {
        let label = label.into();
        let label_width = u16::try_from(crate::ui::text::width(&label)).unwrap_or(u16::MAX);
        Self {
            label,
            align,
            width: min_width.max(label_width),
        }
    }
}

/// One cell; the first line carries the value, further lines are dimmed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableCell {
    pub lines: Vec<String>,
    pub trend: Ordering,
}

impl TableCell {
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            lines: vec![value.into()],
            trend: Ordering::Equal,
        }
    }

    pub fn stacked(value: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            lines: vec![value.into(), detail.into()],
            trend: Ordering::Equal,
        }
    }

    #[must_use]
    pub fn with_trend(mut self, trend: Ordering) -> Self {
        self.trend = trend;
        self
    }

    pub fn value(&self) -> &str {
        self.lines.first().map_or("", String::as_str)
    }
}

/// Source-independent table contents
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TableModel {
    pub columns: Vec<TableColumn>,
    pub rows: Vec<Vec<TableCell>>,
}

impl TableModel {
    pub fn row_height(&self) -> u16 {
        let lines = self
            .rows
            .iter()
            .flatten()
            .map(|cell| cell.lines.len())
            .max()
            .unwrap_or(1);
        u16::try_from(lines).unwrap_or(1).max(1)
    }
}

fn aligned(text: &str, column: &TableColumn) -> String {
    match column.align {
        Align::Left => text.to_string(),
        Align::Right => align_right(text, usize::from(column.width)),
    }
}

pub fn render(
    frame: &mut Frame,
    rect: Rect,
    model: &TableModel,
    state: &mut TableState,
    title: String,
    empty: String,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border())
        .title(format!(" {title} "));

    if model.rows.is_empty() || model.columns.is_empty() {
        let inner = block.inner(rect);
        frame.render_widget(block, rect);
        let area = crate::ui::rect::centered(0, 1, inner);
        frame.render_widget(
            Paragraph::new(Span::styled(empty, styles::dark_gray()))
                .alignment(ratatui::layout::Alignment::Center),
            area,
        );
        return;
    }

    let header = Row::new(
        model
            .columns
            .iter()
            .map(|column| Cell::from(aligned(&column.label, column)).style(styles::header())),
    )
    .bottom_margin(1);

    let height = model.row_height();
    let rows = model.rows.iter().map(|cells| {
        let cells = cells.iter().zip(&model.columns).map(|(cell, column)| {
            let lines = cell.lines.iter().enumerate().map(|(idx, line)| {
                let style = if idx == 0 {
                    styles::up(cell.trend)
                } else {
                    styles::dark_gray()
                };
                Line::from(Span::styled(aligned(line, column), style))
            });
            Cell::from(Text::from(lines.collect::<Vec<_>>()))
        });
        Row::new(cells).height(height)
    });

    let widths: Vec<Constraint> = model
        .columns
        .iter()
        .map(|c| Constraint::Length(c.width))
        .collect();
    let table = Table::new(rows)
        .header(header)
        .block(block)
        .highlight_style(styles::text().add_modifier(Modifier::REVERSED))
        .widths(&widths)
        .column_spacing(2);
    frame.render_stateful_widget(table, rect, state);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_fits_label() {
        assert_eq!(TableColumn::new("Market Cap", Align::Right, 4).width, 10);
        assert_eq!(TableColumn::new("P/E", Align::Right, 8).width, 8);
    }

    #[test]
    fn right_alignment_pads_to_width() {
        let column = TableColumn::new("Price", Align::Right, 8);
        assert_eq!(aligned("$1.00", &column), "   $1.00");
        let column = TableColumn::new("Symbol", Align::Left, 8);
        assert_eq!(aligned("AAPL", &column), "AAPL");
    }

    #[test]
    fn row_height_follows_tallest_cell() {
        let model = TableModel {
            columns: vec![TableColumn::new("A", Align::Left, 4)],
            rows: vec![vec![TableCell::stacked("AAPL", "Apple Inc.")]],
        };
        assert_eq!(model.row_height(), 2);
        assert_eq!(TableModel::default().row_height(), 1);
        assert_eq!(model.rows[0][0].value(), "AAPL");
    }
}
