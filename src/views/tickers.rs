use std::cmp::Ordering;

use bevy_ecs::prelude::*;
use ratatui::{layout::Rect, widgets::TableState, Frame};

use crate::data::{Ticker, TickerBoard};
use crate::helper::{cycle, format_currency, NOT_AVAILABLE};
use crate::views::table::{self, Align, TableCell, TableColumn, TableModel};

/// Colour hint from the free-text sentiment label
fn sentiment_trend(label: &str) -> Ordering {
    let label = label.to_lowercase();
    if label.contains("bull") || label.contains("positive") {
        Ordering::Greater
    } else if label.contains("bear") || label.contains("negative") {
        Ordering::Less
    } else {
        Ordering::Equal
    }
}

pub fn ticker_table(tickers: &[Ticker]) -> TableModel {
    let columns = vec![
        TableColumn::new(t!("Tickers.Ticker"), Align::Left, 12),
        TableColumn::new(t!("Tickers.Close"), Align::Right, 14),
        TableColumn::new(t!("Tickers.Sentiment"), Align::Left, 16),
    ];
    let rows = tickers
        .iter()
        .map(|ticker| {
            let sentiment = ticker.sentiment_label.as_deref().map_or_else(
                || TableCell::text(NOT_AVAILABLE),
                |label| TableCell::text(label).with_trend(sentiment_trend(label)),
            );
            vec![
                TableCell::text(&ticker.ticker),
                TableCell::text(format_currency(ticker.close)),
                sentiment,
            ]
        })
        .collect();
    TableModel { columns, rows }
}

/// Selection state of the tickers table
#[derive(Debug, Default, Resource)]
pub struct TickersUi {
    table: TableState,
}

impl TickersUi {
    pub fn select_prev(&mut self, len: usize) {
        self.table.select(cycle::prev(self.table.selected(), len));
    }

    pub fn select_next(&mut self, len: usize) {
        self.table.select(cycle::next(self.table.selected(), len));
    }

    pub fn selected(&self) -> Option<usize> {
        self.table.selected()
    }

    pub fn render(&mut self, frame: &mut Frame, rect: Rect, board: &TickerBoard) {
        let model = ticker_table(board.tickers());
        self.table
            .select(cycle::clamp(self.table.selected(), model.rows.len()));
        table::render(
            frame,
            rect,
            &model,
            &mut self.table,
            t!("Tickers.Title"),
            t!("Tickers.Empty"),
        );
    }
}
