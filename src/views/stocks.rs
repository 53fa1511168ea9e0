use crate::data::{column_label, ColumnConfig, ColumnId, Stock};
use crate::helper::{
    format_currency, format_market_cap, format_percent, format_ratio, format_volume, Sign,
    NOT_AVAILABLE,
};
use crate::views::table::{Align, TableCell, TableColumn, TableModel};

fn min_width(id: ColumnId) -> u16 {
    match id {
        ColumnId::Symbol => 24,
        ColumnId::Price | ColumnId::MarketCap => 14,
        ColumnId::ChangePercent | ColumnId::Volume | ColumnId::PeRatio => 10,
    }
}

fn or_na<T>(value: Option<T>, format: impl FnOnce(T) -> String) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), format)
}

fn cell(stock: &Stock, id: ColumnId) -> TableCell {
    match id {
        ColumnId::Symbol => TableCell::stacked(&stock.symbol, &stock.name),
        ColumnId::Price => TableCell::text(format_currency(stock.price)),
        ColumnId::ChangePercent => {
            TableCell::text(format_percent(stock.change_percent)).with_trend(stock.change_percent.sign())
        }
        ColumnId::Volume => TableCell::text(or_na(stock.volume, format_volume)),
        ColumnId::MarketCap => TableCell::text(or_na(stock.market_cap, format_market_cap)),
        ColumnId::PeRatio => TableCell::text(or_na(stock.pe_ratio, format_ratio)),
    }
}

/// Stock rows in the order of `visible`, labelled from the descriptors
pub fn stock_table(stocks: &[&Stock], visible: &[ColumnId], columns: &[ColumnConfig]) -> TableModel {
    let header = visible
        .iter()
        .map(|&id| {
            let align = if id.is_numeric() {
                Align::Right
            } else {
                Align::Left
            };
            TableColumn::new(column_label(columns, id), align, min_width(id))
        })
        .collect();
    let rows = stocks
        .iter()
        .map(|stock| visible.iter().map(|&id| cell(stock, id)).collect())
        .collect();
    TableModel {
        columns: header,
        rows,
    }
}
