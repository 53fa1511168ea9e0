use super::{ColumnConfig, ColumnId, Stock};

/// Case-insensitive substring match over symbol and name.
///
/// A term that is blank after trimming keeps every record in input
/// order; otherwise the untrimmed term is matched.
pub fn filter_stocks<'a>(stocks: &'a [Stock], term: &str) -> Vec<&'a Stock> {
    if term.trim().is_empty() {
        return stocks.iter().collect();
    }
    let term = term.to_lowercase();
    stocks
        .iter()
        .filter(|stock| matches_term(stock, &term))
        .collect()
}

fn matches_term(stock: &Stock, lowercase_term: &str) -> bool {
    stock.symbol.to_lowercase().contains(lowercase_term)
        || stock.name.to_lowercase().contains(lowercase_term)
}

/// Required columns in descriptor order
pub fn required_columns(columns: &[ColumnConfig]) -> Vec<ColumnId> {
    columns
        .iter()
        .filter(|c| !c.optional)
        .map(|c| c.id)
        .collect()
}

/// Search term plus the user-controlled visible-column set
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Screener {
    term: String,
    visible: Vec<ColumnId>,
}

impl Screener {
    /// Start with only the required columns visible
    pub fn new(columns: &[ColumnConfig]) -> Self {
        Self {
            term: String::new(),
            visible: required_columns(columns),
        }
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn set_term(&mut self, term: impl Into<String>) {
        self.term = term.into();
    }

    /// Visible columns in the order they were made visible
    pub fn visible(&self) -> &[ColumnId] {
        &self.visible
    }

    pub fn is_visible(&self, id: ColumnId) -> bool {
        self.visible.contains(&id)
    }

    /// Flip a column's presence, appending it when it becomes visible
    pub fn toggle(&mut self, id: ColumnId) {
        if let Some(pos) = self.visible.iter().position(|v| *v == id) {
            self.visible.remove(pos);
        } else {
            self.visible.push(id);
        }
    }

    pub fn filter<'a>(&self, stocks: &'a [Stock]) -> Vec<&'a Stock> {
        filter_stocks(stocks, &self.term)
    }
}
