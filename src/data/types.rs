use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Displayable stock column
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::AsRefStr,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum ColumnId {
    Symbol,
    Price,
    ChangePercent,
    Volume,
    MarketCap,
    PeRatio,
}

impl ColumnId {
    /// Header used when the backend descriptor is unavailable
    pub fn default_label(self) -> &'static str {
        match self {
            Self::Symbol => "Symbol",
            Self::Price => "Price",
            Self::ChangePercent => "Change %",
            Self::Volume => "Volume",
            Self::MarketCap => "Market Cap",
            Self::PeRatio => "P/E Ratio",
        }
    }

    /// Numeric columns are right aligned
    pub fn is_numeric(self) -> bool {
        !matches!(self, Self::Symbol)
    }
}

/// Column descriptor served by `/api/columns`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnConfig {
    pub id: ColumnId,
    pub label: String,
    /// Whether the user may hide the column
    pub optional: bool,
}

/// Quote record served by `/api/stocks`, keyed by `symbol`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stock {
    pub symbol: String,
    pub name: String,
    pub price: Decimal,
    pub change_percent: Decimal,
    pub volume: Option<u64>,
    pub market_cap: Option<u64>,
    pub pe_ratio: Option<Decimal>,
}

/// Record of the `Tickers.GetList` command, a separate schema from [`Stock`]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Ticker {
    pub ticker: String,
    #[serde(rename = "Close")]
    pub close: Decimal,
    #[serde(rename = "Sentiment_Label", default)]
    pub sentiment_label: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct TickerList {
    pub data: Vec<Ticker>,
}

/// Label lookup over the fetched descriptors
pub fn column_label(columns: &[ColumnConfig], id: ColumnId) -> &str {
    columns
        .iter()
        .find(|c| c.id == id)
        .map_or(id.default_label(), |c| c.label.as_str())
}
