pub mod cycle;
pub mod format;
pub mod number;

pub use format::{
    format_currency, format_market_cap, format_percent, format_ratio, format_volume,
    NOT_AVAILABLE,
};
pub use number::Sign;
