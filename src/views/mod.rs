pub mod banner;
pub mod cards;
pub mod filters;
pub mod footer;
pub mod help;
pub mod login;
pub mod navbar;
pub mod screener;
pub mod stocks;
pub mod table;
pub mod tickers;

pub use footer::FooterStatus;
pub use login::LoginForm;
pub use screener::{Focus, ScreenerUi};
pub use tickers::TickersUi;
