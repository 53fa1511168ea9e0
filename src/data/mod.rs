mod dashboard;
mod screener;
mod summary;
mod tickers;
mod types;
mod user;

pub use dashboard::*;
pub use screener::*;
pub use summary::*;
pub use tickers::*;
pub use types::*;
pub use user::*;
