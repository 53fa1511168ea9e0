use bevy_ecs::prelude::*;
use time::OffsetDateTime;

use super::{Ticker, ViewState};
use crate::api::FetchError;

/// Tickers view model. Loaded once on entry and again on manual refresh.
#[derive(Debug, Default, Resource)]
pub struct TickerBoard {
    session: u64,
    state: ViewState,
    tickers: Vec<Ticker>,
    last_updated: Option<OffsetDateTime>,
}

impl TickerBoard {
    pub fn new(session: u64) -> Self {
        Self {
            session,
            ..Self::default()
        }
    }

    pub fn session(&self) -> u64 {
        self.session
    }

    /// Show the spinner only when there is nothing to keep on screen
    pub fn reloading(&mut self) {
        if self.tickers.is_empty() {
            self.state = ViewState::Loading;
        }
    }

    pub fn apply(&mut self, result: Result<Vec<Ticker>, FetchError>, now: OffsetDateTime) {
        match result {
            Ok(tickers) => {
                tracing::debug!(session = self.session, count = tickers.len(), "tickers updated");
                self.tickers = tickers;
                self.state = ViewState::Ready;
                self.last_updated = Some(now);
            }
            Err(err) => {
                tracing::warn!(session = self.session, error = %err, "tickers fetch failed");
                self.state = ViewState::Error(err.to_string());
            }
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn tickers(&self) -> &[Ticker] {
        &self.tickers
    }

    pub fn last_updated(&self) -> Option<OffsetDateTime> {
        self.last_updated
    }
}

#[cfg(test)]
mod tests {
    use super::TickerBoard;
    use crate::api::{Endpoint, FetchError};
    use crate::data::{Ticker, ViewState};
    use rust_decimal_macros::dec;
    use time::OffsetDateTime;

    fn ticker(name: &str) -> Ticker {
        Ticker {
            ticker: name.to_string(),
            close: dec!(10.5),
            sentiment_label: Some("Bullish".to_string()),
        }
    }

    #[test]
    fn error_keeps_previous_tickers() {
        let mut board = TickerBoard::new(3);
        board.apply(Ok(vec![ticker("AAPL")]), OffsetDateTime::UNIX_EPOCH);
        assert_eq!(board.state(), &ViewState::Ready);

        board.reloading();
        assert_eq!(board.state(), &ViewState::Ready);
        board.apply(
            Err(FetchError::Timeout {
                endpoint: Endpoint::Tickers,
                timeout: std::time::Duration::from_secs(5),
            }),
            OffsetDateTime::UNIX_EPOCH,
        );
        assert_eq!(
            board.state().error(),
            Some("Failed to fetch tickers: no response within 5000ms")
        );
        assert_eq!(board.tickers().len(), 1);
    }

    #[test]
    fn reload_of_empty_board_shows_loading() {
        let mut board = TickerBoard::new(1);
        board.apply(
            Err(FetchError::HttpStatus {
                endpoint: Endpoint::Tickers,
                status: 404,
            }),
            OffsetDateTime::UNIX_EPOCH,
        );
        board.reloading();
        assert!(board.state().is_loading());
    }
}
