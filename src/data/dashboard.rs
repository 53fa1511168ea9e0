use bevy_ecs::prelude::*;
use time::OffsetDateTime;

use super::{summarize, ColumnConfig, ColumnId, Screener, Stock, Summary};
use crate::api::FetchError;

/// Outcome of the most recent fetch
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ViewState {
    #[default]
    Loading,
    Ready,
    /// Last fetch failed; previously fetched data stays displayed
    Error(String),
}

impl ViewState {
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// Result delivered by the refresh loop
#[derive(Clone, Debug)]
pub enum Update {
    /// Columns and stocks fetched together on entry
    Initial {
        columns: Result<Vec<ColumnConfig>, FetchError>,
        stocks: Result<Vec<Stock>, FetchError>,
    },
    /// One poll tick
    Poll(Result<Vec<Stock>, FetchError>),
    /// Polling gave up after too many consecutive failures
    Stopped { failures: u32 },
}

/// Screener view model, rebuilt every time the screener is entered.
///
/// Only successful responses replace data: a failed poll flips the state to
/// [`ViewState::Error`] and keeps the last stock list on screen.
#[derive(Debug, Default, Resource)]
pub struct Dashboard {
    session: u64,
    state: ViewState,
    columns: Vec<ColumnConfig>,
    stocks: Vec<Stock>,
    screener: Screener,
    last_updated: Option<OffsetDateTime>,
    failures: u32,
    stopped: bool,
}

impl Dashboard {
    pub fn new(session: u64) -> Self {
        Self {
            session,
            ..Self::default()
        }
    }

    /// Identifies the refresh loop allowed to write into this dashboard
    pub fn session(&self) -> u64 {
        self.session
    }

    pub fn apply(&mut self, update: Update, now: OffsetDateTime) {
        match update {
            Update::Initial { columns, stocks } => self.apply_initial(columns, stocks, now),
            Update::Poll(Ok(stocks)) => self.replace_stocks(stocks, now),
            Update::Poll(Err(err)) => self.fail(&err),
            Update::Stopped { failures } => {
                tracing::warn!(session = self.session, failures, "polling stopped");
                self.failures = failures;
                self.stopped = true;
            }
        }
    }

    fn apply_initial(
        &mut self,
        columns: Result<Vec<ColumnConfig>, FetchError>,
        stocks: Result<Vec<Stock>, FetchError>,
        now: OffsetDateTime,
    ) {
        match (columns, stocks) {
            (Ok(columns), Ok(stocks)) => {
                let mut screener = Screener::new(&columns);
                screener.set_term(self.screener.term());
                self.screener = screener;
                self.columns = columns;
                self.replace_stocks(stocks, now);
            }
            (Err(err), _) | (_, Err(err)) => self.fail(&err),
        }
    }

    fn replace_stocks(&mut self, stocks: Vec<Stock>, now: OffsetDateTime) {
        tracing::debug!(session = self.session, count = stocks.len(), "stocks updated");
        self.stocks = stocks;
        self.state = ViewState::Ready;
        self.last_updated = Some(now);
        self.failures = 0;
    }

    fn fail(&mut self, err: &FetchError) {
        self.failures += 1;
        tracing::warn!(
            session = self.session,
            endpoint = %err.endpoint(),
            failures = self.failures,
            error = %err,
            "fetch failed"
        );
        self.state = ViewState::Error(err.to_string());
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn columns(&self) -> &[ColumnConfig] {
        &self.columns
    }

    /// Descriptors the user may hide or show, in descriptor order
    pub fn optional_columns(&self) -> Vec<&ColumnConfig> {
        self.columns.iter().filter(|c| c.optional).collect()
    }

    /// Last successfully fetched list
    pub fn stocks(&self) -> &[Stock] {
        &self.stocks
    }

    pub fn screener(&self) -> &Screener {
        &self.screener
    }

    pub fn set_term(&mut self, term: impl Into<String>) {
        self.screener.set_term(term);
    }

    /// Only optional descriptors can be toggled
    pub fn toggle_column(&mut self, id: ColumnId) -> bool {
        let optional = self.columns.iter().any(|c| c.id == id && c.optional);
        if optional {
            self.screener.toggle(id);
        }
        optional
    }

    pub fn visible_columns(&self) -> &[ColumnId] {
        self.screener.visible()
    }

    pub fn filtered(&self) -> Vec<&Stock> {
        self.screener.filter(&self.stocks)
    }

    pub fn summary(&self) -> Summary<'_> {
        summarize(&self.stocks)
    }

    pub fn last_updated(&self) -> Option<OffsetDateTime> {
        self.last_updated
    }

    /// Consecutive failed fetches since the last success
    pub fn failures(&self) -> u32 {
        self.failures
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Loaded, but the column descriptors never arrived
    pub fn missing_columns(&self) -> bool {
        self.state == ViewState::Ready && self.columns.is_empty()
    }
}
