//! Background fetch tasks feeding the screener and tickers views.
//!
//! Tasks never touch the world directly. Every result travels back to the
//! main loop as a [`CommandQueue`] tagged with the session it was started
//! for; a queue whose session no longer matches the live view model is
//! dropped on the floor.

use std::time::Duration;

use bevy_ecs::{prelude::*, system::CommandQueue};
use futures::future::BoxFuture;
use time::OffsetDateTime;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::api::{ApiClient, FetchError};
use crate::data::{ColumnConfig, Dashboard, Stock, Ticker, TickerBoard, Update};

pub type Sender = mpsc::UnboundedSender<CommandQueue>;

/// Where the screener reads columns and stocks from
pub trait StockSource: Send + Sync + 'static {
    fn columns(&self) -> BoxFuture<'static, Result<Vec<ColumnConfig>, FetchError>>;
    fn stocks(&self) -> BoxFuture<'static, Result<Vec<Stock>, FetchError>>;
}

pub trait TickerSource: Send + Sync + 'static {
    fn tickers(&self) -> BoxFuture<'static, Result<Vec<Ticker>, FetchError>>;
}

impl StockSource for ApiClient {
    fn columns(&self) -> BoxFuture<'static, Result<Vec<ColumnConfig>, FetchError>> {
        let client = self.clone();
        Box::pin(async move { client.fetch_columns().await })
    }

    fn stocks(&self) -> BoxFuture<'static, Result<Vec<Stock>, FetchError>> {
        let client = self.clone();
        Box::pin(async move { client.fetch_stocks().await })
    }
}

impl TickerSource for ApiClient {
    fn tickers(&self) -> BoxFuture<'static, Result<Vec<Ticker>, FetchError>> {
        let client = self.clone();
        Box::pin(async move { client.fetch_tickers().await })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollSettings {
    pub interval: Duration,
    /// Consecutive failures before polling stops, 0 never stops
    pub max_failures: u32,
}

impl PollSettings {
    fn exhausted(self, failures: u32) -> bool {
        self.max_failures > 0 && failures >= self.max_failures
    }
}

/// Owned background task, aborted when cancelled or dropped
#[derive(Debug)]
pub struct TaskHandle(JoinHandle<()>);

impl TaskHandle {
    pub fn cancel(&self) {
        self.0.abort();
    }
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Initial load followed by periodic stock polling
pub fn spawn_screener<S: StockSource>(
    rt: &Handle,
    source: S,
    session: u64,
    settings: PollSettings,
    tx: Sender,
) -> TaskHandle {
    tracing::info!(session, interval = ?settings.interval, max_failures = settings.max_failures, "screener polling started");
    TaskHandle(rt.spawn(poll_stocks(source, session, settings, tx)))
}

/// One-shot tickers load
pub fn spawn_tickers<S: TickerSource>(rt: &Handle, source: S, session: u64, tx: Sender) -> TaskHandle {
    TaskHandle(rt.spawn(async move {
        let result = source.tickers().await;
        send(&tx, move |world| {
            let Some(mut board) = world.get_resource_mut::<TickerBoard>() else {
                return;
            };
            if board.session() == session {
                board.apply(result, OffsetDateTime::now_utc());
            } else {
                tracing::debug!(session, "dropping tickers for stale session");
            }
        });
    }))
}

async fn poll_stocks<S: StockSource>(source: S, session: u64, settings: PollSettings, tx: Sender) {
    let (columns, stocks) = tokio::join!(source.columns(), source.stocks());
    let mut failures = u32::from(columns.is_err() || stocks.is_err());
    if !send_update(&tx, session, Update::Initial { columns, stocks }) {
        return;
    }

    // Sequential: a slow response delays the next tick rather than overlapping it.
    let mut ticker = interval_at(Instant::now() + settings.interval, settings.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    while !settings.exhausted(failures) {
        ticker.tick().await;
        let result = source.stocks().await;
        failures = if result.is_ok() { 0 } else { failures + 1 };
        if !send_update(&tx, session, Update::Poll(result)) {
            return;
        }
    }

    send_update(&tx, session, Update::Stopped { failures });
}

fn send_update(tx: &Sender, session: u64, update: Update) -> bool {
    send(tx, move |world| {
        let Some(mut dashboard) = world.get_resource_mut::<Dashboard>() else {
            return;
        };
        if dashboard.session() == session {
            dashboard.apply(update, OffsetDateTime::now_utc());
        } else {
            tracing::debug!(session, "dropping update for stale session");
        }
    })
}

fn send(tx: &Sender, apply: impl FnOnce(&mut World) + Send + 'static) -> bool {
    let mut queue = CommandQueue::default();
    queue.push(apply);
    let delivered = tx.send(queue).is_ok();
    if !delivered {
        tracing::debug!("update channel closed");
    }
    delivered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Endpoint;
    use crate::data::{ColumnId, ViewState};
    use rust_decimal_macros::dec;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    type StocksResult = Result<Vec<Stock>, FetchError>;

    /// Replays scripted stock responses, repeating the last one forever.
    #[derive(Clone)]
    struct Scripted {
        columns: Result<Vec<ColumnConfig>, FetchError>,
        stocks: Arc<Mutex<VecDeque<StocksResult>>>,
        calls: Arc<AtomicUsize>,
        column_calls: Arc<AtomicUsize>,
        /// Columns answer only after this long
        columns_delay: Duration,
        fetched_at: Arc<Mutex<Vec<Instant>>>,
    }

    impl Scripted {
        fn new(columns: Result<Vec<ColumnConfig>, FetchError>, stocks: Vec<StocksResult>) -> Self {
            Self {
                columns,
                stocks: Arc::new(Mutex::new(stocks.into())),
                calls: Arc::default(),
                column_calls: Arc::default(),
                columns_delay: Duration::ZERO,
                fetched_at: Arc::default(),
            }
        }

        fn columns_after(mut self, delay: Duration) -> Self {
            self.columns_delay = delay;
            self
        }

        fn column_calls(&self) -> usize {
            self.column_calls.load(Ordering::SeqCst)
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl StockSource for Scripted {
        fn columns(&self) -> BoxFuture<'static, Result<Vec<ColumnConfig>, FetchError>> {
            self.column_calls.fetch_add(1, Ordering::SeqCst);
            let columns = self.columns.clone();
            let delay = self.columns_delay;
            Box::pin(async move {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                columns
            })
        }

        fn stocks(&self) -> BoxFuture<'static, StocksResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.fetched_at.lock().expect("poison").push(Instant::now());
            let mut script = self.stocks.lock().expect("poison");
            let next = if script.len() > 1 {
                script.pop_front()
            } else {
                script.front().cloned()
            };
            let next = next.unwrap_or_else(|| Ok(Vec::new()));
            Box::pin(async move { next })
        }
    }

    struct FixedTickers(Vec<Ticker>);

    impl TickerSource for FixedTickers {
        fn tickers(&self) -> BoxFuture<'static, Result<Vec<Ticker>, FetchError>> {
            let tickers = self.0.clone();
            Box::pin(async move { Ok(tickers) })
        }
    }

    fn columns() -> Vec<ColumnConfig> {
        [
            (ColumnId::Symbol, false),
            (ColumnId::Price, false),
            (ColumnId::ChangePercent, false),
            (ColumnId::Volume, true),
        ]
        .into_iter()
        .map(|(id, optional)| ColumnConfig {
            id,
            label: id.default_label().to_string(),
            optional,
        })
        .collect()
    }

    fn stock(symbol: &str) -> Stock {
        Stock {
            symbol: symbol.to_string(),
            name: format!("{symbol} Inc."),
            price: dec!(100),
            ..Stock::default()
        }
    }

    fn outage() -> FetchError {
        FetchError::HttpStatus {
            endpoint: Endpoint::Stocks,
            status: 503,
        }
    }

    fn every_second(max_failures: u32) -> PollSettings {
        PollSettings {
            interval: Duration::from_secs(1),
            max_failures,
        }
    }

    fn world_with(session: u64) -> World {
        let mut world = World::new();
        world.insert_resource(Dashboard::new(session));
        world
    }

    async fn apply_next(rx: &mut mpsc::UnboundedReceiver<CommandQueue>, world: &mut World) {
        let mut queue = rx.recv().await.expect("update");
        queue.apply(world);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_poll_keeps_rows_then_recovers() {
        let source = Scripted::new(
            Ok(columns()),
            vec![Ok(vec![stock("AAPL")]), Err(outage()), Ok(vec![stock("AAPL"), stock("MSFT")])],
        );
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut world = world_with(1);
        let _task = spawn_screener(&Handle::current(), source, 1, every_second(0), tx);

        apply_next(&mut rx, &mut world).await;
        let dashboard = world.resource::<Dashboard>();
        assert_eq!(dashboard.state(), &ViewState::Ready);
        assert_eq!(dashboard.filtered().len(), 1);

        apply_next(&mut rx, &mut world).await;
        let dashboard = world.resource::<Dashboard>();
        assert_eq!(dashboard.state().error(), Some("Failed to fetch stocks (HTTP 503)"));
        assert_eq!(dashboard.filtered().len(), 1);

        apply_next(&mut rx, &mut world).await;
        let dashboard = world.resource::<Dashboard>();
        assert_eq!(dashboard.state(), &ViewState::Ready);
        assert_eq!(dashboard.filtered().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn polls_on_a_fixed_period() {
        let source = Scripted::new(Ok(columns()), vec![Ok(vec![stock("AAPL")])]);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut world = world_with(1);
        let _task = spawn_screener(&Handle::current(), source.clone(), 1, every_second(0), tx);

        for _ in 0..4 {
            apply_next(&mut rx, &mut world).await;
        }
        let fetched_at = source.fetched_at.lock().expect("poison").clone();
        assert!(fetched_at.len() >= 4);
        for pair in fetched_at[..4].windows(2) {
            assert_eq!(pair[1] - pair[0], Duration::from_secs(1));
        }
        assert_eq!(source.column_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn initial_load_waits_for_late_columns() {
        let source = Scripted::new(Ok(columns()), vec![Ok(vec![stock("AAPL")])])
            .columns_after(Duration::from_millis(300));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut world = world_with(1);
        let started = Instant::now();
        let _task = spawn_screener(&Handle::current(), source.clone(), 1, every_second(0), tx);

        apply_next(&mut rx, &mut world).await;
        assert!(started.elapsed() >= Duration::from_millis(300));
        assert_eq!(source.calls(), 1);
        assert_eq!(source.column_calls(), 1);
        let dashboard = world.resource::<Dashboard>();
        assert_eq!(dashboard.state(), &ViewState::Ready);
        assert_eq!(dashboard.columns().len(), 4);
        assert_eq!(dashboard.filtered().len(), 1);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_fetching() {
        let source = Scripted::new(Ok(columns()), vec![Ok(vec![stock("AAPL")])]);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut world = world_with(1);
        let task = spawn_screener(&Handle::current(), source.clone(), 1, every_second(0), tx);

        apply_next(&mut rx, &mut world).await;
        task.cancel();
        assert!(rx.recv().await.is_none());

        let calls = source.calls();
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(source.calls(), calls);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_handle_cancels() {
        let source = Scripted::new(Ok(columns()), vec![Ok(vec![stock("AAPL")])]);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let task = spawn_screener(&Handle::current(), source, 1, every_second(0), tx);
        drop(task);
        while rx.recv().await.is_some() {}
    }

    #[tokio::test(start_paused = true)]
    async fn stale_session_is_ignored() {
        let source = Scripted::new(Ok(columns()), vec![Ok(vec![stock("AAPL")])]);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut world = world_with(2);
        let _task = spawn_screener(&Handle::current(), source, 1, every_second(0), tx);

        apply_next(&mut rx, &mut world).await;
        let dashboard = world.resource::<Dashboard>();
        assert!(dashboard.state().is_loading());
        assert!(dashboard.stocks().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn stops_after_max_consecutive_failures() {
        let source = Scripted::new(Ok(columns()), vec![Err(outage())]);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut world = world_with(1);
        let _task = spawn_screener(&Handle::current(), source.clone(), 1, every_second(3), tx);

        while let Some(mut queue) = rx.recv().await {
            queue.apply(&mut world);
        }
        let dashboard = world.resource::<Dashboard>();
        assert!(dashboard.is_stopped());
        assert_eq!(dashboard.failures(), 3);
        assert_eq!(source.calls(), 3);
    }

    #[tokio::test]
    async fn tickers_load_once() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut world = World::new();
        world.insert_resource(TickerBoard::new(5));
        let tickers = vec![Ticker {
            ticker: "TSLA".to_string(),
            close: dec!(251.2),
            sentiment_label: None,
        }];
        let _task = spawn_tickers(&Handle::current(), FixedTickers(tickers), 5, tx);

        apply_next(&mut rx, &mut world).await;
        assert!(rx.recv().await.is_none());
        let board = world.resource::<TickerBoard>();
        assert_eq!(board.state(), &ViewState::Ready);
        assert_eq!(board.tickers()[0].ticker, "TSLA");
    }
}
