use bevy_ecs::prelude::*;
use ratatui::{layout::Rect, Frame};
use tokio::runtime::Handle;

use crate::{
    api::ApiClient,
    app::AppState,
    config::Settings,
    data::{Dashboard, TickerBoard, User},
    refresh::{self, TaskHandle},
    ui::{
        rect::{take_bottom, take_top},
        Content,
    },
    views::{self, FooterStatus, LoginForm, ScreenerUi, TickersUi},
    widgets::{Loading, LoadingWidget, Terminal},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Event)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Tab,
    BackTab,
    Enter,
    Esc,
    Space,
    /// Focus the search box
    Search,
    /// Focus the column toggles
    Columns,
}

#[derive(Event)]
pub struct TuiEvent(pub tui_input::InputRequest);

#[derive(Clone, Resource)]
pub struct Command(pub refresh::Sender);

#[derive(Clone, Resource)]
pub struct Runtime(pub Handle);

#[derive(Clone, Resource)]
pub struct Config(pub Settings);

/// Unauthenticated client, cloned with a token on sign-in
#[derive(Clone, Resource)]
pub struct Backend(pub ApiClient);

/// Signed-in user and the client carrying their token
#[derive(Clone, Resource)]
pub struct Session {
    pub user: User,
    pub client: ApiClient,
}

impl Session {
    pub fn new(user: User, backend: &ApiClient) -> Self {
        let client = backend.clone().with_token(user.token.clone());
        Self { user, client }
    }
}

/// Stock polling task of the live screener
#[derive(Resource)]
pub struct Poller(pub TaskHandle);

#[derive(Resource)]
pub struct TickerLoader(pub TaskHandle);

#[derive(Debug, Default, Resource)]
pub struct HelpPopup(pub bool);

type Chrome<'w> = (Res<'w, HelpPopup>, Res<'w, Config>, Option<Res<'w, Session>>);

pub fn error(mut terminal: ResMut<Terminal>, err: Res<Content<'static>>) {
    _ = terminal.draw(|frame| {
        frame.render_widget(err.clone(), frame.size());
    });
}

pub fn enter_screener(
    mut commands: Commands,
    mut sessions: Local<u64>,
    session: Option<Res<Session>>,
    rt: Res<Runtime>,
    config: Res<Config>,
    command: Res<Command>,
) {
    let Some(session) = session else {
        tracing::warn!("screener entered without a session");
        return;
    };
    *sessions += 1;
    commands.insert_resource(Dashboard::new(*sessions));
    commands.insert_resource(ScreenerUi::default());
    commands.insert_resource(Poller(refresh::spawn_screener(
        &rt.0,
        session.client.clone(),
        *sessions,
        config.0.poll(),
        command.0.clone(),
    )));
}

/// Results already queued by the cancelled poller find no dashboard.
pub fn exit_screener(world: &mut World) {
    if let Some(Poller(task)) = world.remove_resource::<Poller>() {
        task.cancel();
        tracing::debug!("screener polling cancelled");
    }
    world.remove_resource::<Dashboard>();
    world.remove_resource::<ScreenerUi>();
}

pub fn enter_tickers(
    mut commands: Commands,
    mut sessions: Local<u64>,
    session: Option<Res<Session>>,
    rt: Res<Runtime>,
    command: Res<Command>,
) {
    let Some(session) = session else {
        tracing::warn!("tickers entered without a session");
        return;
    };
    *sessions += 1;
    commands.insert_resource(TickerBoard::new(*sessions));
    commands.insert_resource(TickersUi::default());
    commands.insert_resource(TickerLoader(refresh::spawn_tickers(
        &rt.0,
        session.client.clone(),
        *sessions,
        command.0.clone(),
    )));
}

pub fn exit_tickers(world: &mut World) {
    if let Some(TickerLoader(task)) = world.remove_resource::<TickerLoader>() {
        task.cancel();
    }
    world.remove_resource::<TickerBoard>();
    world.remove_resource::<TickersUi>();
}

/// Reload the tickers list, keeping the current rows until the result lands
pub fn refresh_tickers(world: &mut World) {
    let Some(client) = world.get_resource::<Session>().map(|s| s.client.clone()) else {
        return;
    };
    let session = {
        let Some(mut board) = world.get_resource_mut::<TickerBoard>() else {
            return;
        };
        board.reloading();
        board.session()
    };
    let rt = world.resource::<Runtime>().0.clone();
    let tx = world.resource::<Command>().0.clone();
    tracing::debug!(session, "tickers refresh requested");
    world.insert_resource(TickerLoader(refresh::spawn_tickers(&rt, client, session, tx)));
}

fn layout(rect: Rect) -> (Rect, Rect, Rect) {
    let (navbar, rest) = take_top(1, rect);
    let (main, footer) = take_bottom(1, rest);
    (navbar, main, footer)
}

fn popups(frame: &mut Frame, help: &HelpPopup, config: &Config) {
    if help.0 {
        let area = frame.size();
        views::help::render(frame, area, &config.0.api_url);
    }
}

pub fn render_login(
    mut terminal: ResMut<Terminal>,
    mut commands: Commands,
    mut events: EventReader<Key>,
    mut inputs: EventReader<TuiEvent>,
    mut form: ResMut<LoginForm>,
    backend: Res<Backend>,
    (help, config, _): Chrome,
) {
    for event in &mut inputs {
        form.input(event.0);
    }
    for event in &mut events {
        match event {
            Key::Tab | Key::BackTab | Key::Up | Key::Down => form.switch_field(),
            Key::Enter => {
                if let Some(user) = form.submit() {
                    commands.insert_resource(Session::new(user, &backend.0));
                    commands.insert_resource(NextState(Some(AppState::Screener)));
                }
            }
            _ => (),
        }
    }

    _ = terminal.draw(|frame| {
        let (navbar, main, _) = layout(frame.size());
        views::navbar::render(frame, navbar, AppState::Login, None);
        form.render(frame, main);
        popups(frame, &help, &config);
    });
}

pub fn render_screener(
    mut terminal: ResMut<Terminal>,
    mut events: EventReader<Key>,
    mut inputs: EventReader<TuiEvent>,
    mut dashboard: ResMut<Dashboard>,
    mut ui: ResMut<ScreenerUi>,
    loading: Res<Loading>,
    (help, config, session): Chrome,
) {
    for event in &mut inputs {
        ui.input(event.0, &mut dashboard);
    }
    for event in &mut events {
        ui.handle(*event, &mut dashboard);
    }

    _ = terminal.draw(|frame| {
        let (navbar, main, footer) = layout(frame.size());
        views::navbar::render(
            frame,
            navbar,
            AppState::Screener,
            session.as_deref().map(|s| &s.user),
        );
        ui.render(frame, main, &dashboard, &loading);
        views::footer::render(
            frame,
            footer,
            &FooterStatus {
                state: dashboard.state(),
                last_updated: dashboard.last_updated(),
                interval: Some(config.0.poll_interval),
                failures: dashboard.failures(),
                stopped: dashboard.is_stopped(),
            },
        );
        popups(frame, &help, &config);
    });
}

pub fn render_tickers(
    mut terminal: ResMut<Terminal>,
    mut events: EventReader<Key>,
    board: Res<TickerBoard>,
    mut ui: ResMut<TickersUi>,
    loading: Res<Loading>,
    (help, config, session): Chrome,
) {
    let len = board.tickers().len();
    for event in &mut events {
        match event {
            Key::Up => ui.select_prev(len),
            Key::Down => ui.select_next(len),
            _ => (),
        }
    }

    _ = terminal.draw(|frame| {
        let (navbar, main, footer) = layout(frame.size());
        views::navbar::render(
            frame,
            navbar,
            AppState::Tickers,
            session.as_deref().map(|s| &s.user),
        );
        if board.state().is_loading() && board.tickers().is_empty() {
            frame.render_widget(LoadingWidget::new(&loading, t!("Tickers.Loading")), main);
        } else {
            let mut rest = main;
            if let Some(error) = board.state().error() {
                let (top, remaining) = take_top(1, rest);
                views::banner::render(frame, top, error, !board.tickers().is_empty());
                rest = remaining;
            }
            ui.render(frame, rest, &board);
        }
        views::footer::render(
            frame,
            footer,
            &FooterStatus {
                state: board.state(),
                last_updated: board.last_updated(),
                interval: None,
                failures: 0,
                stopped: false,
            },
        );
        popups(frame, &help, &config);
    });
}
