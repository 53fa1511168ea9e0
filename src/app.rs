use std::time::Duration;

use bevy_app::prelude::*;
use bevy_ecs::prelude::*;
use bevy_ecs::system::{CommandQueue, SystemState};
use crossterm::event::{Event as TermEvent, KeyEvent, KeyEventKind};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use crate::api::ApiClient;
use crate::config::Settings;
use crate::data::{Dashboard, TickerBoard, User};
use crate::render::{DirtyFlags, RenderState};
use crate::system::{self, HelpPopup, Key, TuiEvent};
use crate::ui::Content;
use crate::views::{Focus, LoginForm, ScreenerUi, TickersUi};
use crate::widgets::{Loading, Terminal};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, States)]
pub enum AppState {
    #[default]
    Login,
    Screener,
    Tickers,
    Error,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Register states, events and systems; the terminal is inserted by the caller.
fn build(app: &mut App, backend: ApiClient, settings: Settings, tx: system::Command) {
    app.add_state::<AppState>()
        .add_event::<Key>()
        .add_event::<TuiEvent>()
        .init_resource::<Loading>()
        .init_resource::<LoginForm>()
        .init_resource::<HelpPopup>()
        .insert_resource(tx)
        .insert_resource(system::Runtime(tokio::runtime::Handle::current()))
        .add_systems(
            Update,
            system::error.run_if(
                in_state(AppState::Error).and_then(resource_exists::<Content<'static>>()),
            ),
        )
        .add_systems(Update, system::render_login.run_if(in_state(AppState::Login)))
        .add_systems(OnEnter(AppState::Screener), system::enter_screener)
        .add_systems(OnExit(AppState::Screener), system::exit_screener)
        .add_systems(
            Update,
            system::render_screener.run_if(
                in_state(AppState::Screener)
                    .and_then(resource_exists::<Dashboard>())
                    .and_then(resource_exists::<ScreenerUi>()),
            ),
        )
        .add_systems(OnEnter(AppState::Tickers), system::enter_tickers)
        .add_systems(OnExit(AppState::Tickers), system::exit_tickers)
        .add_systems(
            Update,
            system::render_tickers.run_if(
                in_state(AppState::Tickers)
                    .and_then(resource_exists::<TickerBoard>())
                    .and_then(resource_exists::<TickersUi>()),
            ),
        );

    if let Some(token) = settings.token.as_deref() {
        tracing::info!("signing in with the configured token");
        app.insert_resource(system::Session::new(User::from_token(token), &backend));
        app.insert_resource(NextState(Some(AppState::Screener)));
    }
    app.insert_resource(system::Backend(backend))
        .insert_resource(system::Config(settings));
}

pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let (update_tx, mut update_rx) = mpsc::unbounded_channel::<CommandQueue>();
    let backend = ApiClient::new(&settings.api_url, settings.request_timeout)?;

    let mut app = App::new();
    app.insert_resource(Terminal::new()?);
    build(&mut app, backend, settings, system::Command(update_tx));

    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut spinner_tick = tokio::time::interval(Duration::from_millis(150));
    spinner_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut events = crossterm::event::EventStream::new();
    let mut render_state = RenderState::new();
    render_state.mark_all_dirty();

    loop {
        tokio::select! {
            _ = render_tick.tick() => {
                if render_state.needs_render() {
                    app.update();
                    render_state.clear();
                } else {
                    render_state.skip();
                }
            }
            _ = spinner_tick.tick() => {
                if waiting(&app.world) {
                    render_state.mark_dirty(DirtyFlags::LOADING);
                }
            }
            // Fetch results and state changes from background tasks
            Some(mut cmd) = update_rx.recv() => {
                cmd.apply(&mut app.world);
                render_state.mark_dirty(DirtyFlags::NONE.mark_data_update());
            }
            Some(event) = tokio_stream::StreamExt::next(&mut events) => {
                let event = match event {
                    Ok(TermEvent::Key(event)) if event.kind != KeyEventKind::Release => event,
                    Ok(TermEvent::Resize(..)) => {
                        render_state.mark_all_dirty();
                        continue;
                    }
                    Ok(_) => continue,
                    Err(err) => {
                        tracing::error!(error = %err, "failed to read terminal events");
                        app.world.insert_resource(Content::new(
                            t!("Error.Input.Heading"),
                            t!("Error.Input.Content"),
                        ));
                        app.world.insert_resource(NextState(Some(AppState::Error)));
                        render_state.mark_dirty(DirtyFlags::ERROR);
                        continue;
                    }
                };
                if handle_key(&mut app, event, &mut render_state) == Flow::Quit {
                    break;
                }
            }
        }
    }

    tracing::debug!(stats = %render_state.stats(), "render loop finished");
    Ok(())
}

/// A view is waiting on its first response and shows the spinner
fn waiting(world: &World) -> bool {
    world
        .get_resource::<Dashboard>()
        .is_some_and(|d| d.state().is_loading() && d.stocks().is_empty())
        || world
            .get_resource::<TickerBoard>()
            .is_some_and(|b| b.state().is_loading() && b.tickers().is_empty())
}

fn handle_key(app: &mut App, event: KeyEvent, render_state: &mut RenderState) -> Flow {
    if matches!(event, ctrl!('c')) {
        return Flow::Quit;
    }

    // any key closes the help popup
    if app.world.resource::<HelpPopup>().0 {
        app.world.resource_mut::<HelpPopup>().0 = false;
        render_state.mark_all_dirty();
        return Flow::Continue;
    }

    let state = *app.world.resource::<State<AppState>>().get();
    let typing = state == AppState::Login
        || (state == AppState::Screener
            && app
                .world
                .get_resource::<ScreenerUi>()
                .is_some_and(|ui| ui.focus() == Focus::Search));

    match state {
        AppState::Error => Flow::Quit,
        _ if typing => {
            handle_text_key(&mut app.world, event);
            render_state.mark_dirty(DirtyFlags::NONE.mark_input(state));
            Flow::Continue
        }
        AppState::Login | AppState::Screener | AppState::Tickers => {
            handle_global_keys(app, event, state, render_state)
        }
    }
}

/// Keys while a text field owns the keyboard
fn handle_text_key(world: &mut World, event: KeyEvent) {
    match event {
        key!(Tab) => send_evt(Key::Tab, world),
        shift!(BackTab) => send_evt(Key::BackTab, world),
        key!(Enter) => send_evt(Key::Enter, world),
        key!(Esc) => send_evt(Key::Esc, world),
        key!(Up) => send_evt(Key::Up, world),
        key!(Down) => send_evt(Key::Down, world),
        _ => {
            if let Some(request) =
                tui_input::backend::crossterm::to_input_request(&TermEvent::Key(event))
            {
                send_evt(TuiEvent(request), world);
            }
        }
    }
}

fn handle_global_keys(
    app: &mut App,
    event: KeyEvent,
    state: AppState,
    render_state: &mut RenderState,
) -> Flow {
    let key = match event {
        key!('q') => return Flow::Quit,
        key!('?') => {
            app.world.resource_mut::<HelpPopup>().0 = true;
            render_state.mark_dirty(DirtyFlags::POPUP_HELP);
            return Flow::Continue;
        }
        key!('1') if state != AppState::Screener => {
            app.world.insert_resource(NextState(Some(AppState::Screener)));
            render_state.mark_all_dirty();
            return Flow::Continue;
        }
        key!('2') if state != AppState::Tickers => {
            app.world.insert_resource(NextState(Some(AppState::Tickers)));
            render_state.mark_all_dirty();
            return Flow::Continue;
        }
        key!('L') | shift!('L') => {
            tracing::info!("signed out");
            app.world.remove_resource::<system::Session>();
            app.world.insert_resource(NextState(Some(AppState::Login)));
            render_state.mark_all_dirty();
            return Flow::Continue;
        }
        key!('R') | shift!('R') if state == AppState::Tickers => {
            system::refresh_tickers(&mut app.world);
            render_state.mark_dirty(DirtyFlags::TICKERS | DirtyFlags::FOOTER);
            return Flow::Continue;
        }
        key!('/') => Key::Search,
        key!('c') => Key::Columns,
        key!(Up) | key!('k') => Key::Up,
        key!(Down) | key!('j') => Key::Down,
        key!(Left) | key!('h') => Key::Left,
        key!(Right) | key!('l') => Key::Right,
        key!(Tab) => Key::Tab,
        shift!(BackTab) => Key::BackTab,
        key!(Enter) => Key::Enter,
        key!(Esc) => Key::Esc,
        key!(' ') => Key::Space,
        _ => return Flow::Continue,
    };
    send_evt(key, &mut app.world);
    render_state.mark_dirty(DirtyFlags::NONE.mark_input(state));
    Flow::Continue
}

fn send_evt<T: Event>(evt: T, world: &mut World) {
    let mut state = SystemState::<EventWriter<T>>::new(world);
    state.get_mut(world).send(evt);
}
