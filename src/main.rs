use crate::widgets::Terminal;
use std::io::{IsTerminal, Write};

#[macro_use]
mod macros;

pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod doctor;
pub mod helper;
pub mod logger;
pub mod refresh;
pub mod render;
pub mod system;
pub mod ui;
pub mod widgets;

mod views;

#[macro_use]
extern crate rust_i18n;
i18n!("locales");

#[tokio::main]
async fn main() {
    let bin_name = std::env::args()
        .next()
        .unwrap_or_else(|| "tickermind".to_string());

    let command = match cli::parse_args(std::env::args().skip(1)) {
        Ok(command) => command,
        Err(err) => {
            eprintln!("{}", err.message);
            std::process::exit(err.code);
        }
    };

    dotenvy::dotenv().ok();

    let (args, doctor) = match command {
        cli::Command::Help => {
            println!("{}", cli::help_text(&bin_name));
            return;
        }
        cli::Command::Version => {
            println!("{}", cli::version_text());
            return;
        }
        cli::Command::Doctor(args) => (args, true),
        cli::Command::Run(args) => (args, false),
    };

    let settings = config::Settings::from_env().and_then(|mut settings| {
        settings.apply_args(&args)?;
        Ok(settings)
    });

    if doctor {
        std::process::exit(doctor::run(settings).await);
    }

    let settings = match settings {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("Invalid configuration: {err}");
            std::process::exit(2);
        }
    };

    if !std::io::stdout().is_terminal() {
        eprintln!("tickermind needs an interactive terminal (TTY); try `tickermind doctor`.");
        std::process::exit(1);
    }

    rust_i18n::set_locale(&settings.locale);

    let _guard = logger::init(&settings);
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        pid = std::process::id(),
        api = %settings.api_url,
        poll_ms = u64::try_from(settings.poll_interval.as_millis()).unwrap_or(u64::MAX),
        locale = %settings.locale,
        log_dir = %logger::active_log_dir().display(),
        "starting"
    );

    // Set up panic hook to restore terminal
    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        Terminal::exit_full_screen();
        hook(info);
    }));

    _ = std::io::stdout().flush();

    Terminal::enter_full_screen();
    let result = tokio::select! {
        result = app::run(settings) => {
            tracing::info!("main loop exited");
            result
        }
        _ = wait_for_shutdown_signal() => {
            tracing::warn!("shutdown signal received");
            Ok(())
        }
    };
    Terminal::exit_full_screen();

    if let Err(err) = result {
        tracing::error!(error = %err, "dashboard failed");
        eprintln!("tickermind: {err:#}");
        std::process::exit(1);
    }
}

#[cfg(unix)]
async fn wait_for_shutdown_signal() {
    use std::future::pending;
    use tokio::signal::unix::{signal, Signal, SignalKind};

    async fn recv_or_pending(signal: Option<Signal>) {
        let mut signal = signal;
        if let Some(sig) = signal.as_mut() {
            let _ = sig.recv().await;
            return;
        }
        pending::<()>().await;
    }

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {}
        _ = recv_or_pending(signal(SignalKind::terminate()).ok()) => {}
        _ = recv_or_pending(signal(SignalKind::hangup()).ok()) => {}
        _ = recv_or_pending(signal(SignalKind::interrupt()).ok()) => {}
    }
}

#[cfg(not(unix))]
async fn wait_for_shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
