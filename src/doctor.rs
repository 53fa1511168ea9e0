use std::io::{IsTerminal, Write};
use std::path::Path;

use crate::api::ApiClient;
use crate::config::{ConfigError, Settings};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

impl CheckStatus {
    #[must_use]
    fn marker(self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Warn => "WARN",
            Self::Fail => "FAIL",
        }
    }
}

#[derive(Clone, Debug)]
struct CheckItem {
    name: &'static str,
    status: CheckStatus,
    detail: String,
}

impl CheckItem {
    fn new(name: &'static str, status: CheckStatus, detail: impl Into<String>) -> Self {
        Self {
            name,
            status,
            detail: detail.into(),
        }
    }

    fn pass(name: &'static str, detail: impl Into<String>) -> Self {
        Self::new(name, CheckStatus::Pass, detail)
    }

    fn warn(name: &'static str, detail: impl Into<String>) -> Self {
        Self::new(name, CheckStatus::Warn, detail)
    }

    fn fail(name: &'static str, detail: impl Into<String>) -> Self {
        Self::new(name, CheckStatus::Fail, detail)
    }
}

/// Print a diagnostic report, returning the process exit code
pub async fn run(settings: Result<Settings, ConfigError>) -> i32 {
    let mut checks = vec![check_tty(), check_env_file_permission()];
    match settings {
        Ok(settings) => {
            checks.push(CheckItem::pass(
                "configuration",
                format!(
                    "api {} / poll {}ms / timeout {}ms",
                    settings.api_url,
                    settings.poll_interval.as_millis(),
                    settings.request_timeout.as_millis()
                ),
            ));
            checks.push(check_log_dir(&settings));
            checks.extend(check_backend(&settings).await);
        }
        Err(err) => checks.push(CheckItem::fail("configuration", err.to_string())),
    }

    println!("TickerMind doctor");
    println!("============================================================");
    for item in &checks {
        println!("[{}] {:<16} {}", item.status.marker(), item.name, item.detail);
    }
    println!("============================================================");

    verdict(&checks)
}

fn verdict(checks: &[CheckItem]) -> i32 {
    if checks.iter().any(|item| item.status == CheckStatus::Fail) {
        println!("Result: fix the FAIL items before starting tickermind.");
        return 2;
    }
    if checks.iter().any(|item| item.status == CheckStatus::Warn) {
        println!("Result: usable, but the WARN items deserve a look.");
    } else {
        println!("Result: all checks passed.");
    }
    0
}

fn check_tty() -> CheckItem {
    if std::io::stdout().is_terminal() {
        CheckItem::pass("terminal", "stdout is a TTY")
    } else {
        CheckItem::warn(
            "terminal",
            "stdout is not a TTY; doctor works, the dashboard will refuse to start",
        )
    }
}

fn check_log_dir(settings: &Settings) -> CheckItem {
    let dir = crate::logger::log_dir(settings);
    match ensure_writable_dir(&dir) {
        Ok(()) => CheckItem::pass("log directory", format!("writable: {}", dir.display())),
        Err(err) => {
            let fallback = crate::logger::fallback_log_dir();
            match ensure_writable_dir(&fallback) {
                Ok(()) => CheckItem::warn(
                    "log directory",
                    format!(
                        "{} is not writable ({err}); logs go to {}",
                        dir.display(),
                        fallback.display()
                    ),
                ),
                Err(fallback_err) => CheckItem::fail(
                    "log directory",
                    format!("{} ({err}) and {} ({fallback_err}) are not writable", dir.display(), fallback.display()),
                ),
            }
        }
    }
}

async fn check_backend(settings: &Settings) -> Vec<CheckItem> {
    let client = match ApiClient::new(&settings.api_url, settings.request_timeout) {
        Ok(client) => client.with_token(settings.token.clone()),
        Err(err) => return vec![CheckItem::fail("http client", err.to_string())],
    };

    let health = match client.health().await {
        Ok(health) => CheckItem::pass("backend health", health.message),
        Err(err) => CheckItem::fail("backend health", err.to_string()),
    };
    let columns = match client.fetch_columns().await {
        Ok(columns) if columns.is_empty() => {
            CheckItem::warn("column config", "backend returned no columns")
        }
        Ok(columns) => CheckItem::pass(
            "column config",
            format!(
                "{} columns, {} optional",
                columns.len(),
                columns.iter().filter(|c| c.optional).count()
            ),
        ),
        Err(err) => CheckItem::fail("column config", err.to_string()),
    };
    vec![health, columns]
}

#[cfg(unix)]
fn check_env_file_permission() -> CheckItem {
    use std::os::unix::fs::PermissionsExt;

    let env_path = Path::new(".env");
    if !env_path.exists() {
        return CheckItem::pass(".env", "not present");
    }

    match std::fs::metadata(env_path) {
        Ok(metadata) => {
            let mode = metadata.permissions().mode() & 0o777;
            if env_mode_is_secure(mode) {
                CheckItem::pass(".env", format!("mode {mode:o}"))
            } else {
                CheckItem::warn(
                    ".env",
                    format!("mode {mode:o} exposes the token to other users, run: chmod 600 .env"),
                )
            }
        }
        Err(err) => CheckItem::warn(".env", format!("cannot read permissions: {err}")),
    }
}

#[cfg(not(unix))]
fn check_env_file_permission() -> CheckItem {
    CheckItem::pass(".env", "permission bits not checked on this platform")
}

#[cfg(unix)]
fn env_mode_is_secure(mode: u32) -> bool {
    mode & 0o077 == 0
}

fn ensure_writable_dir(path: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(path)?;
    let probe_path = path.join(format!("doctor_write_probe_{}.tmp", std::process::id()));
    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&probe_path)?;
    file.write_all(b"probe")?;
    file.flush()?;
    std::fs::remove_file(probe_path)?;
    Ok(())
}
