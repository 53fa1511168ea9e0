use std::path::PathBuf;
use std::time::Duration;

use crate::cli::Args;
use crate::refresh::PollSettings;

pub const API_URL: &str = "TICKERMIND_API_URL";
pub const POLL_INTERVAL_MS: &str = "TICKERMIND_POLL_INTERVAL_MS";
pub const REQUEST_TIMEOUT_MS: &str = "TICKERMIND_REQUEST_TIMEOUT_MS";
pub const MAX_FAILURES: &str = "TICKERMIND_MAX_FAILURES";
pub const TOKEN: &str = "TICKERMIND_TOKEN";
pub const LOCALE: &str = "TICKERMIND_LOCALE";
pub const LOG: &str = "TICKERMIND_LOG";
pub const LOG_DIR: &str = "TICKERMIND_LOG_DIR";

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_LOG_FILTER: &str = "error,tickermind=debug";
pub const SUPPORTED_LOCALES: [&str; 2] = ["en", "zh-CN"];

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} must be a whole number, got {value:?}")]
    NotANumber { key: &'static str, value: String },
    #[error("{key} must be greater than zero")]
    Zero { key: &'static str },
    #[error("{key} must be an http:// or https:// URL, got {value:?}")]
    InvalidUrl { key: &'static str, value: String },
    #[error("{key}: unsupported locale {value:?} (available: en, zh-CN)")]
    UnsupportedLocale { key: &'static str, value: String },
}

/// Runtime settings, read once at startup
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub api_url: String,
    pub poll_interval: Duration,
    pub request_timeout: Duration,
    /// Consecutive poll failures before polling stops, 0 never stops
    pub max_failures: u32,
    pub token: Option<String>,
    pub locale: String,
    pub log_filter: String,
    pub log_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            poll_interval: Duration::from_millis(1000),
            request_timeout: Duration::from_millis(5000),
            max_failures: 0,
            token: None,
            locale: "en".to_string(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            log_dir: None,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from a variable lookup; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let mut settings = Self::default();

        if let Some(url) = get(API_URL) {
            settings.api_url = parse_url(API_URL, &url)?;
        }
        if let Some(ms) = get(POLL_INTERVAL_MS) {
            settings.poll_interval = parse_millis(POLL_INTERVAL_MS, &ms)?;
        }
        if let Some(ms) = get(REQUEST_TIMEOUT_MS) {
            settings.request_timeout = parse_millis(REQUEST_TIMEOUT_MS, &ms)?;
        }
        if let Some(count) = get(MAX_FAILURES) {
            settings.max_failures = count.parse().map_err(|_| ConfigError::NotANumber {
                key: MAX_FAILURES,
                value: count.clone(),
            })?;
        }
        settings.token = get(TOKEN);
        if let Some(locale) = get(LOCALE) {
            settings.locale = parse_locale(&locale)?;
        }
        if let Some(filter) = get(LOG) {
            settings.log_filter = filter;
        }
        settings.log_dir = get(LOG_DIR).map(PathBuf::from);

        Ok(settings)
    }

    /// Command-line flags win over the environment
    pub fn apply_args(&mut self, args: &Args) -> Result<(), ConfigError> {
        if let Some(url) = &args.api {
            self.api_url = parse_url("--api", url)?;
        }
        if let Some(ms) = &args.interval {
            self.poll_interval = parse_millis("--interval", ms)?;
        }
        Ok(())
    }

    pub fn poll(&self) -> PollSettings {
        PollSettings {
            interval: self.poll_interval,
            max_failures: self.max_failures,
        }
    }
}

fn parse_url(key: &'static str, value: &str) -> Result<String, ConfigError> {
    let value = value.trim();
    let host = value
        .strip_prefix("http://")
        .or_else(|| value.strip_prefix("https://"));
    match host {
        Some(host) if !host.trim_matches('/').is_empty() => {
            Ok(value.trim_end_matches('/').to_string())
        }
        _ => Err(ConfigError::InvalidUrl {
            key,
            value: value.to_string(),
        }),
    }
}

fn parse_millis(key: &'static str, value: &str) -> Result<Duration, ConfigError> {
    let ms: u64 = value.trim().parse().map_err(|_| ConfigError::NotANumber {
        key,
        value: value.to_string(),
    })?;
    if ms == 0 {
        return Err(ConfigError::Zero { key });
    }
    Ok(Duration::from_millis(ms))
}

fn parse_locale(value: &str) -> Result<String, ConfigError> {
    SUPPORTED_LOCALES
        .iter()
        .find(|locale| locale.eq_ignore_ascii_case(value))
        .map(|locale| (*locale).to_string())
        .ok_or_else(|| ConfigError::UnsupportedLocale {
            key: LOCALE,
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let settings = settings(&[]).expect("defaults");
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.poll_interval, Duration::from_secs(1));
        assert_eq!(settings.api_url, "http://localhost:8000");
        assert_eq!(settings.token, None);
    }

    #[test]
    fn reads_every_variable() {
        let settings = settings(&[
            (API_URL, "https://screener.example.com/"),
            (POLL_INTERVAL_MS, "250"),
            (REQUEST_TIMEOUT_MS, "1500"),
            (MAX_FAILURES, "10"),
            (TOKEN, " abc "),
            (LOCALE, "zh-cn"),
            (LOG, "info"),
            (LOG_DIR, "/tmp/tm-logs"),
        ])
        .expect("valid settings");
        assert_eq!(settings.api_url, "https://screener.example.com");
        assert_eq!(settings.poll_interval, Duration::from_millis(250));
        assert_eq!(settings.request_timeout, Duration::from_millis(1500));
        assert_eq!(settings.max_failures, 10);
        assert_eq!(settings.token.as_deref(), Some("abc"));
        assert_eq!(settings.locale, "zh-CN");
        assert_eq!(settings.log_filter, "info");
        assert_eq!(settings.log_dir, Some(PathBuf::from("/tmp/tm-logs")));
    }

    #[test]
    fn blank_values_are_unset() {
        let settings = settings(&[(TOKEN, "   "), (POLL_INTERVAL_MS, "")]).expect("valid");
        assert_eq!(settings.token, None);
        assert_eq!(settings.poll_interval, Duration::from_secs(1));
    }

    #[test]
    fn rejects_invalid_values() {
        assert_eq!(
            settings(&[(POLL_INTERVAL_MS, "soon")]),
            Err(ConfigError::NotANumber {
                key: POLL_INTERVAL_MS,
                value: "soon".to_string()
            })
        );
        assert_eq!(
            settings(&[(REQUEST_TIMEOUT_MS, "0")]),
            Err(ConfigError::Zero {
                key: REQUEST_TIMEOUT_MS
            })
        );
        assert!(matches!(
            settings(&[(API_URL, "localhost:8000")]),
            Err(ConfigError::InvalidUrl { .. })
        ));
        assert!(matches!(
            settings(&[(API_URL, "http://")]),
            Err(ConfigError::InvalidUrl { .. })
        ));
        assert!(matches!(
            settings(&[(LOCALE, "fr")]),
            Err(ConfigError::UnsupportedLocale { .. })
        ));
        assert!(matches!(
            settings(&[(MAX_FAILURES, "-1")]),
            Err(ConfigError::NotANumber { .. })
        ));
    }

    #[test]
    fn flags_override_environment() {
        let mut settings = settings(&[(POLL_INTERVAL_MS, "250")]).expect("valid");
        let args = Args {
            api: Some("http://10.0.0.2:9000".to_string()),
            interval: Some("2000".to_string()),
        };
        settings.apply_args(&args).expect("valid flags");
        assert_eq!(settings.api_url, "http://10.0.0.2:9000");
        assert_eq!(settings.poll().interval, Duration::from_secs(2));

        let bad = Args {
            interval: Some("0".to_string()),
            ..Args::default()
        };
        assert_eq!(
            settings.apply_args(&bad),
            Err(ConfigError::Zero { key: "--interval" })
        );
    }

    #[test]
    fn error_messages_name_the_variable() {
        let err = settings(&[(MAX_FAILURES, "lots")]).expect_err("invalid");
        assert_eq!(
            err.to_string(),
            "TICKERMIND_MAX_FAILURES must be a whole number, got \"lots\""
        );
    }
}
