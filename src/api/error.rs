use std::time::Duration;

use thiserror::Error;

/// Backend resources the dashboard reads
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Endpoint {
    Columns,
    Stocks,
    Tickers,
    Health,
}

impl Endpoint {
    /// Path and query relative to the API base URL
    pub fn path(self) -> &'static str {
        match self {
            Self::Columns => "/api/columns",
            Self::Stocks => "/api/stocks",
            Self::Tickers => "/api?Cmd=Tickers.GetList",
            Self::Health => "/health",
        }
    }
}

/// Failure of one backend request.
///
/// Every variant renders as a single human-readable line; that line is what
/// the views show in their error banner.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Connection refused, DNS failure, reset, ...
    #[error("Failed to fetch {endpoint}: {message}")]
    Network { endpoint: Endpoint, message: String },
    /// Non-2xx response
    #[error("Failed to fetch {endpoint} (HTTP {status})")]
    HttpStatus { endpoint: Endpoint, status: u16 },
    #[error("Failed to fetch {endpoint}: no response within {}ms", .timeout.as_millis())]
    Timeout { endpoint: Endpoint, timeout: Duration },
    /// Malformed JSON or missing fields
    #[error("Failed to read {endpoint}: {message}")]
    Parse { endpoint: Endpoint, message: String },
}

impl FetchError {
    pub fn endpoint(&self) -> Endpoint {
        match self {
            Self::Network { endpoint, .. }
            | Self::HttpStatus { endpoint, .. }
            | Self::Timeout { endpoint, .. }
            | Self::Parse { endpoint, .. } => *endpoint,
        }
    }

    pub(crate) fn from_reqwest(endpoint: Endpoint, timeout: Duration, err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout { endpoint, timeout }
        } else if err.is_decode() {
            Self::Parse {
                endpoint,
                message: root_cause(err),
            }
        } else if let Some(status) = err.status() {
            Self::HttpStatus {
                endpoint,
                status: status.as_u16(),
            }
        } else {
            Self::Network {
                endpoint,
                message: root_cause(err),
            }
        }
    }
}

// reqwest's top-level message only names the URL; the useful part is deeper.
fn root_cause(err: &(dyn std::error::Error + 'static)) -> String {
    let mut cause = err;
    while let Some(source) = cause.source() {
        cause = source;
    }
    cause.to_string()
}
