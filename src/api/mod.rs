mod client;
mod error;

pub use client::{ApiClient, HealthMessage};
pub use error::{Endpoint, FetchError};

#[cfg(test)]
pub(crate) use client::tests::serve_once;
