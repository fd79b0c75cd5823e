mod api;
pub mod config;
pub mod error;
pub(crate) mod http;
pub mod types;

pub use config::TernClientConfig;
pub use error::{Result, TernClientError};
pub use types::{
    ConfigResponse, ExtensionConfig, ExtensionEntry, ExtensionQuery, ProviderDetails, SecretStatus,
};

use http::HttpClient;

/// Async HTTP client for the local `ternd` backend.
///
/// All methods require a running `ternd` instance and perform exactly one
/// request/response round trip; retry policy belongs to the caller.
/// Authentication is via the `X-Secret-Key` header, configured through
/// [`TernClientConfig`]. That header carries the locally-issued
/// UI-to-backend credential, never a provider API key.
///
/// `TernClient` is `Clone`: the underlying `reqwest::Client` uses an `Arc`
/// internally, so clones share the same connection pool.
#[derive(Clone)]
pub struct TernClient {
    pub(crate) http: HttpClient,
}

impl TernClient {
    pub fn new(config: TernClientConfig) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new(&config)?,
        })
    }
}
