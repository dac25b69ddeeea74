use thiserror::Error;

/// Errors raised along the fetch/enrich pipeline.
///
/// `Config` is checked before any network activity. `Api` carries the
/// server-supplied error so callers can log it; the user-facing text
/// comes from [`MonitorError::category_message`] instead, which never
/// exposes raw server messages or the API token.
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("configuration error: {0}")]
    Config(&'static str),
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("api error {code}: {message}")]
    Api { code: i64, message: String },
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

impl MonitorError {
    /// Fixed display text per error category.
    pub fn category_message(&self) -> &'static str {
        match self {
            MonitorError::Config(_) => "Configuration incomplete: set server URL and API token",
            MonitorError::Transport(_) => "Server unreachable",
            MonitorError::Api { .. } => "Server rejected the request",
            MonitorError::Decode(_) => "Unexpected server response",
        }
    }
}
