use thiserror::Error;

/// Everything that can go wrong between issuing a feature query and holding
/// decoded records. An empty result set is not an error.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("feature service returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("feature service error {code}: {message}")]
    Service { code: i64, message: String },

    #[error("malformed query response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid layer URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}
