#[derive(Debug, thiserror::Error)]
/// Unified error type for lib-rpc-client
pub enum Error {
    /// No response received at all: DNS, connect, TLS or timeout failure
    #[error("{source}")]
    Request { source: reqwest::Error },

    #[error(transparent)]
    /// Error when reading or decoding response body
    Reqwest {
        #[from]
        source: reqwest::Error,
    },

    #[error("Invalid url [{url}]: {source}")]
    /// Error when parsing url
    UrlParse {
        url: String,
        source: url::ParseError,
    },

    /// Request with a streaming body cannot be retained for logging
    #[error("Request body is not cloneable")]
    BodyNotCloneable,

    /// Response body is not valid JSON
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether the request failed before any response was received.
    pub fn is_no_response(&self) -> bool {
        matches!(self, Self::Request { .. })
    }
}
