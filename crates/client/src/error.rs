/// Errors raised by the client itself.
///
/// Application-level failures (bad parameter, unknown margin type, ...) are not
/// errors here: the service reports them inside the JSON payload, which is
/// returned to the caller like any other response.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("API key is not a valid header value")]
    InvalidApiKey,
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Response body is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, ClientError::Transport(e) if e.is_timeout())
    }
}
