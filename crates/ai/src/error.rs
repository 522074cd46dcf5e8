/// Error type for a single chat completion attempt.
#[derive(Debug, thiserror::Error)]
pub enum AiError {
    /// The HTTP client could not be built
    #[error("http client setup failed: {0}")]
    Setup(String),

    /// Connection, TLS or timeout failure
    #[error("network error: {0}")]
    Network(String),

    /// Non-success status from the provider
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Body was not the expected JSON
    #[error("unexpected response: {0}")]
    Parse(String),

    #[error("response contained no choices")]
    NoChoices,
}
