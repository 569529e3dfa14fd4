use http::StatusCode;

/// The error type for SQS operations.
///
/// Signing, configuration, transport and cancellation failures pass through
/// as [`awslite_core::Error`]; queue-level failures get their own variants.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The caller supplied out-of-range or malformed parameters. Raised
    /// before any network traffic.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The service rejected the request.
    #[error("service replied {status}: [{code}] {message}")]
    Service {
        /// HTTP status of the response.
        status: StatusCode,
        /// Error type decoded from the response body, or `unknown error`.
        code: String,
        /// Error message decoded from the response body, or the raw body.
        message: String,
    },

    /// Signing, configuration, transport or protocol failure.
    #[error(transparent)]
    Core(#[from] awslite_core::Error),
}

/// Convenience type alias for Results
pub type Result<T> = std::result::Result<T, Error>;
