use crate::{MAX_PART_COUNT, MIN_PART_SIZE};
use http::StatusCode;

/// The error type for S3 operations.
///
/// Signing, configuration, transport and cancellation failures pass through
/// as [`awslite_core::Error`] (branch on its
/// [`kind`](awslite_core::Error::kind)); everything S3-specific gets its own
/// variant here.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The caller supplied conflicting or malformed parameters. Raised
    /// before any network traffic.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A non-final multipart part was below the service's size floor.
    #[error(
        "part {part_number} is {size} bytes, below the {MIN_PART_SIZE} byte minimum for a non-final part"
    )]
    PartTooSmall {
        /// Part number the undersized payload was produced for.
        part_number: u16,
        /// Size of the offending payload in bytes.
        size: u64,
    },

    /// The part source kept producing beyond the service's part limit.
    #[error("multipart upload cannot exceed {MAX_PART_COUNT} parts")]
    TooManyParts,

    /// The service rejected the request.
    #[error("service replied {status}: [{code}] {message}")]
    Service {
        /// HTTP status of the response.
        status: StatusCode,
        /// Error code decoded from the response body, or `unknown error`.
        code: String,
        /// Error message decoded from the response body, or the raw body.
        message: String,
    },

    /// A multipart upload failed and the session was torn down (abort was
    /// attempted, best-effort). The source is the failure that triggered
    /// the teardown.
    #[error("multipart upload aborted: {source}")]
    Aborted {
        /// The original failure, preserved unchanged.
        #[source]
        source: Box<Error>,
    },

    /// Reading part payloads from the caller's source failed.
    #[error("failed to read part payload")]
    Io(#[from] std::io::Error),

    /// Signing, configuration, transport or protocol failure.
    #[error(transparent)]
    Core(#[from] awslite_core::Error),
}

/// Convenience type alias for Results
pub type Result<T> = std::result::Result<T, Error>;
