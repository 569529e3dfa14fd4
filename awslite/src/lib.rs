//! awslite - a lean AWS client stack.
//!
//! This facade wires the pieces together: the signing framework from
//! `awslite-core`, the SigV4 implementation from `awslite-aws-v4`, the S3
//! client from `awslite-s3`, and a reqwest transport.
//!
//! ```no_run
//! # async fn example() -> awslite::s3::Result<()> {
//! let client = awslite::s3::client("us-east-1")?;
//! let file = tokio::fs::File::open("large.bin").await?;
//! client
//!     .multipart_upload_stream("my-bucket", "my-key", file)
//!     .await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub use awslite_core::{Context, Error, ErrorKind, OsEnv, Result, Signer};
pub use awslite_http_send_reqwest::ReqwestHttpSend;

pub mod aws;
pub mod s3;
pub mod sqs;

/// Create a context with the standard components: a reqwest transport and
/// the OS environment.
pub fn default_context() -> Context {
    Context::new()
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv)
}
