//! S3 client built on awslite's SigV4 signer.
//!
//! The heart of this crate is [`Client::multipart_upload`], a failure-aware
//! orchestrator that splits a large payload into individually signed part
//! uploads and always drives the remote session to a terminal state:
//! completed on success, aborted on any failure after creation.
//!
//! ```no_run
//! use awslite_core::{Context, Signer};
//! use awslite_aws_v4::{DefaultCredentialProvider, RequestSigner};
//! use awslite_s3::{ChunkedReader, Client, Config};
//!
//! # async fn example() -> awslite_s3::Result<()> {
//! let ctx = Context::new();
//! let config = Config::new("us-east-1");
//! let signer = Signer::new(
//!     ctx.clone(),
//!     DefaultCredentialProvider::new(),
//!     RequestSigner::new("s3", config.region()),
//! );
//! let client = Client::new(ctx, signer, config)?;
//!
//! let file = tokio::fs::File::open("large.bin").await?;
//! let mut source = ChunkedReader::new(file);
//! client.multipart_upload("bucket", "key", &mut source).await?;
//! # Ok(())
//! # }
//! ```

mod config;
pub use config::Config;

mod error;
pub use error::{Error, Result};

mod client;
pub use client::Client;

mod object;
pub use object::{PayloadHash, Preconditions, PutObjectOptions};

mod multipart;
pub use multipart::{CompletedPart, MAX_PART_COUNT, MIN_PART_SIZE};

mod part_source;
pub use part_source::{ChunkedReader, Part, PartSource, CHUNK_SIZE};

mod xml;

#[cfg(test)]
mod testing;
