//! SQS client built on awslite's SigV4 signer.
//!
//! SQS speaks the `x-amz-json-1.0` protocol: every operation is a `POST /`
//! to the regional endpoint with an `x-amz-target` header naming the
//! operation and a JSON body. The whole body is bound into the signature,
//! so this crate also exercises the signer's literal payload-hash path.
//!
//! ```no_run
//! use awslite_core::{Context, Signer};
//! use awslite_aws_v4::{DefaultCredentialProvider, RequestSigner};
//! use awslite_sqs::{Client, Config, SendMessage};
//!
//! # async fn example() -> awslite_sqs::Result<()> {
//! let ctx = Context::new();
//! let config = Config::new("us-east-1");
//! let signer = Signer::new(
//!     ctx.clone(),
//!     DefaultCredentialProvider::new(),
//!     RequestSigner::new("sqs", config.region()),
//! );
//! let client = Client::new(ctx, signer, config)?;
//!
//! let sent = client
//!     .send_message(&SendMessage::new(
//!         "https://sqs.us-east-1.amazonaws.com/123456789012/my-queue",
//!         "hello",
//!     ))
//!     .await?;
//! println!("sent {}", sent.message_id);
//! # Ok(())
//! # }
//! ```

mod config;
pub use config::Config;

mod error;
pub use error::{Error, Result};

mod client;
pub use client::Client;

mod message;
pub use message::{
    Message, ReceiveMessage, ReceiveMessageOutput, SendMessage, SendMessageOutput,
};

#[cfg(test)]
mod testing;
