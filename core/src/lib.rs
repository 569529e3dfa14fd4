//! Core components for signing API requests.
//!
//! This crate provides the foundational types and traits for the awslite
//! ecosystem. Service crates build on three seams:
//!
//! - **Context**: a container holding the HTTP transport and environment
//!   access used while loading credentials and sending requests
//! - **Traits**: [`ProvideCredential`] for credential loading and
//!   [`SignRequest`] for service-specific request signing
//! - **Signer**: the orchestrator that caches credentials and drives the
//!   signing implementation
//!
//! ## Example
//!
//! ```no_run
//! use awslite_core::{Context, Signer, ProvideCredential, SignRequest, SigningCredential};
//! use async_trait::async_trait;
//!
//! #[derive(Clone, Debug)]
//! struct MyCredential {
//!     key: String,
//!     secret: String,
//! }
//!
//! impl SigningCredential for MyCredential {
//!     fn is_valid(&self) -> bool {
//!         !self.key.is_empty() && !self.secret.is_empty()
//!     }
//! }
//!
//! #[derive(Debug)]
//! struct MyLoader;
//!
//! #[async_trait]
//! impl ProvideCredential for MyLoader {
//!     type Credential = MyCredential;
//!
//!     async fn provide_credential(&self, _: &Context) -> awslite_core::Result<Option<Self::Credential>> {
//!         Ok(Some(MyCredential {
//!             key: "my-access-key".to_string(),
//!             secret: "my-secret-key".to_string(),
//!         }))
//!     }
//! }
//!
//! #[derive(Debug)]
//! struct MySigner;
//!
//! #[async_trait]
//! impl SignRequest for MySigner {
//!     type Credential = MyCredential;
//!
//!     async fn sign_request(
//!         &self,
//!         _ctx: &Context,
//!         _req: &mut http::request::Parts,
//!         _body: Option<&bytes::Bytes>,
//!         _cred: Option<&Self::Credential>,
//!     ) -> awslite_core::Result<()> {
//!         todo!()
//!     }
//! }
//!
//! # async fn example() -> awslite_core::Result<()> {
//! let ctx = Context::new();
//! let signer = Signer::new(ctx, MyLoader, MySigner);
//!
//! let mut parts = http::Request::builder()
//!     .method("GET")
//!     .uri("https://example.com")
//!     .body(())
//!     .unwrap()
//!     .into_parts()
//!     .0;
//!
//! signer.sign(&mut parts, None).await?;
//! # Ok(())
//! # }
//! ```

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;
pub mod utils;

mod context;
pub use context::Context;
mod env;
pub use env::{Env, OsEnv, StaticEnv};
mod http;
pub use crate::http::HttpSend;

mod error;
pub use error::{Error, ErrorKind, Result};

mod api;
pub use api::{ProvideCredential, SignRequest, SigningCredential};
mod request;
pub use request::SigningRequest;
mod signer;
pub use signer::Signer;
