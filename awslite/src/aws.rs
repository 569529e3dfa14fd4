//! AWS SigV4 signing with convenience constructors.

pub use awslite_aws_v4::*;

use crate::{default_context, Signer};

/// Default AWS signer type with commonly used components.
pub type DefaultSigner = Signer<Credential>;

/// Create a default AWS signer for a service and region.
///
/// The signer uses the default context (reqwest transport, OS environment)
/// and the default credential provider (environment variables).
///
/// # Example
///
/// ```no_run
/// # #[tokio::main]
/// # async fn main() -> awslite_core::Result<()> {
/// let signer = awslite::aws::default_signer("s3", "us-east-1");
///
/// let mut req = http::Request::builder()
///     .method("GET")
///     .uri("https://my-bucket.s3.us-east-1.amazonaws.com/my-object")
///     .body(())
///     .unwrap()
///     .into_parts()
///     .0;
///
/// signer.sign(&mut req, None).await?;
/// # Ok(())
/// # }
/// ```
///
/// Use [`Signer::with_credential_provider`] to sign with something other
/// than environment credentials:
///
/// ```no_run
/// use awslite::aws::{default_signer, StaticCredentialProvider};
///
/// let signer = default_signer("s3", "us-east-1").with_credential_provider(
///     StaticCredentialProvider::new("my-access-key", "my-secret-key"),
/// );
/// ```
pub fn default_signer(service: &str, region: &str) -> DefaultSigner {
    Signer::new(
        default_context(),
        DefaultCredentialProvider::new(),
        RequestSigner::new(service, region),
    )
}
