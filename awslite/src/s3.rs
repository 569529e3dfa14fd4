//! S3 client with convenience constructors.

pub use awslite_s3::*;

use crate::default_context;
use awslite_aws_v4::{DefaultCredentialProvider, RequestSigner};
use awslite_core::Signer;

/// Create an S3 client for a region with the standard components: reqwest
/// transport, OS environment, environment credentials.
pub fn client(region: &str) -> Result<Client> {
    client_with_config(Config::new(region))
}

/// Create an S3 client entirely from the environment (`AWS_REGION`,
/// `AWS_ENDPOINT_URL`, credential variables).
pub fn client_from_env() -> Result<Client> {
    let ctx = default_context();
    let config = Config::from_env(&ctx)?;
    let signer = Signer::new(
        ctx.clone(),
        DefaultCredentialProvider::new(),
        RequestSigner::new("s3", config.region()),
    );
    Client::new(ctx, signer, config)
}

/// Create an S3 client from an explicit [`Config`], with the standard
/// context and credential chain.
pub fn client_with_config(config: Config) -> Result<Client> {
    let ctx = default_context();
    let signer = Signer::new(
        ctx.clone(),
        DefaultCredentialProvider::new(),
        RequestSigner::new("s3", config.region()),
    );
    Client::new(ctx, signer, config)
}
