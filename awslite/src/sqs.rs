//! SQS client with convenience constructors.

pub use awslite_sqs::*;

use crate::default_context;
use awslite_aws_v4::{DefaultCredentialProvider, RequestSigner};
use awslite_core::Signer;

/// Create an SQS client for a region with the standard components: reqwest
/// transport, OS environment, environment credentials.
pub fn client(region: &str) -> Result<Client> {
    client_with_config(Config::new(region))
}

/// Create an SQS client entirely from the environment (`AWS_REGION`,
/// `AWS_ENDPOINT_URL`, credential variables).
pub fn client_from_env() -> Result<Client> {
    let ctx = default_context();
    let config = Config::from_env(&ctx)?;
    client_for(ctx, config)
}

/// Create an SQS client from an explicit [`Config`], with the standard
/// context and credential chain.
pub fn client_with_config(config: Config) -> Result<Client> {
    client_for(default_context(), config)
}

fn client_for(ctx: awslite_core::Context, config: Config) -> Result<Client> {
    let signer = Signer::new(
        ctx.clone(),
        DefaultCredentialProvider::new(),
        RequestSigner::new("sqs", config.region()),
    );
    Client::new(ctx, signer, config)
}
