use crate::constants::*;
use crate::Credential;
use async_trait::async_trait;
use awslite_core::{Context, ProvideCredential, Result};

/// EnvCredentialProvider loads AWS credentials from environment variables.
///
/// This provider looks for the following environment variables:
/// - `AWS_ACCESS_KEY_ID` (or the legacy `AWS_ACCESS_KEY`)
/// - `AWS_SECRET_ACCESS_KEY` (or the legacy `AWS_SECRET_KEY`)
/// - `AWS_SESSION_TOKEN` (optional)
#[derive(Debug, Default, Clone)]
pub struct EnvCredentialProvider;

impl EnvCredentialProvider {
    /// Create a new EnvCredentialProvider.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProvideCredential for EnvCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let access_key_id = ctx
            .env_var(AWS_ACCESS_KEY_ID)
            .or_else(|| ctx.env_var(AWS_ACCESS_KEY));
        let secret_access_key = ctx
            .env_var(AWS_SECRET_ACCESS_KEY)
            .or_else(|| ctx.env_var(AWS_SECRET_KEY));

        match (access_key_id, secret_access_key) {
            (Some(ak), Some(sk)) => Ok(Some(Credential {
                access_key_id: ak,
                secret_access_key: sk,
                session_token: ctx.env_var(AWS_SESSION_TOKEN),
                expires_in: None,
            })),
            _ => Ok(None),
        }
    }
}
