use crate::Credential;
use async_trait::async_trait;
use awslite_core::{Context, ProvideCredential, Result};

/// A provider that always hands out one fixed key pair.
///
/// Useful when the caller already holds credentials (a config file it
/// parsed itself, a secret store) and no discovery should happen. The
/// credential never expires.
#[derive(Debug, Clone)]
pub struct StaticCredentialProvider {
    credential: Credential,
}

impl StaticCredentialProvider {
    /// Build a provider around an access key id / secret access key pair.
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            credential: Credential {
                access_key_id: access_key_id.into(),
                secret_access_key: secret_access_key.into(),
                session_token: None,
                expires_in: None,
            },
        }
    }

    /// Attach a session token for temporary credentials.
    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.credential.session_token = Some(token.into());
        self
    }
}

#[async_trait]
impl ProvideCredential for StaticCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, _: &Context) -> Result<Option<Self::Credential>> {
        Ok(Some(self.credential.clone()))
    }
}
