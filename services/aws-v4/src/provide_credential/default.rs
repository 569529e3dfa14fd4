use crate::{Credential, EnvCredentialProvider, ProvideCredentialChain};
use async_trait::async_trait;
use awslite_core::{Context, ProvideCredential, Result};

/// DefaultCredentialProvider is the provider used when nothing else is
/// configured.
///
/// Today the chain only consults environment variables. Credential discovery
/// from profile files or instance metadata is deliberately not part of this
/// crate; compose your own [`ProvideCredentialChain`] if you need more
/// sources.
#[derive(Debug)]
pub struct DefaultCredentialProvider {
    chain: ProvideCredentialChain<Credential>,
}

impl Default for DefaultCredentialProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl DefaultCredentialProvider {
    /// Create the default provider chain.
    pub fn new() -> Self {
        Self {
            chain: ProvideCredentialChain::new().push(EnvCredentialProvider::new()),
        }
    }
}

#[async_trait]
impl ProvideCredential for DefaultCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        self.chain.provide_credential(ctx).await
    }
}
