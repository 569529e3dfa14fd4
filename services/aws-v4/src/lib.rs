//! AWS SigV4 request signing.

mod constants;

mod credential;
pub use credential::Credential;

mod key_cache;
pub use key_cache::SigningKeyCache;

mod provide_credential;
pub use provide_credential::{
    DefaultCredentialProvider, EnvCredentialProvider, ProvideCredentialChain,
    StaticCredentialProvider,
};

mod sign_request;
pub use sign_request::RequestSigner;
