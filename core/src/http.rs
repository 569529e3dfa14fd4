use crate::Result;
use bytes::Bytes;
use std::fmt::Debug;

/// HttpSend is used to send http requests on behalf of the client.
///
/// This is the boundary to real HTTP transport: connection pooling, TLS and
/// redirects all live behind it. awslite itself never retries; wrap an
/// implementation if retry/backoff is wanted.
#[async_trait::async_trait]
pub trait HttpSend: Debug + Send + Sync + 'static {
    /// Send http request and return the response.
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>>;
}
