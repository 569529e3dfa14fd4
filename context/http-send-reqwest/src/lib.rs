//! reqwest backed [`HttpSend`] implementation.

use async_trait::async_trait;
use awslite_core::{Error, HttpSend, Result};
use bytes::Bytes;
use reqwest::Client;

/// Sends requests with a shared [`reqwest::Client`].
///
/// Timeouts configured on the client (or hit mid-transfer) surface as
/// `RequestCancelled` so callers can tell them apart from connection
/// failures, which surface as `TransportFailed`.
#[derive(Debug, Default)]
pub struct ReqwestHttpSend {
    client: Client,
}

impl ReqwestHttpSend {
    /// Create a new ReqwestHttpSend with a reqwest::Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpSend for ReqwestHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        let req = reqwest::Request::try_from(req)
            .map_err(|e| Error::request_invalid("failed to build transport request").with_source(e))?;

        let resp = self.client.execute(req).await.map_err(map_send_error)?;

        let status = resp.status();
        let headers = resp.headers().clone();
        let body = resp.bytes().await.map_err(map_send_error)?;

        let mut out = http::Response::new(body);
        *out.status_mut() = status;
        *out.headers_mut() = headers;
        Ok(out)
    }
}

fn map_send_error(err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::request_cancelled("request timed out in transport").with_source(err)
    } else {
        Error::transport_failed(err.to_string()).with_source(err)
    }
}
