//! A scripted transport for exercising the client without a network.

use crate::{Client, Config};
use async_trait::async_trait;
use awslite_aws_v4::{RequestSigner, StaticCredentialProvider};
use awslite_core::{Context, HttpSend, Result as CoreResult, Signer};
use bytes::Bytes;
use http::{HeaderMap, Method, StatusCode};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One request as the transport saw it.
#[derive(Debug, Clone)]
pub(crate) struct Recorded {
    pub method: Method,
    pub uri: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Records every request and answers with a configurable JSON reply.
#[derive(Debug, Clone, Default)]
pub(crate) struct MockHttp {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    requests: Vec<Recorded>,
    delay: Option<Duration>,
    reply: Option<String>,
    fail: Option<(StatusCode, String)>,
}

impl MockHttp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn context(&self) -> Context {
        Context::new().with_http_send(self.clone())
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.inner.lock().unwrap().requests.clone()
    }

    pub fn respond_with(&self, body: &str) {
        self.inner.lock().unwrap().reply = Some(body.to_string());
    }

    pub fn fail_with(&self, status: StatusCode, body: &str) {
        self.inner.lock().unwrap().fail = Some((status, body.to_string()));
    }

    pub fn delay(&self, delay: Duration) {
        self.inner.lock().unwrap().delay = Some(delay);
    }
}

#[async_trait]
impl HttpSend for MockHttp {
    async fn http_send(&self, req: http::Request<Bytes>) -> CoreResult<http::Response<Bytes>> {
        let (delay, status, body) = {
            let mut inner = self.inner.lock().unwrap();
            inner.requests.push(Recorded {
                method: req.method().clone(),
                uri: req.uri().to_string(),
                headers: req.headers().clone(),
                body: req.body().clone(),
            });
            match &inner.fail {
                Some((status, body)) => (inner.delay, *status, body.clone()),
                None => (
                    inner.delay,
                    StatusCode::OK,
                    inner.reply.clone().unwrap_or_else(|| "{}".to_string()),
                ),
            }
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut resp = http::Response::new(Bytes::from(body));
        *resp.status_mut() = status;
        Ok(resp)
    }
}

pub(crate) fn test_client(mock: &MockHttp, configure: impl FnOnce(Config) -> Config) -> Client {
    let ctx = mock.context();
    let config = configure(Config::new("us-east-1"));
    let signer = Signer::new(
        ctx.clone(),
        StaticCredentialProvider::new("access_key_id", "secret_access_key"),
        RequestSigner::new("sqs", config.region()),
    );
    Client::new(ctx, signer, config).expect("test config must be valid")
}
