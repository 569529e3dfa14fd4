//! A scripted transport for exercising the client without a network.

use crate::{Client, Config};
use async_trait::async_trait;
use awslite_aws_v4::{Credential, RequestSigner, StaticCredentialProvider};
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

/// An in-memory S3 lookalike. Routes multipart calls by their query
/// markers, records everything, and can be told to misbehave in the ways
/// the orchestrator has to survive.
#[derive(Debug, Clone, Default)]
pub(crate) struct MockHttp {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    requests: Vec<Recorded>,
    delay: Option<Duration>,
    fail_all: Option<(StatusCode, String)>,
    fail_part: Option<u16>,
    fail_create: bool,
    fail_complete: bool,
    fail_abort: bool,
    omit_etag: bool,
    empty_upload_id: bool,
}

const INTERNAL_ERROR_XML: &str =
    "<Error><Code>InternalError</Code><Message>We encountered an internal error.</Message></Error>";

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

    pub fn delay(&self, delay: Duration) {
        self.inner.lock().unwrap().delay = Some(delay);
    }

    pub fn fail_with(&self, status: StatusCode, body: &str) {
        self.inner.lock().unwrap().fail_all = Some((status, body.to_string()));
    }

    pub fn fail_part(&self, part_number: u16) {
        self.inner.lock().unwrap().fail_part = Some(part_number);
    }

    pub fn fail_create(&self) {
        self.inner.lock().unwrap().fail_create = true;
    }

    pub fn fail_complete(&self) {
        self.inner.lock().unwrap().fail_complete = true;
    }

    pub fn fail_abort(&self) {
        self.inner.lock().unwrap().fail_abort = true;
    }

    pub fn omit_etag(&self) {
        self.inner.lock().unwrap().omit_etag = true;
    }

    pub fn empty_upload_id(&self) {
        self.inner.lock().unwrap().empty_upload_id = true;
    }

    fn respond(&self, req: &http::Request<Bytes>) -> http::Response<Bytes> {
        let inner = self.inner.lock().unwrap();
        let query = req.uri().query().unwrap_or_default();

        if let Some((status, body)) = &inner.fail_all {
            return response(*status, body.as_str());
        }

        if query.contains("uploads") && !query.contains("uploadId") {
            if inner.fail_create {
                return response(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_XML);
            }
            if inner.empty_upload_id {
                return response(
                    StatusCode::OK,
                    "<InitiateMultipartUploadResult>\
                     <Bucket>my-bucket</Bucket><Key>my-key</Key>\
                     <UploadId></UploadId>\
                     </InitiateMultipartUploadResult>",
                );
            }
            return response(
                StatusCode::OK,
                "<InitiateMultipartUploadResult>\
                 <Bucket>my-bucket</Bucket><Key>my-key</Key>\
                 <UploadId>test-upload-id</UploadId>\
                 </InitiateMultipartUploadResult>",
            );
        }

        if let Some(part_number) = query_part_number(query) {
            if inner.fail_part == Some(part_number) {
                return response(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_XML);
            }
            let mut resp = response(StatusCode::OK, "");
            if !inner.omit_etag {
                resp.headers_mut().insert(
                    http::header::ETAG,
                    format!("\"etag-{part_number}\"").parse().unwrap(),
                );
            }
            return resp;
        }

        if query.contains("uploadId") {
            if req.method() == Method::DELETE {
                if inner.fail_abort {
                    return response(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_XML);
                }
                return response(StatusCode::NO_CONTENT, "");
            }
            if inner.fail_complete {
                return response(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_XML);
            }
            return response(StatusCode::OK, "<CompleteMultipartUploadResult/>");
        }

        response(StatusCode::OK, "")
    }
}

#[async_trait]
impl HttpSend for MockHttp {
    async fn http_send(&self, req: http::Request<Bytes>) -> CoreResult<http::Response<Bytes>> {
        let delay = {
            let mut inner = self.inner.lock().unwrap();
            inner.requests.push(Recorded {
                method: req.method().clone(),
                uri: req.uri().to_string(),
                headers: req.headers().clone(),
                body: req.body().clone(),
            });
            inner.delay
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        Ok(self.respond(&req))
    }
}

fn response(status: StatusCode, body: &str) -> http::Response<Bytes> {
    let mut resp = http::Response::new(Bytes::copy_from_slice(body.as_bytes()));
    *resp.status_mut() = status;
    resp
}

fn query_part_number(query: &str) -> Option<u16> {
    let rest = query.split("partNumber=").nth(1)?;
    rest.split('&').next()?.parse().ok()
}

pub(crate) fn test_signer(ctx: &Context) -> Signer<Credential> {
    Signer::new(
        ctx.clone(),
        StaticCredentialProvider::new("access_key_id", "secret_access_key"),
        RequestSigner::new("s3", "us-east-1"),
    )
}

pub(crate) fn test_client(mock: &MockHttp, configure: impl FnOnce(Config) -> Config) -> Client {
    let ctx = mock.context();
    let config = configure(Config::new("us-east-1"));
    let signer = test_signer(&ctx);
    Client::new(ctx, signer, config).expect("test config must be valid")
}
