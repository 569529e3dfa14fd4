use crate::{Config, Error, Result};
use awslite_aws_v4::Credential;
use awslite_core::{Context, Error as CoreError, Signer};
use bytes::Bytes;
use http::uri::Uri;
use http::{HeaderMap, Method};
use log::debug;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Deserialize;

/// Path encoding: every byte percent-escaped except unreserved characters
/// and the segment separator.
static PATH_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Query encoding: like the path set but `/` is escaped too.
static QUERY_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// An S3 request under construction, before host resolution and signing.
#[derive(Debug)]
pub(crate) struct S3Request {
    pub method: Method,
    pub bucket: String,
    /// `None` addresses the bucket itself.
    pub key: Option<String>,
    pub query: Vec<(String, String)>,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
}

impl S3Request {
    pub(crate) fn new(method: Method, bucket: &str, key: Option<&str>) -> Result<Self> {
        if bucket.is_empty() {
            return Err(Error::InvalidRequest("bucket must not be empty".into()));
        }
        if let Some(key) = key {
            if key.is_empty() {
                return Err(Error::InvalidRequest(
                    "key is required and should be at least one character long".into(),
                ));
            }
        }

        Ok(Self {
            method,
            bucket: bucket.to_string(),
            key: key.map(|k| k.to_string()),
            query: Vec::new(),
            headers: HeaderMap::new(),
            body: None,
        })
    }

    pub(crate) fn query_push(mut self, key: &str, value: &str) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub(crate) fn body(mut self, body: Bytes) -> Self {
        self.body = Some(body);
        self
    }
}

/// An S3 client: signs each request with SigV4 and sends it through the
/// context's transport.
///
/// The client never retries; wrap the transport if retry/backoff is wanted.
#[derive(Clone, Debug)]
pub struct Client {
    ctx: Context,
    signer: Signer<Credential>,
    config: Config,
}

impl Client {
    /// Create a new client.
    ///
    /// Fails with `ConfigInvalid` when the region is empty or a configured
    /// endpoint does not parse as an absolute URI.
    pub fn new(ctx: Context, signer: Signer<Credential>, config: Config) -> Result<Self> {
        if config.region().is_empty() {
            return Err(Error::Core(CoreError::config_invalid("region is not set")));
        }
        if let Some(endpoint) = config.endpoint() {
            let uri: Uri = endpoint.parse().map_err(|e| {
                CoreError::config_invalid(format!("endpoint {endpoint} is not a valid URI"))
                    .with_source(e)
            })?;
            if uri.authority().is_none() {
                return Err(Error::Core(CoreError::config_invalid(format!(
                    "endpoint {endpoint} has no host"
                ))));
            }
        }

        Ok(Self {
            ctx,
            signer,
            config,
        })
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Sign and send a request, decoding service rejections.
    pub(crate) async fn execute(&self, req: S3Request) -> Result<http::Response<Bytes>> {
        let (scheme, host) = self.scheme_and_host();

        let (host, path) = if self.config.path_style() {
            let mut path = format!("/{}", utf8_percent_encode(&req.bucket, &PATH_ENCODE_SET));
            if let Some(key) = &req.key {
                path.push('/');
                path.push_str(&utf8_percent_encode(key, &PATH_ENCODE_SET).to_string());
            }
            (host, path)
        } else {
            let path = match &req.key {
                Some(key) => format!("/{}", utf8_percent_encode(key, &PATH_ENCODE_SET)),
                None => "/".to_string(),
            };
            (format!("{}.{host}", req.bucket), path)
        };

        let mut uri = format!("{scheme}://{host}{path}");
        for (i, (k, v)) in req.query.iter().enumerate() {
            uri.push(if i == 0 { '?' } else { '&' });
            uri.push_str(&utf8_percent_encode(k, &QUERY_ENCODE_SET).to_string());
            uri.push('=');
            uri.push_str(&utf8_percent_encode(v, &QUERY_ENCODE_SET).to_string());
        }
        debug!("executing {} {uri}", req.method);

        let mut request = http::Request::builder()
            .method(req.method)
            .uri(uri)
            .body(req.body.clone().unwrap_or_default())
            .map_err(CoreError::from)?;
        *request.headers_mut() = req.headers;

        let (mut parts, body) = request.into_parts();
        self.signer.sign(&mut parts, req.body.as_ref()).await?;
        let request = http::Request::from_parts(parts, body);

        let response = match self.config.timeout() {
            Some(timeout) => tokio::time::timeout(timeout, self.ctx.http_send(request))
                .await
                .map_err(|_| {
                    CoreError::request_cancelled(format!(
                        "request did not complete within {timeout:?}"
                    ))
                })??,
            None => self.ctx.http_send(request).await?,
        };

        if !response.status().is_success() {
            return Err(decode_service_error(response));
        }

        Ok(response)
    }

    fn scheme_and_host(&self) -> (String, String) {
        match self.config.endpoint() {
            Some(endpoint) => {
                // Validated in `new`.
                let uri: Uri = endpoint.parse().expect("endpoint was validated");
                (
                    uri.scheme_str().unwrap_or("https").to_string(),
                    uri.authority().expect("endpoint was validated").to_string(),
                )
            }
            None => (
                "https".to_string(),
                format!("s3.{}.amazonaws.com", self.config.region()),
            ),
        }
    }
}

/// The error document S3 returns with non-2xx responses.
///
/// ```xml
/// <Error><Code>NoSuchKey</Code><Message>...</Message></Error>
/// ```
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(rename = "Code")]
    code: String,
    #[serde(rename = "Message")]
    message: String,
}

fn decode_service_error(response: http::Response<Bytes>) -> Error {
    let status = response.status();
    let body = String::from_utf8_lossy(response.body()).to_string();

    match quick_xml::de::from_str::<ErrorResponse>(&body) {
        Ok(decoded) => Error::Service {
            status,
            code: decoded.code,
            message: decoded.message,
        },
        Err(_) => Error::Service {
            status,
            code: "unknown error".to_string(),
            message: body,
        },
    }
}
