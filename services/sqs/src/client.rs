use crate::{Config, Error, Result};
use awslite_aws_v4::Credential;
use awslite_core::{Context, Error as CoreError, Signer};
use bytes::Bytes;
use http::uri::Uri;
use http::{HeaderValue, Method};
use log::debug;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

const X_AMZ_TARGET: &str = "x-amz-target";
const AMZ_JSON: &str = "application/x-amz-json-1.0";

/// An SQS client: wraps every operation into a signed `x-amz-json-1.0`
/// call against the queue endpoint.
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

    /// Sign and send one operation, decoding the JSON reply.
    pub(crate) async fn execute<T: DeserializeOwned>(
        &self,
        target: &str,
        input: &impl Serialize,
    ) -> Result<T> {
        let body = Bytes::from(serde_json::to_vec(input).map_err(|e| {
            CoreError::unexpected("failed to serialize request payload").with_source(e)
        })?);

        let (scheme, host) = self.scheme_and_host();
        let uri = format!("{scheme}://{host}/");
        debug!("executing {target} against {uri}");

        let mut request = http::Request::builder()
            .method(Method::POST)
            .uri(uri)
            .body(body.clone())
            .map_err(CoreError::from)?;
        request.headers_mut().insert(
            X_AMZ_TARGET,
            HeaderValue::from_str(target).map_err(CoreError::from)?,
        );
        request
            .headers_mut()
            .insert(http::header::CONTENT_TYPE, HeaderValue::from_static(AMZ_JSON));

        let (mut parts, payload) = request.into_parts();
        self.signer.sign(&mut parts, Some(&body)).await?;
        let request = http::Request::from_parts(parts, payload);

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

        serde_json::from_slice(response.body()).map_err(|e| {
            Error::Core(
                CoreError::response_invalid(format!("undecodable {target} response")).with_source(e),
            )
        })
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
                format!("sqs.{}.amazonaws.com", self.config.region()),
            ),
        }
    }
}

/// The error document the JSON protocol returns with non-2xx responses:
///
/// ```json
/// {"__type":"com.amazonaws.sqs#QueueDoesNotExist","message":"..."}
/// ```
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(rename = "__type")]
    error_type: String,
    #[serde(default, alias = "Message")]
    message: Option<String>,
}

fn decode_service_error(response: http::Response<Bytes>) -> Error {
    let status = response.status();
    let body = String::from_utf8_lossy(response.body()).to_string();

    match serde_json::from_str::<ErrorResponse>(&body) {
        Ok(decoded) => {
            // The type is namespaced: everything after `#` is the code.
            let code = decoded
                .error_type
                .rsplit('#')
                .next()
                .unwrap_or(&decoded.error_type)
                .to_string();
            Error::Service {
                status,
                code,
                message: decoded.message.unwrap_or_default(),
            }
        }
        Err(_) => Error::Service {
            status,
            code: "unknown error".to_string(),
            message: body,
        },
    }
}
