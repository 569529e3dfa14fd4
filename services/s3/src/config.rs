use crate::{Error, Result};
use awslite_core::{Context, Error as CoreError};
use std::time::Duration;

// Env values consulted by `Config::from_env`.
const AWS_REGION: &str = "AWS_REGION";
const AWS_DEFAULT_REGION: &str = "AWS_DEFAULT_REGION";
const AWS_ENDPOINT_URL: &str = "AWS_ENDPOINT_URL";

/// Client configuration.
#[derive(Debug, Clone)]
pub struct Config {
    region: String,
    endpoint: Option<String>,
    path_style: bool,
    timeout: Option<Duration>,
}

impl Config {
    /// Create a config for the given region, addressing
    /// `s3.<region>.amazonaws.com` virtual-host style.
    pub fn new(region: &str) -> Self {
        Self {
            region: region.to_string(),
            endpoint: None,
            path_style: false,
            timeout: None,
        }
    }

    /// Load the config from the environment: `AWS_REGION` (or
    /// `AWS_DEFAULT_REGION`) and optionally `AWS_ENDPOINT_URL`.
    pub fn from_env(ctx: &Context) -> Result<Self> {
        let region = ctx
            .env_var(AWS_REGION)
            .or_else(|| ctx.env_var(AWS_DEFAULT_REGION))
            .ok_or_else(|| {
                Error::Core(CoreError::config_invalid(
                    "region is not set in the environment",
                ))
            })?;

        let mut config = Config::new(&region);
        config.endpoint = ctx.env_var(AWS_ENDPOINT_URL);
        Ok(config)
    }

    /// Address an S3-compatible endpoint instead of AWS, e.g.
    /// `http://127.0.0.1:9000`.
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = Some(endpoint.to_string());
        self
    }

    /// Put the bucket in the path instead of the host. Required by most
    /// self-hosted S3-compatible services.
    pub fn with_path_style(mut self, path_style: bool) -> Self {
        self.path_style = path_style;
        self
    }

    /// Cancel any request that has not completed within `timeout`.
    ///
    /// Cancellation surfaces as
    /// [`ErrorKind::RequestCancelled`](awslite_core::ErrorKind), distinct
    /// from transport failures and from service rejections.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The configured region.
    pub fn region(&self) -> &str {
        &self.region
    }

    pub(crate) fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    pub(crate) fn path_style(&self) -> bool {
        self.path_style
    }

    pub(crate) fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}
