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
    timeout: Option<Duration>,
}

impl Config {
    /// Create a config for the given region, addressing
    /// `sqs.<region>.amazonaws.com`.
    pub fn new(region: &str) -> Self {
        Self {
            region: region.to_string(),
            endpoint: None,
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

    /// Address an SQS-compatible endpoint instead of AWS, e.g.
    /// `http://127.0.0.1:9324`.
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = Some(endpoint.to_string());
        self
    }

    /// Cancel any request that has not completed within `timeout`.
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

    pub(crate) fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}
