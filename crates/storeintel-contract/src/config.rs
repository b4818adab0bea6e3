use std::fmt;
use std::time::Duration;

use url::Url;

use crate::cli::RequestMethod;
use crate::error::{ContractError, ContractResult};

pub const DEFAULT_BASE_URL: &str = "https://api.sensortower.com/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the service under test. Built once by the CLI and
/// passed down explicitly; nothing below the CLI reads the environment.
#[derive(Clone)]
pub struct ServiceConfig {
    base_url: Url,
    auth_token: String,
    method: RequestMethod,
    timeout: Duration,
}

impl ServiceConfig {
    pub fn new(
        base_url: &str,
        auth_token: impl Into<String>,
        method: RequestMethod,
        timeout: Duration,
    ) -> ContractResult<Self> {
        let base_url = Url::parse(base_url)?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ContractError::InvalidArgument(format!(
                "base url '{base_url}' must use http or https"
            )));
        }
        let auth_token = auth_token.into();
        if auth_token.trim().is_empty() {
            return Err(ContractError::InvalidArgument(
                "auth token must not be empty".to_string(),
            ));
        }
        if timeout.is_zero() {
            return Err(ContractError::InvalidArgument(
                "request timeout must be positive".to_string(),
            ));
        }
        Ok(Self {
            base_url,
            auth_token,
            method,
            timeout,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn auth_token(&self) -> &str {
        &self.auth_token
    }

    pub fn method(&self) -> RequestMethod {
        self.method
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("base_url", &self.base_url.as_str())
            .field("auth_token", &"***")
            .field("method", &self.method)
            .field("timeout", &self.timeout)
            .finish()
    }
}
