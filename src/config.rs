//! Client configuration for NCBI EUtils requests

use std::time::Duration;

use crate::rate_limit::RateLimiter;
use crate::retry::RetryConfig;

/// Default EUtils endpoint
pub const DEFAULT_BASE_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";

/// Tool name reported to NCBI when none is configured
pub const DEFAULT_TOOL: &str = "elink-client";

/// Configuration for [`ELinkClient`](crate::ELinkClient)
///
/// NCBI asks every caller to identify itself with `tool` and `email`, and an
/// API key raises the permitted request rate from 3 to 10 per second.
///
/// # Example
///
/// ```
/// use elink_client::ClientConfig;
///
/// let config = ClientConfig::new()
///     .with_api_key("your_api_key_here")
///     .with_email("researcher@university.edu")
///     .with_tool("LinkExplorer");
///
/// assert_eq!(config.effective_rate_limit(), 10.0);
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// NCBI API key
    pub api_key: Option<String>,
    /// Contact email sent with each request
    pub email: Option<String>,
    /// Tool name sent with each request
    pub tool: Option<String>,
    /// Requests per second; `None` picks the NCBI default for the key state
    pub rate_limit: Option<f64>,
    /// HTTP timeout per request
    pub timeout: Duration,
    /// Override for the EUtils base URL
    pub base_url: Option<String>,
    /// Override for the HTTP user agent
    pub user_agent: Option<String>,
    /// Retry policy for transient failures
    pub retry_config: RetryConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            email: None,
            tool: None,
            rate_limit: None,
            timeout: Duration::from_secs(30),
            base_url: None,
            user_agent: None,
            retry_config: RetryConfig::default(),
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_api_key<S: Into<String>>(mut self, api_key: S) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_email<S: Into<String>>(mut self, email: S) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_tool<S: Into<String>>(mut self, tool: S) -> Self {
        self.tool = Some(tool.into());
        self
    }

    /// Override the requests-per-second limit
    ///
    /// Rates that are not finite and positive are ignored in favor of the
    /// NCBI default.
    pub fn with_rate_limit(mut self, rate: f64) -> Self {
        self.rate_limit = Some(rate);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_timeout_seconds(self, seconds: u64) -> Self {
        self.with_timeout(Duration::from_secs(seconds))
    }

    /// Point the client at another EUtils-compatible endpoint (mock servers, mirrors)
    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_retry_config(mut self, retry_config: RetryConfig) -> Self {
        self.retry_config = retry_config;
        self
    }

    /// Requests per second actually applied
    pub fn effective_rate_limit(&self) -> f64 {
        self.rate_limit
            .filter(|rate| RateLimiter::is_usable_rate(*rate))
            .unwrap_or(if self.api_key.is_some() { 10.0 } else { 3.0 })
    }

    pub fn effective_base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
    }

    pub fn effective_user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(|| format!("elink-client/{}", env!("CARGO_PKG_VERSION")))
    }

    pub fn effective_tool(&self) -> &str {
        self.tool.as_deref().unwrap_or(DEFAULT_TOOL)
    }

    /// Identification parameters appended to every request
    pub fn build_api_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();

        if let Some(api_key) = &self.api_key {
            params.push(("api_key".to_string(), api_key.clone()));
        }
        if let Some(email) = &self.email {
            params.push(("email".to_string(), email.clone()));
        }
        params.push(("tool".to_string(), self.effective_tool().to_string()));

        params
    }

    pub fn create_rate_limiter(&self) -> RateLimiter {
        RateLimiter::new(self.effective_rate_limit())
    }
}
