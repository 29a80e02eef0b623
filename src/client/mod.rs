mod egquery;
mod elink;

pub use elink::ELinkRequest;

use reqwest::{Client, Response};
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::document::{XmlDocument, check_service_errors};
use crate::error::{ELinkError, Result};
use crate::rate_limit::RateLimiter;
use crate::retry::with_retry;

/// Client for the NCBI ELink and EGQuery endpoints
///
/// Every request is identified with the configured `tool`, `email` and
/// `api_key`, throttled by a shared [`RateLimiter`] and retried on transient
/// failures. Responses that carry an `<ERROR>` element are turned into
/// [`ELinkError::Upstream`] before any parsing happens.
#[derive(Clone)]
pub struct ELinkClient {
    client: Client,
    base_url: String,
    rate_limiter: RateLimiter,
    config: ClientConfig,
}

impl ELinkClient {
    /// Create a client with default configuration (3 requests/second, no API key)
    ///
    /// # Example
    ///
    /// ```
    /// use elink_client::ELinkClient;
    ///
    /// let client = ELinkClient::new();
    /// ```
    pub fn new() -> Self {
        Self::with_config(ClientConfig::new())
    }

    /// Create a client with custom configuration
    ///
    /// # Example
    ///
    /// ```
    /// use elink_client::{ClientConfig, ELinkClient};
    ///
    /// let config = ClientConfig::new()
    ///     .with_api_key("your_api_key_here")
    ///     .with_email("researcher@university.edu");
    ///
    /// let client = ELinkClient::with_config(config);
    /// ```
    pub fn with_config(config: ClientConfig) -> Self {
        let client = Client::builder()
            .user_agent(config.effective_user_agent())
            .timeout(config.timeout)
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Falling back to a default HTTP client");
                Client::new()
            });

        Self::from_parts(client, config)
    }

    /// Create a client around a preconfigured HTTP client, with default configuration
    pub fn with_client(client: Client) -> Self {
        Self::from_parts(client, ClientConfig::new())
    }

    fn from_parts(client: Client, config: ClientConfig) -> Self {
        let rate_limiter = config.create_rate_limiter();
        let base_url = config.effective_base_url().to_string();

        Self {
            client,
            base_url,
            rate_limiter,
            config,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub(crate) fn endpoint(&self, utility: &str) -> String {
        format!("{}/{}", self.base_url, utility)
    }

    /// Fetch `url` and return its body as a document with no service errors
    pub(crate) async fn fetch_document(&self, url: &str) -> Result<XmlDocument> {
        let response = self.make_request(url).await?;
        let body = response.text().await?;

        let document = XmlDocument::parse(&body)?;
        check_service_errors(&document)?;
        Ok(document)
    }

    /// Send a GET request with identification parameters, rate limiting and retries
    pub(crate) async fn make_request(&self, url: &str) -> Result<Response> {
        let mut final_url = url.to_string();
        let api_params = self.config.build_api_params();

        if !api_params.is_empty() {
            let separator = if url.contains('?') { '&' } else { '?' };
            final_url.push(separator);

            let param_strings: Vec<String> = api_params
                .into_iter()
                .map(|(key, value)| format!("{}={}", key, urlencoding::encode(&value)))
                .collect();
            final_url.push_str(&param_strings.join("&"));
        }

        let response = with_retry(
            || async {
                self.rate_limiter.acquire().await?;
                debug!("Making API request to: {}", final_url);
                let response = self
                    .client
                    .get(&final_url)
                    .send()
                    .await
                    .map_err(ELinkError::from)?;

                if response.status().is_server_error() || response.status().as_u16() == 429 {
                    return Err(status_error(&response));
                }

                Ok(response)
            },
            &self.config.retry_config,
            "NCBI API request",
        )
        .await?;

        if !response.status().is_success() {
            warn!("API request failed with status: {}", response.status());
            return Err(status_error(&response));
        }

        Ok(response)
    }
}

fn status_error(response: &Response) -> ELinkError {
    ELinkError::ApiError {
        status: response.status().as_u16(),
        message: response
            .status()
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string(),
    }
}

impl Default for ELinkClient {
    fn default() -> Self {
        Self::new()
    }
}
