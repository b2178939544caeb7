//! HTTP provider client
//!
//! Transport-level concerns (timeout, auth header, transient-failure retry)
//! live here; the aggregation core above only sees the `ProviderClient`
//! capability and treats any failure as an ordinary per-provider degradation.

use crate::provider::{ProviderClient, RawDetail, RawListResponse};
use async_trait::async_trait;
use price_gateway_core::models::{DetailRecord, ListingEntry};
use price_gateway_core::{retry_with_backoff, PriceGatewayError, Result, RetryPolicy};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use std::time::Duration;
use tracing::{debug, warn};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// `ProviderClient` over a provider's JSON HTTP API
///
/// Expects `GET {base}/movies` to return `{"Movies": [...]}` and
/// `GET {base}/movie/{id}` to return a single detail record. Authenticates
/// with an `x-access-token` header.
pub struct HttpProviderClient {
    name: String,
    base_url: String,
    client: reqwest::Client,
    retry: RetryPolicy,
}

impl HttpProviderClient {
    /// Create a client for one provider endpoint
    ///
    /// # Arguments
    /// * `name` - provider name used in cache keys and error messages
    /// * `base_url` - endpoint base, with or without a trailing slash
    /// * `api_token` - shared access token sent on every request
    pub fn new(name: &str, base_url: &str, api_token: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let token = HeaderValue::from_str(api_token).map_err(|_| {
            PriceGatewayError::config(
                "API token contains characters not valid in a header",
                "PRICE_GATEWAY_API_TOKEN",
            )
        })?;
        headers.insert("x-access-token", token);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("price-gateway/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .map_err(|e| PriceGatewayError::Internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            name: name.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            retry: RetryPolicy::transient(),
        })
    }

    /// Issue a GET, retrying transport errors and 5xx responses
    async fn get_with_retry(&self, url: &str) -> Result<reqwest::Response> {
        retry_with_backoff(
            || async move {
                let response = self.client.get(url).send().await.map_err(|e| {
                    PriceGatewayError::provider(&self.name, format!("request failed: {e}"))
                })?;

                if response.status().is_server_error() {
                    return Err(PriceGatewayError::provider(
                        &self.name,
                        format!("upstream returned {}", response.status()),
                    ));
                }
                Ok(response)
            },
            self.retry.clone(),
            PriceGatewayError::is_retryable,
        )
        .await
    }
}

#[async_trait]
impl ProviderClient for HttpProviderClient {
    fn name(&self) -> &str {
        &self.name
    }

    async fn list_movies(&self) -> Result<Vec<ListingEntry>> {
        let url = format!("{}/movies", self.base_url);
        let response = self.get_with_retry(&url).await?;

        if !response.status().is_success() {
            return Err(PriceGatewayError::provider(
                &self.name,
                format!("listing request returned {}", response.status()),
            ));
        }

        let body: RawListResponse = response.json().await.map_err(|e| {
            PriceGatewayError::provider(&self.name, format!("invalid listing JSON: {e}"))
        })?;

        debug!(provider = %self.name, count = body.movies.len(), "listing fetched");
        Ok(body
            .movies
            .into_iter()
            .map(|m| m.into_entry(&self.name))
            .collect())
    }

    async fn movie_detail(&self, id: &str) -> Result<Option<DetailRecord>> {
        let url = format!("{}/movie/{}", self.base_url, urlencoding::encode(id));
        let response = self.get_with_retry(&url).await?;

        // A non-success status means the provider has no record for the id.
        if !response.status().is_success() {
            warn!(provider = %self.name, id, status = %response.status(), "no detail record");
            return Ok(None);
        }

        let raw: RawDetail = response.json().await.map_err(|e| {
            PriceGatewayError::provider(&self.name, format!("invalid detail JSON for {id}: {e}"))
        })?;

        Ok(Some(raw.into_record(&self.name)))
    }
}
