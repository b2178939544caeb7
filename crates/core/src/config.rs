//! Environment-based configuration loading for the price gateway
//!
//! All configuration is read from environment variables with the
//! `PRICE_GATEWAY_` prefix (a `.env` file is honored at the binary
//! boundary). Loaders fill defaults for optional values; `validate` checks
//! ranges and URL syntax and is expected to run once at startup.

use crate::error::PriceGatewayError;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

/// Configuration loader trait
///
/// Standardized load-then-validate lifecycle for configuration sections.
pub trait ConfigLoader: Sized {
    /// Load from environment variables, using defaults for missing optionals
    fn from_env() -> Result<Self, PriceGatewayError>;

    /// Validate field values, returning a configuration error on the first
    /// violated constraint
    fn validate(&self) -> Result<(), PriceGatewayError>;
}

/// Aggregation pipeline tuning
///
/// # Environment Variables
///
/// - `PRICE_GATEWAY_LIST_TTL_MINUTES` (optional): listing cache TTL (default: 3)
/// - `PRICE_GATEWAY_DETAIL_TTL_MINUTES` (optional): detail cache TTL (default: 10)
/// - `PRICE_GATEWAY_MAX_DETAIL_CONCURRENCY` (optional): cap on concurrent
///   detail fetches across a pass (default: 6, floor: 2)
#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    pub list_ttl: Duration,
    pub detail_ttl: Duration,
    pub max_detail_concurrency: usize,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self::from_parts(3, 10, 6)
    }
}

impl AggregatorConfig {
    /// Build from raw minute/count values, applying the same fallbacks the
    /// loader does: zero TTLs fall back to defaults, concurrency is floored
    /// at 2.
    pub fn from_parts(
        list_ttl_minutes: u64,
        detail_ttl_minutes: u64,
        max_detail_concurrency: usize,
    ) -> Self {
        let list_minutes = if list_ttl_minutes > 0 { list_ttl_minutes } else { 3 };
        let detail_minutes = if detail_ttl_minutes > 0 {
            detail_ttl_minutes
        } else {
            10
        };
        Self {
            list_ttl: Duration::from_secs(list_minutes * 60),
            detail_ttl: Duration::from_secs(detail_minutes * 60),
            max_detail_concurrency: max_detail_concurrency.max(2),
        }
    }
}

impl ConfigLoader for AggregatorConfig {
    fn from_env() -> Result<Self, PriceGatewayError> {
        let list_ttl_minutes = parse_env_var("PRICE_GATEWAY_LIST_TTL_MINUTES", 3u64)?;
        let detail_ttl_minutes = parse_env_var("PRICE_GATEWAY_DETAIL_TTL_MINUTES", 10u64)?;
        let max_detail_concurrency =
            parse_env_var("PRICE_GATEWAY_MAX_DETAIL_CONCURRENCY", 6usize)?;

        Ok(Self::from_parts(
            list_ttl_minutes,
            detail_ttl_minutes,
            max_detail_concurrency,
        ))
    }

    fn validate(&self) -> Result<(), PriceGatewayError> {
        if self.list_ttl.is_zero() || self.detail_ttl.is_zero() {
            return Err(PriceGatewayError::config(
                "cache TTLs must be greater than zero",
                "PRICE_GATEWAY_LIST_TTL_MINUTES",
            ));
        }
        if self.max_detail_concurrency < 2 {
            return Err(PriceGatewayError::config(
                format!(
                    "max_detail_concurrency ({}) must be at least 2",
                    self.max_detail_concurrency
                ),
                "PRICE_GATEWAY_MAX_DETAIL_CONCURRENCY",
            ));
        }
        Ok(())
    }
}

/// One upstream catalog provider endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderEndpoint {
    pub name: String,
    pub base_url: String,
}

/// Upstream provider registry
///
/// # Environment Variables
///
/// - `PRICE_GATEWAY_API_TOKEN` (required): shared provider access token
/// - `PRICE_GATEWAY_PROVIDERS` (required): `name=base_url` pairs separated
///   by `;`, e.g. `cinemaworld=https://api.example.com/cinemaworld;filmworld=https://api.example.com/filmworld`
#[derive(Debug, Clone)]
pub struct ProvidersConfig {
    pub api_token: String,
    pub endpoints: Vec<ProviderEndpoint>,
}

impl ProvidersConfig {
    /// Parse the `name=base_url;...` provider list format
    pub fn parse_provider_list(raw: &str) -> Result<Vec<ProviderEndpoint>, PriceGatewayError> {
        let mut endpoints = Vec::new();
        for pair in raw.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            let (name, base_url) = pair.split_once('=').ok_or_else(|| {
                PriceGatewayError::config(
                    format!("expected name=base_url, got '{pair}'"),
                    "PRICE_GATEWAY_PROVIDERS",
                )
            })?;
            endpoints.push(ProviderEndpoint {
                name: name.trim().to_string(),
                base_url: base_url.trim().trim_end_matches('/').to_string(),
            });
        }
        if endpoints.is_empty() {
            return Err(PriceGatewayError::config(
                "at least one provider endpoint is required",
                "PRICE_GATEWAY_PROVIDERS",
            ));
        }
        Ok(endpoints)
    }
}

impl ConfigLoader for ProvidersConfig {
    fn from_env() -> Result<Self, PriceGatewayError> {
        let api_token = std::env::var("PRICE_GATEWAY_API_TOKEN").map_err(|_| {
            PriceGatewayError::config(
                "PRICE_GATEWAY_API_TOKEN must be set",
                "PRICE_GATEWAY_API_TOKEN",
            )
        })?;
        let raw = std::env::var("PRICE_GATEWAY_PROVIDERS").map_err(|_| {
            PriceGatewayError::config(
                "PRICE_GATEWAY_PROVIDERS must be set",
                "PRICE_GATEWAY_PROVIDERS",
            )
        })?;

        Ok(Self {
            api_token,
            endpoints: Self::parse_provider_list(&raw)?,
        })
    }

    fn validate(&self) -> Result<(), PriceGatewayError> {
        if self.api_token.trim().is_empty() {
            return Err(PriceGatewayError::config(
                "provider API token must not be blank",
                "PRICE_GATEWAY_API_TOKEN",
            ));
        }

        let mut seen = std::collections::HashSet::new();
        for endpoint in &self.endpoints {
            if endpoint.name.is_empty() {
                return Err(PriceGatewayError::config(
                    "provider name must not be empty",
                    "PRICE_GATEWAY_PROVIDERS",
                ));
            }
            if !seen.insert(endpoint.name.to_lowercase()) {
                return Err(PriceGatewayError::config(
                    format!("duplicate provider name '{}'", endpoint.name),
                    "PRICE_GATEWAY_PROVIDERS",
                ));
            }
            Url::parse(&endpoint.base_url).map_err(|e| {
                PriceGatewayError::config(
                    format!("invalid base URL for '{}': {e}", endpoint.name),
                    "PRICE_GATEWAY_PROVIDERS",
                )
            })?;
        }
        Ok(())
    }
}

/// HTTP server binding
///
/// # Environment Variables
///
/// - `PRICE_GATEWAY_HOST` (optional, default: `0.0.0.0`)
/// - `PRICE_GATEWAY_PORT` (optional, default: 8080)
/// - `PRICE_GATEWAY_WORKERS` (optional, default: one per CPU)
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            workers: None,
        }
    }
}

impl ConfigLoader for ServerConfig {
    fn from_env() -> Result<Self, PriceGatewayError> {
        let host = std::env::var("PRICE_GATEWAY_HOST")
            .unwrap_or_else(|_| ServerConfig::default().host);
        let port = parse_env_var("PRICE_GATEWAY_PORT", ServerConfig::default().port)?;
        let workers = match std::env::var("PRICE_GATEWAY_WORKERS") {
            Ok(raw) if !raw.trim().is_empty() => Some(raw.trim().parse().map_err(|_| {
                PriceGatewayError::config(
                    format!("invalid value '{raw}' for PRICE_GATEWAY_WORKERS"),
                    "PRICE_GATEWAY_WORKERS",
                )
            })?),
            _ => None,
        };

        Ok(Self { host, port, workers })
    }

    fn validate(&self) -> Result<(), PriceGatewayError> {
        if self.host.trim().is_empty() {
            return Err(PriceGatewayError::config(
                "host must not be blank",
                "PRICE_GATEWAY_HOST",
            ));
        }
        if self.port == 0 {
            return Err(PriceGatewayError::config(
                "port must be greater than 0",
                "PRICE_GATEWAY_PORT",
            ));
        }
        if self.workers == Some(0) {
            return Err(PriceGatewayError::config(
                "workers must be greater than 0",
                "PRICE_GATEWAY_WORKERS",
            ));
        }
        Ok(())
    }
}

/// Read an environment variable, falling back to `default` when unset or
/// blank and failing only on unparsable values
fn parse_env_var<T: FromStr>(key: &str, default: T) -> Result<T, PriceGatewayError> {
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw.trim().parse::<T>().map_err(|_| {
            PriceGatewayError::config(format!("invalid value '{raw}' for {key}"), key)
        }),
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggregator_defaults() {
        let config = AggregatorConfig::default();
        assert_eq!(config.list_ttl, Duration::from_secs(3 * 60));
        assert_eq!(config.detail_ttl, Duration::from_secs(10 * 60));
        assert_eq!(config.max_detail_concurrency, 6);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn aggregator_floors_concurrency_at_two() {
        let config = AggregatorConfig::from_parts(3, 10, 0);
        assert_eq!(config.max_detail_concurrency, 2);

        let config = AggregatorConfig::from_parts(3, 10, 1);
        assert_eq!(config.max_detail_concurrency, 2);
    }

    #[test]
    fn aggregator_zero_ttl_falls_back_to_defaults() {
        let config = AggregatorConfig::from_parts(0, 0, 6);
        assert_eq!(config.list_ttl, Duration::from_secs(3 * 60));
        assert_eq!(config.detail_ttl, Duration::from_secs(10 * 60));
    }

    #[test]
    fn provider_list_parses_pairs() {
        let endpoints = ProvidersConfig::parse_provider_list(
            "cinemaworld=https://api.example.com/cinemaworld/; filmworld=https://api.example.com/filmworld",
        )
        .unwrap();

        assert_eq!(endpoints.len(), 2);
        assert_eq!(endpoints[0].name, "cinemaworld");
        // trailing slash is normalized away
        assert_eq!(endpoints[0].base_url, "https://api.example.com/cinemaworld");
        assert_eq!(endpoints[1].name, "filmworld");
    }

    #[test]
    fn provider_list_rejects_malformed_pairs() {
        assert!(ProvidersConfig::parse_provider_list("cinemaworld").is_err());
        assert!(ProvidersConfig::parse_provider_list("").is_err());
    }

    #[test]
    fn providers_config_rejects_duplicates_and_bad_urls() {
        let config = ProvidersConfig {
            api_token: "token".to_string(),
            endpoints: vec![
                ProviderEndpoint {
                    name: "cinemaworld".to_string(),
                    base_url: "https://api.example.com/a".to_string(),
                },
                ProviderEndpoint {
                    name: "CinemaWorld".to_string(),
                    base_url: "https://api.example.com/b".to_string(),
                },
            ],
        };
        assert!(config.validate().is_err());

        let config = ProvidersConfig {
            api_token: "token".to_string(),
            endpoints: vec![ProviderEndpoint {
                name: "cinemaworld".to_string(),
                base_url: "not a url".to_string(),
            }],
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn server_config_validates_ranges() {
        let config = ServerConfig::default();
        assert!(config.validate().is_ok());

        let config = ServerConfig {
            port: 0,
            ..ServerConfig::default()
        };
        assert!(config.validate().is_err());

        let config = ServerConfig {
            workers: Some(0),
            ..ServerConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
