//! # Price Gateway Core
//!
//! Shared building blocks for the movie price gateway.
//!
//! This crate provides the primitives the aggregation pipeline is assembled
//! from: canonical domain models, the error taxonomy, configuration loading,
//! the TTL cache that shields providers from repeated load, the bounded fetch
//! executor, and a retry utility for transient upstream failures.
//!
//! ## Modules
//!
//! - `models`: canonical listing/detail/aggregate types
//! - `error`: error types and handling
//! - `config`: environment-based configuration loading and validation
//! - `cache`: concurrent TTL cache with per-entry expiry
//! - `executor`: bounded-concurrency fan-out executor
//! - `retry`: exponential backoff retry utility

pub mod cache;
pub mod config;
pub mod error;
pub mod executor;
pub mod models;
pub mod retry;

// Re-export commonly used types
pub use cache::TtlCache;
pub use config::{
    AggregatorConfig, ConfigLoader, ProviderEndpoint, ProvidersConfig, ServerConfig,
};
pub use error::PriceGatewayError;
pub use executor::BoundedExecutor;
pub use models::{
    AggregatedDetail, AggregatedItem, CatalogResponse, DetailRecord, ListingEntry,
};
pub use retry::{retry_with_backoff, RetryPolicy};

/// Result type alias for price gateway operations
pub type Result<T> = std::result::Result<T, PriceGatewayError>;
