//! Aggregator service orchestration
//!
//! Each `list`/`detail` call is a self-contained pass:
//! gather listings → group by title → bounded detail fan-out → fold →
//! filter/sort. Nothing is returned until the pass runs to completion, and
//! no state outlives it besides the caches.

use crate::merge;
use crate::provider::ProviderClient;
use dashmap::DashMap;
use futures::future::join_all;
use price_gateway_core::cache::{detail_key, list_key};
use price_gateway_core::models::{
    AggregatedDetail, AggregatedItem, CatalogResponse, DetailRecord, ListingEntry,
};
use price_gateway_core::{
    AggregatorConfig, BoundedExecutor, PriceGatewayError, Result, TtlCache,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// One scheduled detail lookup: which provider id feeds which title group
struct DetailFetch {
    title_key: String,
    provider: String,
    id: String,
}

/// Aggregates movie listings and prices across all configured providers
pub struct AggregatorService {
    providers: Vec<Arc<dyn ProviderClient>>,
    list_cache: TtlCache<Vec<ListingEntry>>,
    detail_cache: TtlCache<DetailRecord>,
    executor: BoundedExecutor,
    config: AggregatorConfig,
}

impl AggregatorService {
    pub fn new(providers: Vec<Arc<dyn ProviderClient>>, config: AggregatorConfig) -> Self {
        Self {
            executor: BoundedExecutor::new(config.max_detail_concurrency),
            providers,
            list_cache: TtlCache::new(),
            detail_cache: TtlCache::new(),
            config,
        }
    }

    /// Aggregate the full catalog: one item per distinct title, priced and
    /// sorted. Never fails; a total provider outage yields an empty catalog.
    pub async fn list(&self) -> CatalogResponse {
        let started = Instant::now();

        let listings = self.gather_listings().await;
        if listings.is_empty() {
            warn!("no movies found from any provider");
            return CatalogResponse { movies: Vec::new() };
        }

        let groups = merge::group_by_title(listings);

        // Seed every title before the fan-out so detail completions only
        // ever update existing entries, each under its own map entry lock.
        let merged: DashMap<String, AggregatedItem> = DashMap::new();
        let mut fetches = Vec::new();
        for (title_key, entries) in &groups {
            let Some(item) = merge::seed_item(entries) else {
                continue;
            };
            merged.insert(title_key.clone(), item);
            for entry in entries {
                fetches.push(DetailFetch {
                    title_key: title_key.clone(),
                    provider: entry.provider.clone(),
                    id: entry.id.clone(),
                });
            }
        }

        let tasks: Vec<_> = fetches
            .into_iter()
            .map(|fetch| self.fetch_price_into(fetch, &merged))
            .collect();
        self.executor.run_all(tasks).await;

        let items: Vec<AggregatedItem> = merged.into_iter().map(|(_, item)| item).collect();
        let movies = merge::finalize_catalog(items);

        info!(
            count = movies.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "aggregated catalog ready"
        );
        CatalogResponse { movies }
    }

    /// Detail view for one title (the external identity from the list view,
    /// compared case-insensitively)
    ///
    /// Re-fetches every listing provider's detail through the cache, merges
    /// enrichment fields first-non-empty, and recomputes the cheapest pair
    /// from the freshest prices. Per-provider failures here are swallowed.
    pub async fn detail(&self, title: &str) -> Result<AggregatedDetail> {
        let wanted = title.to_lowercase();
        let catalog = self.list().await;
        let item = catalog
            .movies
            .into_iter()
            .find(|m| m.title.to_lowercase() == wanted)
            .ok_or_else(|| PriceGatewayError::NotFound(title.to_string()))?;

        let mut detail = AggregatedDetail::from_item(item);
        for (provider, id) in detail.item.provider_ids.clone() {
            match self.detail_for(&provider, &id).await {
                Ok(Some(record)) => {
                    merge::merge_detail_fields(&mut detail, &record);
                    detail
                        .item
                        .prices_by_provider
                        .insert(provider, record.price);
                }
                Ok(None) => {
                    debug!(provider = %provider, id = %id, "no detail for enrichment");
                }
                Err(error) => {
                    debug!(provider = %provider, id = %id, error = %error, "enrichment fetch failed");
                }
            }
        }

        let cheapest = merge::cheapest(&detail.item.prices_by_provider);
        detail.item.cheapest_price = cheapest.as_ref().map(|(_, price)| *price);
        detail.item.cheapest_provider = cheapest.map(|(provider, _)| provider);
        Ok(detail)
    }

    /// Fan out all providers' listing calls concurrently and flatten the
    /// survivors; a failed provider contributes an empty listing
    async fn gather_listings(&self) -> Vec<ListingEntry> {
        let fetches = self
            .providers
            .iter()
            .map(|provider| self.listing_for(provider.as_ref()));
        join_all(fetches)
            .await
            .into_iter()
            .flatten()
            .flatten()
            .collect()
    }

    /// One provider's listing, read through the list cache
    async fn listing_for(&self, provider: &dyn ProviderClient) -> Option<Vec<ListingEntry>> {
        let key = list_key(provider.name());
        if let Some(cached) = self.list_cache.get(&key) {
            return Some(cached);
        }

        match provider.list_movies().await {
            Ok(listing) => {
                info!(provider = provider.name(), count = listing.len(), "provider listing");
                self.list_cache
                    .insert(key, listing.clone(), self.config.list_ttl);
                Some(listing)
            }
            Err(error) => {
                warn!(provider = provider.name(), error = %error, "provider listing failed");
                None
            }
        }
    }

    /// One bounded fan-out task: fetch a price and fold it into the title's
    /// merged entry. Failures are logged and degrade only this provider's
    /// price.
    async fn fetch_price_into(&self, fetch: DetailFetch, merged: &DashMap<String, AggregatedItem>) {
        match self.detail_for(&fetch.provider, &fetch.id).await {
            Ok(Some(record)) => {
                if let Some(mut item) = merged.get_mut(&fetch.title_key) {
                    merge::fold_detail(&mut item, fetch.provider, &record);
                }
            }
            Ok(None) => {
                warn!(provider = %fetch.provider, id = %fetch.id, "detail is absent");
            }
            Err(error) => {
                warn!(provider = %fetch.provider, id = %fetch.id, error = %error, "detail fetch failed");
            }
        }
    }

    /// One provider's detail record, read through the detail cache
    ///
    /// Errors are never cached, so a later pass may re-attempt.
    async fn detail_for(&self, provider_name: &str, id: &str) -> Result<Option<DetailRecord>> {
        let key = detail_key(provider_name, id);
        if let Some(cached) = self.detail_cache.get(&key) {
            return Ok(Some(cached));
        }

        let provider = self
            .providers
            .iter()
            .find(|p| p.name().eq_ignore_ascii_case(provider_name))
            .ok_or_else(|| {
                PriceGatewayError::Internal(format!("unknown provider '{provider_name}'"))
            })?;

        let detail = provider.movie_detail(id).await?;
        if let Some(record) = &detail {
            self.detail_cache
                .insert(key, record.clone(), self.config.detail_ttl);
        }
        Ok(detail)
    }
}
