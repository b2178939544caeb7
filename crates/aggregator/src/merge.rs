//! Title-based catalog merging
//!
//! Pure helpers for the aggregation pass: grouping listings by title,
//! seeding aggregated items, folding detail enrichment, and the cheapest
//! price computation.

use price_gateway_core::models::{AggregatedDetail, AggregatedItem, DetailRecord, ListingEntry};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Group listing entries from all providers by lowercased title
///
/// Each group keeps its entries in encounter order, so the first entry is
/// the seed for display fields.
pub fn group_by_title(entries: Vec<ListingEntry>) -> BTreeMap<String, Vec<ListingEntry>> {
    let mut groups: BTreeMap<String, Vec<ListingEntry>> = BTreeMap::new();
    for entry in entries {
        groups.entry(entry.title.to_lowercase()).or_default().push(entry);
    }
    groups
}

/// Seed an aggregated item for one title group
///
/// Display fields (title, year, kind, poster) come from the first entry
/// encountered; they are tie-broken by provider order, not merged
/// field-by-field. Every provider's identifier is recorded for the later
/// detail fan-out.
pub fn seed_item(entries: &[ListingEntry]) -> Option<AggregatedItem> {
    let first = entries.first()?;

    let mut provider_ids = BTreeMap::new();
    for entry in entries {
        provider_ids.insert(entry.provider.clone(), entry.id.clone());
    }

    Some(AggregatedItem {
        title: first.title.clone(),
        year: first.year.clone(),
        kind: first.kind.clone(),
        poster_url: first.poster_url.clone(),
        prices_by_provider: BTreeMap::new(),
        provider_ids,
        cheapest_price: None,
        cheapest_provider: None,
    })
}

/// Cheapest price and its source provider
///
/// Scans in `BTreeMap` key order with a strict `<`, so an exact price tie
/// resolves to the lexicographically smallest provider name.
pub fn cheapest(prices: &BTreeMap<String, Decimal>) -> Option<(String, Decimal)> {
    let mut best: Option<(&str, Decimal)> = None;
    for (provider, price) in prices {
        let better = match best {
            None => true,
            Some((_, current)) => *price < current,
        };
        if better {
            best = Some((provider.as_str(), *price));
        }
    }
    best.map(|(provider, price)| (provider.to_string(), price))
}

/// Fold one successful detail fetch into a title's aggregated item
///
/// Records the provider's price and fills display fields still empty after
/// seeding. Race order across providers is non-deterministic, so text
/// adoption is first-writer-wins.
pub fn fold_detail(item: &mut AggregatedItem, provider: String, record: &DetailRecord) {
    if item.year.is_empty() && !record.year.is_empty() {
        item.year = record.year.clone();
    }
    if item.kind.is_empty() && !record.kind.is_empty() {
        item.kind = record.kind.clone();
    }
    if item.poster_url.is_empty() && !record.poster_url.is_empty() {
        item.poster_url = record.poster_url.clone();
    }
    item.prices_by_provider.insert(provider, record.price);
}

/// Finalize a merged pass: compute cheapest pairs, drop unpriced titles,
/// sort by title case-insensitively
pub fn finalize_catalog(mut items: Vec<AggregatedItem>) -> Vec<AggregatedItem> {
    items.retain(|item| !item.prices_by_provider.is_empty());
    for item in &mut items {
        if let Some((provider, price)) = cheapest(&item.prices_by_provider) {
            item.cheapest_price = Some(price);
            item.cheapest_provider = Some(provider);
        }
    }
    items.sort_by(|a, b| a.title.to_lowercase().cmp(&b.title.to_lowercase()));
    items
}

/// Fold one provider's detail record into the detail view
///
/// Enrichment fields adopt the record's value only where still empty
/// (first-writer-wins across providers).
pub fn merge_detail_fields(detail: &mut AggregatedDetail, record: &DetailRecord) {
    fn adopt(field: &mut String, value: &str) {
        if field.is_empty() && !value.is_empty() {
            *field = value.to_string();
        }
    }

    adopt(&mut detail.rated, &record.rated);
    adopt(&mut detail.released, &record.released);
    adopt(&mut detail.runtime, &record.runtime);
    adopt(&mut detail.genre, &record.genre);
    adopt(&mut detail.director, &record.director);
    adopt(&mut detail.actors, &record.actors);
    adopt(&mut detail.plot, &record.plot);
    adopt(&mut detail.item.poster_url, &record.poster_url);
}
