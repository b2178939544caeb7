//! Canonical domain models for the aggregated movie catalog
//!
//! Provider wire shapes live with the provider client; everything in this
//! module is the canonical form the merger and the HTTP boundary work with.
//! Every record carries the provider name explicitly rather than encoding it
//! in the identifier format, which stays opaque.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One movie from one provider's listing call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingEntry {
    /// Provider that produced this entry
    pub provider: String,
    /// Provider-specific identifier, opaque to the merger
    pub id: String,
    pub title: String,
    pub year: String,
    /// Content kind as reported upstream (usually "movie")
    pub kind: String,
    pub poster_url: String,
}

/// Full per-movie record from one provider's detail call
///
/// `price` is the only field the cheapest-price computation needs; the
/// remaining text fields are best-effort enrichment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailRecord {
    pub provider: String,
    pub id: String,
    pub title: String,
    pub year: String,
    pub kind: String,
    pub rated: String,
    pub released: String,
    pub runtime: String,
    pub genre: String,
    pub director: String,
    pub actors: String,
    pub plot: String,
    pub poster_url: String,
    pub price: Decimal,
}

/// One title aggregated across every provider that listed it
///
/// The title is the external identity: within one aggregation cycle titles
/// compare case-insensitively and exactly one item exists per distinct title.
/// `BTreeMap` keys keep provider iteration deterministic, which the cheapest
/// tie-break rule relies on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedItem {
    pub title: String,
    pub year: String,
    pub kind: String,
    pub poster_url: String,
    /// One entry per provider that returned a price for this title
    pub prices_by_provider: BTreeMap<String, Decimal>,
    /// Each provider's identifier for this title, for detail lookups
    pub provider_ids: BTreeMap<String, String>,
    pub cheapest_price: Option<Decimal>,
    pub cheapest_provider: Option<String>,
}

/// Detail view: the aggregated item plus merged enrichment fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedDetail {
    #[serde(flatten)]
    pub item: AggregatedItem,
    pub rated: String,
    pub released: String,
    pub runtime: String,
    pub genre: String,
    pub director: String,
    pub actors: String,
    pub plot: String,
}

impl AggregatedDetail {
    /// Wrap a list item with empty enrichment fields, ready for folding
    pub fn from_item(item: AggregatedItem) -> Self {
        Self {
            item,
            rated: String::new(),
            released: String::new(),
            runtime: String::new(),
            genre: String::new(),
            director: String::new(),
            actors: String::new(),
            plot: String::new(),
        }
    }
}

/// Response body for the catalog list view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogResponse {
    pub movies: Vec<AggregatedItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggregated_detail_flattens_item_fields() {
        let item = AggregatedItem {
            title: "Jaws".to_string(),
            year: "1975".to_string(),
            kind: "movie".to_string(),
            poster_url: String::new(),
            prices_by_provider: BTreeMap::from([(
                "cinemaworld".to_string(),
                Decimal::from(12),
            )]),
            provider_ids: BTreeMap::from([(
                "cinemaworld".to_string(),
                "cw123".to_string(),
            )]),
            cheapest_price: Some(Decimal::from(12)),
            cheapest_provider: Some("cinemaworld".to_string()),
        };

        let json = serde_json::to_value(AggregatedDetail::from_item(item)).unwrap();
        assert_eq!(json["title"], "Jaws");
        assert_eq!(json["cheapestProvider"], "cinemaworld");
        assert_eq!(json["rated"], "");
    }

    #[test]
    fn listing_entry_uses_camel_case_keys() {
        let entry = ListingEntry {
            provider: "filmworld".to_string(),
            id: "fw1".to_string(),
            title: "Alien".to_string(),
            year: "1979".to_string(),
            kind: "movie".to_string(),
            poster_url: "http://posters/alien.jpg".to_string(),
        };

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["posterUrl"], "http://posters/alien.jpg");
        assert_eq!(json["provider"], "filmworld");
    }
}
