//! Provider capability and raw provider wire shapes
//!
//! Implementations convert each provider's wire format into the canonical
//! models, stamping the provider name onto every record. Identifier formats
//! stay opaque; nothing downstream may assume structure in them.

use async_trait::async_trait;
use price_gateway_core::models::{DetailRecord, ListingEntry};
use price_gateway_core::Result;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};

/// Capability exposed by one upstream catalog provider
///
/// Calls are plain awaited futures; dropping an aggregation pass cancels
/// every in-flight provider call.
#[async_trait]
pub trait ProviderClient: Send + Sync {
    /// Stable provider name (e.g. "cinemaworld"), compared case-insensitively
    fn name(&self) -> &str;

    /// Fetch the provider's full movie listing
    async fn list_movies(&self) -> Result<Vec<ListingEntry>>;

    /// Fetch one movie's detail record
    ///
    /// Returns `Ok(None)` when the provider has no record for the id.
    async fn movie_detail(&self, id: &str) -> Result<Option<DetailRecord>>;
}

/// Provider listing payload (PascalCase wire shape)
#[derive(Debug, Deserialize)]
pub(crate) struct RawListResponse {
    #[serde(rename = "Movies", default)]
    pub movies: Vec<RawListing>,
}

/// Minimal provider list item
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct RawListing {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub year: String,
    #[serde(rename = "Type", default)]
    pub kind: String,
    #[serde(default)]
    pub poster: String,
}

impl RawListing {
    pub fn into_entry(self, provider: &str) -> ListingEntry {
        ListingEntry {
            provider: provider.to_string(),
            id: self.id,
            title: self.title,
            year: self.year,
            kind: self.kind,
            poster_url: self.poster,
        }
    }
}

/// Provider detail payload (PascalCase wire shape, includes the price)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct RawDetail {
    #[serde(rename = "ID", default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub year: String,
    #[serde(rename = "Type", default)]
    pub kind: String,
    #[serde(default)]
    pub rated: String,
    #[serde(default)]
    pub released: String,
    #[serde(default)]
    pub runtime: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub director: String,
    #[serde(default)]
    pub actors: String,
    #[serde(default)]
    pub plot: String,
    #[serde(default)]
    pub poster: String,
    #[serde(deserialize_with = "price_from_string_or_number")]
    pub price: Decimal,
}

impl RawDetail {
    pub fn into_record(self, provider: &str) -> DetailRecord {
        DetailRecord {
            provider: provider.to_string(),
            id: self.id,
            title: self.title,
            year: self.year,
            kind: self.kind,
            rated: self.rated,
            released: self.released,
            runtime: self.runtime,
            genre: self.genre,
            director: self.director,
            actors: self.actors,
            plot: self.plot,
            poster_url: self.poster,
            price: self.price,
        }
    }
}

/// Providers encode prices inconsistently, as `"12.5"` or `12.5`; accept both
fn price_from_string_or_number<'de, D>(deserializer: D) -> std::result::Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum PriceRepr {
        Number(serde_json::Number),
        Text(String),
    }

    let raw = match PriceRepr::deserialize(deserializer)? {
        PriceRepr::Number(n) => n.to_string(),
        PriceRepr::Text(s) => s,
    };
    raw.trim()
        .parse::<Decimal>()
        .map_err(|e| serde::de::Error::custom(format!("unable to parse price '{raw}': {e}")))
}
