//! HTTP boundary tests: routes and error-to-status-code mapping

use actix_web::{test, web, App};
use async_trait::async_trait;
use price_gateway_aggregator::{AggregatorService, ProviderClient};
use price_gateway_api::{configure_routes, AppState};
use price_gateway_core::models::{
    AggregatedDetail, CatalogResponse, DetailRecord, ListingEntry,
};
use price_gateway_core::{AggregatorConfig, Result};
use rust_decimal::Decimal;
use std::sync::Arc;

struct FixtureProvider {
    name: &'static str,
    id: &'static str,
    title: &'static str,
    price: Decimal,
}

#[async_trait]
impl ProviderClient for FixtureProvider {
    fn name(&self) -> &str {
        self.name
    }

    async fn list_movies(&self) -> Result<Vec<ListingEntry>> {
        Ok(vec![ListingEntry {
            provider: self.name.to_string(),
            id: self.id.to_string(),
            title: self.title.to_string(),
            year: "1977".to_string(),
            kind: "movie".to_string(),
            poster_url: String::new(),
        }])
    }

    async fn movie_detail(&self, id: &str) -> Result<Option<DetailRecord>> {
        if id != self.id {
            return Ok(None);
        }
        Ok(Some(DetailRecord {
            provider: self.name.to_string(),
            id: self.id.to_string(),
            title: self.title.to_string(),
            year: "1977".to_string(),
            kind: "movie".to_string(),
            rated: "PG".to_string(),
            released: String::new(),
            runtime: "121 min".to_string(),
            genre: "Sci-Fi".to_string(),
            director: String::new(),
            actors: String::new(),
            plot: String::new(),
            poster_url: String::new(),
            price: self.price,
        }))
    }
}

fn fixture_state() -> web::Data<AppState> {
    let providers: Vec<Arc<dyn ProviderClient>> = vec![
        Arc::new(FixtureProvider {
            name: "cinemaworld",
            id: "cw1",
            title: "Star Wars",
            price: Decimal::from(10),
        }),
        Arc::new(FixtureProvider {
            name: "filmworld",
            id: "fw1",
            title: "Star Wars",
            price: Decimal::from(8),
        }),
    ];
    let service = Arc::new(AggregatorService::new(
        providers,
        AggregatorConfig::default(),
    ));
    web::Data::new(AppState { service })
}

#[actix_web::test]
async fn catalog_endpoint_serves_aggregated_movies() {
    let app = test::init_service(
        App::new()
            .app_data(fixture_state())
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/movies").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let catalog: CatalogResponse = test::read_body_json(resp).await;
    assert_eq!(catalog.movies.len(), 1);
    assert_eq!(catalog.movies[0].title, "Star Wars");
    assert_eq!(catalog.movies[0].cheapest_price, Some(Decimal::from(8)));
    assert_eq!(
        catalog.movies[0].cheapest_provider.as_deref(),
        Some("filmworld")
    );
}

#[actix_web::test]
async fn detail_endpoint_is_title_keyed_and_case_insensitive() {
    let app = test::init_service(
        App::new()
            .app_data(fixture_state())
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/movies/star%20wars")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let detail: AggregatedDetail = test::read_body_json(resp).await;
    assert_eq!(detail.item.title, "Star Wars");
    assert_eq!(detail.item.prices_by_provider.len(), 2);
    assert_eq!(detail.rated, "PG");
}

#[actix_web::test]
async fn unknown_title_maps_to_404() {
    let app = test::init_service(
        App::new()
            .app_data(fixture_state())
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/movies/No%20Such%20Movie")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn blank_title_maps_to_400() {
    let app = test::init_service(
        App::new()
            .app_data(fixture_state())
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/movies/%20")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn health_endpoint_reports_healthy() {
    let app = test::init_service(
        App::new()
            .app_data(fixture_state())
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "price-gateway");
}
