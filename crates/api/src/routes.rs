//! Route handlers and error-to-status-code mapping

use actix_web::{web, HttpResponse, Responder};
use price_gateway_aggregator::AggregatorService;
use price_gateway_core::PriceGatewayError;
use serde_json::json;
use std::sync::Arc;
use tracing::error;

/// Shared application state
pub struct AppState {
    pub service: Arc<AggregatorService>,
}

/// Register all gateway routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/movies", web::get().to(get_movies))
        .route("/api/movies/{title}", web::get().to(get_movie))
        .route("/health", web::get().to(health_check));
}

/// `GET /api/movies` — the aggregated catalog; never fails, a total provider
/// outage serves an empty list
async fn get_movies(state: web::Data<AppState>) -> impl Responder {
    let catalog = state.service.list().await;
    HttpResponse::Ok().json(catalog)
}

/// `GET /api/movies/{title}` — detail view keyed by title
async fn get_movie(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let title = path.into_inner();
    if title.trim().is_empty() {
        return HttpResponse::BadRequest().json(json!({
            "message": "movie title is required"
        }));
    }

    match state.service.detail(&title).await {
        Ok(detail) => HttpResponse::Ok().json(detail),
        Err(err @ PriceGatewayError::NotFound(_)) => HttpResponse::NotFound().json(json!({
            "message": err.to_string()
        })),
        Err(err @ PriceGatewayError::Provider { .. }) => {
            error!(error = %err, "provider failure surfaced to the boundary");
            HttpResponse::ServiceUnavailable().json(json!({
                "message": err.to_string()
            }))
        }
        Err(err) => {
            error!(error = %err, "unhandled aggregation error");
            HttpResponse::InternalServerError().json(json!({
                "message": "an unexpected error occurred"
            }))
        }
    }
}

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": "price-gateway",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
