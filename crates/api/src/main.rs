//! Movie Price Gateway - aggregated movie listings and cheapest prices

use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use price_gateway_aggregator::{AggregatorService, HttpProviderClient, ProviderClient};
use price_gateway_api::{configure_routes, AppState};
use price_gateway_core::{AggregatorConfig, ConfigLoader, ProvidersConfig, ServerConfig};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    let aggregator_config = AggregatorConfig::from_env()?;
    aggregator_config.validate()?;
    let providers_config = ProvidersConfig::from_env()?;
    providers_config.validate()?;
    let server_config = ServerConfig::from_env()?;
    server_config.validate()?;

    let providers = providers_config
        .endpoints
        .iter()
        .map(|endpoint| {
            HttpProviderClient::new(
                &endpoint.name,
                &endpoint.base_url,
                &providers_config.api_token,
            )
            .map(|client| Arc::new(client) as Arc<dyn ProviderClient>)
        })
        .collect::<Result<Vec<_>, _>>()?;

    info!(
        providers = providers.len(),
        max_detail_concurrency = aggregator_config.max_detail_concurrency,
        "starting price gateway"
    );

    let service = Arc::new(AggregatorService::new(providers, aggregator_config));
    let state = web::Data::new(AppState { service });

    let bind_addr = format!("{}:{}", server_config.host, server_config.port);
    info!("price gateway listening on {}", bind_addr);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Cors::permissive())
            .wrap(middleware::Logger::default())
            .configure(configure_routes)
    })
    .workers(server_config.workers.unwrap_or_else(num_cpus::get))
    .bind(&bind_addr)?
    .run()
    .await?;

    Ok(())
}
