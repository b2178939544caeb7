//! HTTP boundary for the movie price gateway
//!
//! Thin actix-web layer over the aggregator service: routes, state, and the
//! error-to-status-code mapping. Everything else lives in the service.

pub mod routes;

pub use routes::{configure_routes, AppState};
