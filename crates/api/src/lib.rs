//! # ClinicSlot API
//!
//! The API crate provides the web server for the ClinicSlot booking service.
//! It exposes provider availability, bookings and schedule management over HTTP.
//!
//! ## Architecture
//!
//! This crate follows a layered architecture:
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Translate requests into calls on the core services
//! - **Middleware**: Error-to-response mapping
//! - **Config**: Handle environment and application configuration
//!
//! Storage is reached only through the `ScheduleCatalog` and `BookingLedger`
//! traits, so the same router runs over Postgres or the in-memory store.

/// Configuration module for API settings
pub mod config;
/// Request handlers
pub mod handlers;
/// Error handling shared by all handlers
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::sync::Arc;

use axum::Router;
use clinicslot_core::{BookingLedger, BookingService, ScheduleCatalog, SlotAllocator};
use clinicslot_db::{MemoryStore, PgStore};
use eyre::Result;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

/// Shared application state that is accessible to all request handlers
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use clinicslot_api::{router, ApiState};
///
/// let app = router(Arc::new(ApiState::memory()));
/// ```
pub struct ApiState {
    /// Schedule definitions, read and written directly by schedule handlers
    pub catalog: Arc<dyn ScheduleCatalog>,
    /// Free-slot computation
    pub allocator: SlotAllocator,
    /// Validated booking writes and status changes
    pub bookings: BookingService,
}

impl ApiState {
    pub fn new(catalog: Arc<dyn ScheduleCatalog>, ledger: Arc<dyn BookingLedger>) -> Self {
        Self {
            allocator: SlotAllocator::new(catalog.clone(), ledger.clone()),
            bookings: BookingService::new(catalog.clone(), ledger),
            catalog,
        }
    }

    /// State backed by PostgreSQL
    pub fn postgres(db_pool: PgPool) -> Self {
        let store = Arc::new(PgStore::new(db_pool));
        Self::new(store.clone(), store)
    }

    /// State backed by a fresh in-memory store
    pub fn memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::new(store.clone(), store)
    }
}

/// Builds the application router with all routes attached to `state`
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Free slot computation
        .merge(routes::availability::routes())
        // Schedule management endpoints
        .merge(routes::schedule::routes())
        // Booking endpoints
        .merge(routes::booking::routes())
        .with_state(state)
}

/// Starts the API server with the provided configuration and state
///
/// Initializes logging, applies CORS and timeout layers and serves until the
/// listener fails.
pub async fn start_server(config: config::ApiConfig, state: Arc<ApiState>) -> Result<()> {
    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let app = router(state);

    // Apply CORS configuration if origins are specified
    let app = if let Some(origins) = &config.cors_origins {
        let allowed: Vec<axum::http::HeaderValue> = origins
            .iter()
            .filter_map(|origin| match origin.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!("Ignoring invalid CORS origin: {}", origin);
                    None
                }
            })
            .collect();

        let cors = tower_http::cors::CorsLayer::new()
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::PUT,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers([
                axum::http::header::CONTENT_TYPE,
                axum::http::header::ACCEPT,
            ])
            .allow_origin(allowed);

        app.layer(cors)
    } else {
        app
    };

    // Add request timeout middleware
    let app = app.layer(
        tower::ServiceBuilder::new()
            .layer(axum::error_handling::HandleErrorLayer::new(|_: tower::BoxError| async {
                axum::http::StatusCode::REQUEST_TIMEOUT
            }))
            .timeout(std::time::Duration::from_secs(config.request_timeout)),
    );

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!(
        "Server listening on http://{} ({:?} store)",
        addr, config.store_backend
    );
    axum::serve(listener, app).await?;

    Ok(())
}
