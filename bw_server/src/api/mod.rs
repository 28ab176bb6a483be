//! HTTP API for the wallet service.
//!
//! # Endpoints
//!
//! ```text
//! GET  /health                                               - Health check
//! POST /api/v1/wallet/credit                                 - Credit a bucket
//! POST /api/v1/wallet/debit                                  - Debit a bucket
//! GET  /api/v1/wallet/{client_id}/{user_id}/balance          - Read balances
//! GET  /api/v1/wallet/{client_id}/{user_id}/transactions     - Ledger history
//! ```
//!
//! Every response carries an `x-request-id` header.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use bet_wallet::{WalletService, wallet::MemoryWalletStore};
//! use bw_server::api::{AppState, create_router};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let state = AppState {
//!     wallet_service: WalletService::new(Arc::new(MemoryWalletStore::new())),
//! };
//! let app = create_router(state);
//!
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:7070").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # CORS
//!
//! CORS is configured permissively. Put the service behind a gateway that
//! restricts origins in production.

pub mod request_id;
pub mod wallet;

use crate::metrics;
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
};
use bet_wallet::WalletService;
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

/// Application state shared across all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub wallet_service: WalletService,
}

/// Create the API router with all endpoints and middleware.
pub fn create_router(state: AppState) -> Router {
    let root_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .merge(root_routes)
        .nest("/api/v1", create_v1_router())
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(request_id::request_id_middleware))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

fn create_v1_router() -> Router<AppState> {
    Router::new()
        .route("/wallet/credit", post(wallet::credit))
        .route("/wallet/debit", post(wallet::debit))
        .route(
            "/wallet/{client_id}/{user_id}/balance",
            get(wallet::get_balance),
        )
        .route(
            "/wallet/{client_id}/{user_id}/transactions",
            get(wallet::list_transactions),
        )
}

/// Health check endpoint for monitoring and load balancers.
///
/// Returns `200 OK` when the wallet store answers, `503 Service Unavailable`
/// otherwise.
///
/// ```bash
/// curl http://localhost:7070/health
/// # {"status":"healthy","version":"1.0.0","database":true,"timestamp":"2026-10-17T10:30:00+00:00"}
/// ```
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let db_healthy = state.wallet_service.is_healthy().await;
    metrics::store_healthy(db_healthy);

    let status_code = if db_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let response = json!({
        "status": if db_healthy { "healthy" } else { "unhealthy" },
        "version": env!("CARGO_PKG_VERSION"),
        "database": db_healthy,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (status_code, Json(response))
}
