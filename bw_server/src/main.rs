//! Bet wallet HTTP server.
//!
//! Serves credit, debit and balance operations over a PostgreSQL-backed
//! wallet store.

use anyhow::{Context, Error};
use bet_wallet::{WalletService, db::Database};
use bw_server::{api, config::ServerConfig, logging, metrics};
use pico_args::Arguments;
use std::net::SocketAddr;
use std::sync::Arc;

const HELP: &str = "\
Run the bet wallet service

USAGE:
  bw_server [OPTIONS]

OPTIONS:
  --bind          IP:PORT  Server socket bind address    [default: env SERVER_BIND or 127.0.0.1:7070]
  --db-url        URL      Database connection string    [default: env DATABASE_URL]
  --metrics-bind  IP:PORT  Prometheus exporter address   [default: env METRICS_BIND, disabled if unset]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  SERVER_BIND              Server bind address (e.g., 0.0.0.0:7070)
  DATABASE_URL             PostgreSQL connection string
  DB_MAX_CONNECTIONS       Pool size [default: 20]
  DB_QUERY_TIMEOUT_SECS    Per-call store timeout [default: 10]
  METRICS_BIND             Prometheus exporter address
  RUST_LOG                 Log filter [default: info,sqlx=warn,hyper=warn]
";

struct Args {
    bind: Option<SocketAddr>,
    database_url: Option<String>,
    metrics_bind: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        return Ok(());
    }

    let args = Args {
        bind: pargs
            .opt_value_from_str("--bind")
            .context("Invalid --bind address")?,
        database_url: pargs.opt_value_from_str("--db-url")?,
        metrics_bind: pargs
            .opt_value_from_str("--metrics-bind")
            .context("Invalid --metrics-bind address")?,
    };

    logging::init();

    let config = ServerConfig::from_env(args.bind, args.database_url, args.metrics_bind)?;
    config.validate()?;

    if let Some(addr) = config.metrics_bind {
        metrics::init_metrics(addr).map_err(Error::msg)?;
        tracing::info!("Prometheus metrics exported on http://{}/metrics", addr);
    }

    tracing::info!("Connecting to database");
    let db = Database::new(&config.database)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected successfully");

    let wallet_service = WalletService::new(Arc::new(db.wallet_store()));
    let app = api::create_router(api::AppState { wallet_service });

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind))?;

    tracing::info!(
        "Wallet service is running at http://{}. Press Ctrl+C to stop.",
        config.bind
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Shutting down server...");
    db.close().await;

    Ok(())
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
