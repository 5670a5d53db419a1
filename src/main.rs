//! On-call roster optimization service - Axum server.
//!
//! Run with: cargo run
//! Environment: PORT (default 8080), HOST, RUST_LOG, SCHEDULER_* (see config).

use std::env;
use std::net::SocketAddr;

use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

use oncall_scheduling::{api, config};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Solver settings and penalty weights are fixed for the process lifetime.
    let cfg = config::global();
    info!(
        time_limit_seconds = cfg.settings.time_limit_seconds,
        random_seed = cfg.settings.random_seed,
        threads = cfg.settings.threads,
        "scheduler configuration loaded"
    );

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = api::router().layer(cors);

    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080);
    let addr: SocketAddr = format!("{host}:{port}").parse().expect("invalid HOST/PORT");

    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind");
    axum::serve(listener, app).await.expect("server error");
}
