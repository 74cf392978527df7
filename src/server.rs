//! Axum router and server setup.
//! Used by: main.

use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/metrics", get(handlers::metrics::metrics))
        .route("/error", get(handlers::synthetic::error))
        .route("/latency", get(handlers::synthetic::latency))
        .route("/timeout", get(handlers::synthetic::timeout))
        .route("/timeout5", get(handlers::synthetic::timeout5))
        .route("/mstimeout", get(handlers::synthetic::mstimeout))
        .route("/get", get(handlers::items::list))
        .route("/add", post(handlers::items::add))
        .route("/put/:id", put(handlers::items::modify))
        .route("/delete/:id", delete(handlers::items::delete))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn run(state: AppState, addr: &str) -> std::io::Result<()> {
    let metrics = state.metrics.clone();
    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("listening on {}", addr);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let s = metrics.snapshot();
    tracing::info!(
        requests = s.request_count,
        passed = s.pass_rate,
        errors = s.error_rate,
        timed = s.latency_count,
        timed_seconds = s.latency_sum,
        "shutting down"
    );
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
