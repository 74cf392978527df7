//! Faultline: an instrumented HTTP service that produces reproducible
//! latency, timeout and error signals for monitoring pipelines.
//! Used by: binary entrypoint.

pub mod config;
pub mod console;
pub mod error;
pub mod handlers;
pub mod outcome;
pub mod server;
pub mod state;
pub mod store;
pub mod telemetry;

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = config::Config::from_env();
    let state = state::build_state(&config.db_path)?;

    console::print_banner();
    console::print_startup(&config.bind_addr, &state.db.path().display().to_string());
    tracing::info!("starting faultline on {}", config.bind_addr);

    server::run(state, &config.bind_addr).await?;
    Ok(())
}
