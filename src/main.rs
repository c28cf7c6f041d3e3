use std::sync::Arc;

use anyhow::Context;
use companion_backend::{config::Config, routes, state::AppState, telemetry};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init_tracing()?;

    let config = Config::from_env()?;
    let state = Arc::new(AppState::new(&config).context("built-in rule table is invalid")?);

    let sessions = state.sessions.clone();
    let purge_interval = config.purge_interval;
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(purge_interval);
        loop {
            ticker.tick().await;
            sessions.purge_expired().await;
        }
    });

    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    info!(addr = %config.bind_addr, "companion chat running");
    axum::serve(listener, app).await?;
    Ok(())
}
