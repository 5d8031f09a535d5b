use anyhow::Context;
use tracing_subscriber::EnvFilter;

use delivery_eta::{
    artifacts::startup_state,
    server::{router, AppState},
    ServiceConfig,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cfg = ServiceConfig::from_env()?;
    tracing::info!(?cfg, "starting delivery_eta");

    let model = startup_state(&cfg)?;

    let app = router(AppState::new(model, cfg.log_predictions));

    tracing::info!("listening on {}", cfg.bind_addr);
    let listener = tokio::net::TcpListener::bind(cfg.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", cfg.bind_addr))?;
    axum::serve(listener, app).await?;
    Ok(())
}
