use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use receipt_api::{build_app, AppState};
use receipt_core::config::Settings;
use receipt_core::storage::MemoryReceiptStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::from_env()?;
    let _sentry_guard = settings.init_sentry(sentry::release_name!());

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let state = AppState::new(Arc::new(MemoryReceiptStore::new()), settings.scoring_policy);
    let app = build_app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], settings.port));

    let listener = match tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))
    {
        Ok(listener) => listener,
        Err(e) => {
            sentry_anyhow::capture_anyhow(&e);
            tracing::error!(error = %e, "api cannot start");
            return Err(e);
        }
    };

    tracing::info!(%addr, policy = %settings.scoring_policy, "api listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("api stopped");
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
