use anyhow::{Context, Result};
use purifier_api::config::Config;
use purifier_api::routes::{AppState, router};
use purifier_core::Skill;
use purifier_core::gadget_directory::HttpGadgetDirectory;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::fmt::time::ChronoLocal;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env().context("Failed to load application configuration")?;

    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_timer(ChronoLocal::rfc_3339())
        .init();

    let directory = HttpGadgetDirectory::new(config.directory_timeout)?;
    let skill = Arc::new(Skill::new(Arc::new(directory)));

    if config.skill_id.is_none() {
        tracing::warn!("SKILL_ID is not set, accepting requests for any application");
    }
    let app = router(AppState::new(skill, config.skill_id.clone()));

    info!("Starting skill endpoint, listening on {}", config.bind_address);
    let listener = tokio::net::TcpListener::bind(config.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Skill endpoint stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
