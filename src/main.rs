use sonar_gitlab_bridge::config::BridgeConfig;
use sonar_gitlab_bridge::services::start_webhook_server;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sonar_gitlab_bridge=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run().await {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), sonar_gitlab_bridge::error::AppError> {
    let config = BridgeConfig::from_env()?;

    let cancel = CancellationToken::new();
    let server = start_webhook_server(config, cancel.clone()).await?;

    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
    }
    log::info!("Shutting down");
    cancel.cancel();
    server.wait().await;

    Ok(())
}
