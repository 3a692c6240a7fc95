use std::net::SocketAddr;

use anyhow::Context;
use tokio::net::TcpListener;

use asr_gateway::infrastructure::asr::TranscriptionServiceFactory;
use asr_gateway::infrastructure::observability::init_tracing;
use asr_gateway::presentation::{
    AppState, Environment, ServerMode, Settings, create_edge_service, create_router,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env().map_err(anyhow::Error::msg)?;
    let settings = Settings::load(environment).context("Failed to load settings")?;

    let tracing_config = settings.logging.tracing_config(environment.as_str());
    init_tracing(&tracing_config, settings.server.port);

    let service = TranscriptionServiceFactory::create(&settings)
        .context("Failed to configure transcription backends")?;

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .context("Invalid server host/port")?;
    let mode = settings.server.mode;

    let state = AppState::new(service, settings);
    let app = match mode {
        ServerMode::Router => create_router(state),
        ServerMode::Edge => create_edge_service(state),
    };

    tracing::info!(%addr, ?mode, "Listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
