use std::net::SocketAddr;
use std::sync::Arc;

use dispatch_contract::config::HarnessConfig;
use dispatch_contract::error::HarnessError;
use dispatch_contract::observability::logging;
use dispatch_contract::stub::{self, state::StubState};

#[tokio::main]
async fn main() -> Result<(), HarnessError> {
    let config = HarnessConfig::from_env()?;
    logging::init(&config.log_level);

    let app = stub::router(Arc::new(StubState::new()));

    let bind_addr = SocketAddr::from(([0, 0, 0, 0], config.stub_port));
    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .map_err(|err| HarnessError::Stub(format!("failed to bind {bind_addr}: {err}")))?;

    tracing::info!(port = config.stub_port, "contract stub listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| HarnessError::Stub(format!("server error: {err}")))?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}
