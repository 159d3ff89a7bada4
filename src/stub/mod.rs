pub mod couriers;
pub mod error;
pub mod orders;
pub mod state;

use std::net::{SocketAddr, TcpListener};
use std::sync::Arc;
use std::thread;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Json;
use axum::Router;
use serde::Serialize;
use tokio::sync::oneshot;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::error::HarnessError;
use crate::rest::transport::API_PREFIX;
use crate::rest::TransportConfig;
use crate::stub::error::AppError;
use crate::stub::state::StubState;

pub fn router(state: Arc<StubState>) -> Router {
    Router::new()
        .nest(API_PREFIX, couriers::router().merge(orders::router()))
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    couriers: usize,
    orders: usize,
}

async fn health(State(state): State<Arc<StubState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        couriers: state.couriers.len(),
        orders: state.orders.len(),
    })
}

async fn metrics(State(state): State<Arc<StubState>>) -> impl IntoResponse {
    match state.metrics.encode() {
        Ok(body) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(err) => AppError::Internal(err).into_response(),
    }
}

/// A stub serving on its own thread and runtime, so blocking clients can
/// call it from plain `#[test]` functions. Dropping it stops the server.
pub struct StubServer {
    addr: SocketAddr,
    state: Arc<StubState>,
    shutdown: Option<oneshot::Sender<()>>,
}

impl StubServer {
    /// Serves on an ephemeral loopback port.
    pub fn start() -> Result<Self, HarnessError> {
        Self::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
    }

    pub fn bind(addr: SocketAddr) -> Result<Self, HarnessError> {
        let listener = TcpListener::bind(addr)
            .map_err(|err| HarnessError::Stub(format!("failed to bind {addr}: {err}")))?;
        listener
            .set_nonblocking(true)
            .map_err(|err| HarnessError::Stub(format!("failed to configure listener: {err}")))?;
        let addr = listener
            .local_addr()
            .map_err(|err| HarnessError::Stub(format!("failed to read listener address: {err}")))?;

        let state = Arc::new(StubState::new());
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let app = router(state.clone());

        thread::Builder::new()
            .name(format!("dispatch-stub-{}", addr.port()))
            .spawn(move || serve(listener, app, shutdown_rx))
            .map_err(|err| HarnessError::Stub(format!("failed to spawn server thread: {err}")))?;

        info!(%addr, "stub server started");

        Ok(Self {
            addr,
            state,
            shutdown: Some(shutdown_tx),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn host(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn transport_config(&self) -> TransportConfig {
        TransportConfig::for_host(&self.host())
    }

    /// Direct access to the stub's store, for assertions the public API
    /// cannot express.
    pub fn state(&self) -> Arc<StubState> {
        Arc::clone(&self.state)
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}

fn serve(listener: TcpListener, app: Router, shutdown: oneshot::Receiver<()>) {
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            error!(error = %err, "failed to build stub runtime");
            return;
        }
    };

    runtime.block_on(async move {
        let listener = match tokio::net::TcpListener::from_std(listener) {
            Ok(listener) => listener,
            Err(err) => {
                error!(error = %err, "failed to register stub listener");
                return;
            }
        };

        if let Err(err) = axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown.await;
            })
            .await
        {
            error!(error = %err, "stub server failed");
        }
    });

    info!("stub server stopped");
}
