use crate::{create_router, AppState};
use deckhelper_core::{Result, Settings};
use std::net::SocketAddr;
use tokio::signal;
use tracing::{info, warn};

pub struct Server {
    state: AppState,
    addr: SocketAddr,
}

impl Server {
    pub fn new(state: AppState, addr: SocketAddr) -> Self {
        Self { state, addr }
    }

    /// Server bound to `server.host:server.port`, backed by the public APIs.
    pub fn from_settings(settings: Settings) -> Result<Self> {
        let addr = settings.server.socket_addr()?;
        let state = AppState::new(settings)?;
        Ok(Self::new(state, addr))
    }

    pub async fn run(self) -> Result<()> {
        let router = create_router(self.state);
        let listener = tokio::net::TcpListener::bind(self.addr).await?;

        info!("Deck helper API listening on http://{}", self.addr);
        info!("  GET    /health");
        info!("  POST   /              - score a submitted collection");
        info!("  POST   /recommend     - ranked top list for a collection");
        info!("  GET    /cards/named?fuzzy=<name>");
        info!("  POST   /sessions      - start a collection session");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Ctrl+C handler unavailable: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("SIGTERM handler unavailable: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down gracefully");
        },
        _ = terminate => {
            info!("Received SIGTERM, shutting down gracefully");
        },
    }
}
