//! Server lifecycle: connect the store, bind, serve, and shut down.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::config::{self, Config};
use crate::error::ServerError;
use crate::infrastructure::database::{PgBlogPostStore, SharedStore};
use crate::infrastructure::memory::MemoryBlogPostStore;
use crate::state::AppState;

/// Open the store named by `database_url`.
///
/// `memory://` gives a fresh in-process store. `postgres://` and
/// `postgresql://` connect a pool and create the collection table if needed.
pub async fn connect_store(database_url: &str, max_connections: u32) -> Result<SharedStore, ServerError> {
    match config::backend_name(database_url) {
        "memory" => {
            info!("Using in-memory blog post store");
            Ok(Arc::new(MemoryBlogPostStore::new()))
        }
        "postgres" | "postgresql" => {
            let store = PgBlogPostStore::connect(database_url, max_connections).await?;
            store.ensure_schema().await?;
            Ok(Arc::new(store))
        }
        other => {
            error!(scheme = other, "Unsupported database url scheme");
            Err(ServerError::UnsupportedDatabaseUrl(other.to_string()))
        }
    }
}

/// Connect to the configured database and start serving on `PORT`.
pub async fn run_server(config: &Config) -> Result<ServerHandle, ServerError> {
    let store = connect_store(&config.database_url, config.database_max_connections).await?;
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    serve(store, addr).await
}

/// Serve the API over `store` on `addr`. Port 0 picks an ephemeral port; see
/// [`ServerHandle::local_addr`].
pub async fn serve(store: SharedStore, addr: SocketAddr) -> Result<ServerHandle, ServerError> {
    let listener = TcpListener::bind(addr).await.map_err(|source| {
        error!(%addr, error = %source, "Failed to bind REST server");
        ServerError::Bind { addr, source }
    })?;
    let local_addr = listener.local_addr().map_err(|source| ServerError::Bind { addr, source })?;

    let app = crate::app(AppState::new(store.clone()));
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        axum::serve(listener, app.into_make_service())
            .with_graceful_shutdown(async {
                // A dropped sender also stops the server.
                let _ = shutdown_rx.await;
            })
            .await
    });

    info!(%local_addr, "REST API server listening");
    Ok(ServerHandle {
        local_addr,
        store,
        shutdown: Some(shutdown_tx),
        task,
    })
}

pub struct ServerHandle {
    local_addr: SocketAddr,
    store: SharedStore,
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<std::io::Result<()>>,
}

impl ServerHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.local_addr)
    }

    /// The store the server is serving from.
    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    /// Resolves when the server stops on its own, which only happens on error.
    pub async fn stopped(&mut self) -> Result<(), ServerError> {
        (&mut self.task).await?.map_err(ServerError::Serve)
    }

    /// Stop accepting connections, let in-flight requests finish and wait
    /// for the server task to exit.
    pub async fn close(mut self) -> Result<(), ServerError> {
        info!(local_addr = %self.local_addr, "Closing REST API server");
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        self.task.await?.map_err(ServerError::Serve)?;
        info!("REST API server closed");
        Ok(())
    }
}
