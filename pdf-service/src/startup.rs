use crate::config::{PdfConfig, StorageBackend};
use crate::handlers;
use crate::services::metrics::metrics_endpoint;
use crate::services::{DocumentLocks, LocalStorage, MemoryStorage, Storage};
use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::metrics_middleware;
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub config: PdfConfig,
    pub storage: Arc<dyn Storage>,
    pub locks: Arc<DocumentLocks>,
}

pub struct Application {
    port: u16,
    server: Box<dyn std::future::Future<Output = std::io::Result<()>> + Send + Unpin>,
}

impl Application {
    pub async fn build(config: PdfConfig) -> Result<Self, AppError> {
        let storage: Arc<dyn Storage> = match config.storage.backend {
            StorageBackend::Local => Arc::new(
                LocalStorage::new(&config.storage.local_path)
                    .await
                    .map_err(|e| {
                        tracing::error!(
                            "Failed to initialize local storage at {}: {}",
                            config.storage.local_path,
                            e
                        );
                        e
                    })?,
            ),
            StorageBackend::Memory => Arc::new(MemoryStorage::new()),
        };

        let state = AppState {
            config: config.clone(),
            storage,
            locks: Arc::new(DocumentLocks::new()),
        };

        let app = Router::new()
            .route("/health", get(handlers::health_check))
            .route("/metrics", get(metrics_endpoint))
            .route("/api/pdf/create", post(handlers::create_pdf))
            .route("/api/pdf/:pdf_id", get(handlers::fetch_pdf))
            .route("/api/pdf/:pdf_id/add-text", post(handlers::add_text))
            .layer(from_fn(metrics_middleware))
            .layer(TraceLayer::new_for_http())
            .with_state(state);

        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}", port);

        let server = axum::serve(listener, app);

        Ok(Self {
            port,
            server: Box::new(server.into_future()),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}
