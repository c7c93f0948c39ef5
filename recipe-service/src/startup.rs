//! Application startup and lifecycle management.
//!
//! One HTTP listener serves the recipe API, health and metrics endpoints, and
//! falls back to the pre-built front-end for every other path.

use crate::config::{ProviderKind, RecipeConfig};
use crate::handlers::{get_recipe, health_check, metrics_endpoint, readiness_check};
use crate::services::{ChatCompletionProvider, HuggingFaceProvider, MockChatProvider};
use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    metrics::metrics_middleware, security_headers::security_headers_middleware,
    tracing::request_id_middleware, REQUEST_ID_HEADER,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

/// Shared application state. Immutable after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RecipeConfig>,
    pub provider: Arc<dyn ChatCompletionProvider>,
}

impl AppState {
    pub fn new(config: RecipeConfig, provider: Arc<dyn ChatCompletionProvider>) -> Self {
        Self {
            config: Arc::new(config),
            provider,
        }
    }
}

/// Construct the provider selected by configuration.
pub fn build_provider(config: &RecipeConfig) -> Result<Arc<dyn ChatCompletionProvider>, AppError> {
    let provider: Arc<dyn ChatCompletionProvider> = match config.provider.kind {
        ProviderKind::HuggingFace => {
            if config.provider.huggingface.access_token.is_none() {
                tracing::warn!("HF_ACCESS_TOKEN is not set; recipe requests will fail");
            }
            let provider = HuggingFaceProvider::new(config.provider.huggingface.clone())
                .map_err(|e| AppError::ConfigError(anyhow::anyhow!(e)))?;
            Arc::new(provider)
        }
        ProviderKind::Mock => {
            tracing::warn!("Using mock chat-completion provider");
            Arc::new(MockChatProvider::echo())
        }
    };

    tracing::info!(
        provider = provider.name(),
        model = %config.provider.model,
        max_tokens = config.provider.max_tokens,
        "Initialized chat-completion provider"
    );

    Ok(provider)
}

pub fn build_router(state: AppState) -> Router {
    let frontend = &state.config.frontend;
    let static_files =
        ServeDir::new(&frontend.dist_dir).fallback(ServeFile::new(frontend.index_path()));

    Router::new()
        .route("/get-recipe", post(get_recipe))
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/metrics", get(metrics_endpoint))
        .fallback_service(static_files)
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(CorsLayer::permissive())
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
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
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application with the provider selected by configuration.
    pub async fn build(config: RecipeConfig) -> Result<Self, AppError> {
        let provider = build_provider(&config)?;
        Self::build_with_provider(config, provider).await
    }

    /// Build the application around an already-constructed provider.
    pub async fn build_with_provider(
        config: RecipeConfig,
        provider: Arc<dyn ChatCompletionProvider>,
    ) -> Result<Self, AppError> {
        // Port 0 picks a random port for testing
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        if !config.frontend.index_path().is_file() {
            tracing::warn!(
                path = %config.frontend.index_path().display(),
                "Front-end entry file not found; catch-all route will return 404"
            );
        }

        let router = build_router(AppState::new(config, provider));

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until a shutdown signal arrives.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        tracing::info!("Recipe service listening on port {}", self.port);

        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                tracing::error!("HTTP server error: {}", e);
                e
            })
    }
}
