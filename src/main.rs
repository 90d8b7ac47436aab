//! Contact Admin
//!
//! Admin page for a contact directory: an editable table of contacts and their
//! notification preferences, plus a same-origin `/api/*` proxy to the directory.

mod api;
mod config;
mod directory;
mod errors;
mod form;
mod models;
mod presenter;
mod proxy;
mod render;
mod rows;

use std::sync::Arc;

use axum::{
    routing::{any, get, post},
    Router,
};
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use directory::HttpDirectory;
use presenter::ContactList;
use proxy::ApiProxy;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub contacts: Arc<Mutex<ContactList<HttpDirectory>>>,
    pub proxy: Arc<ApiProxy>,
}

impl AppState {
    /// Wire the page state and the proxy to the configured directory.
    pub fn new(config: &Config) -> Result<Self, errors::AppError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| errors::AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;
        let directory = HttpDirectory::new(http.clone(), config.api_url.clone());
        let proxy = ApiProxy::new(http, config.api_url.clone());

        Ok(Self {
            contacts: Arc::new(Mutex::new(ContactList::new(directory))),
            proxy: Arc::new(proxy),
        })
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);
    if config.log_json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting Contact Admin");
    tracing::info!("Directory URL: {}", config.api_url);
    tracing::info!("Bind address: {}", config.bind_addr);

    let bind_addr = config.bind_addr;
    let state = AppState::new(&config)?;

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Server listening on {}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    let page_routes = Router::new()
        .route("/", get(api::show_page))
        .route("/state", get(api::page_state))
        .route("/rows", post(api::add_row))
        .route("/rows/{key}/edit", post(api::edit_row))
        .route("/rows/{key}/cancel", post(api::cancel_row))
        .route("/rows/{key}/save", post(api::save_row))
        .route("/rows/{key}/delete", post(api::delete_row));

    // Same-origin rewrite to the directory
    let proxy_routes = Router::new().route("/api/{*path}", any(proxy::proxy_api));

    // Health check
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .merge(page_routes)
        .merge(proxy_routes)
        .merge(health_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
