//! Documentation of the NutriSense recipe relay.
//!
//!
//!
//! # General Infrastructure
//! - Browser form (or the `form` CLI) posts preferences to this relay
//! - Relay forwards the JSON body untouched to the hosted AI service
//! - AI service answers with `{ recommendation, latency }`
//! - Relay hands that answer back as is, or a fixed error envelope
//! - Form renders the recommendation text into HTML with `recipes::markdown`
//!
//! Nothing is stored between requests. Each submission is one upstream call.
//!
//!
//!
//! # Routes
//!
//! | Method | Path          | Result                                                  |
//! |--------|---------------|---------------------------------------------------------|
//! | GET    | `/`           | `{"status": "NutriSense relay is running"}`             |
//! | POST   | `/api/recipe` | upstream JSON (200) or `{error, details}` (500)         |
//!
//! A body that is not a JSON object is answered with 400. A request from a
//! browser origin outside the allow-list is answered with 403 before it is
//! routed, see [`cors`].
//!
//!
//!
//! # Failures
//!
//! Any upstream failure (connection error, timeout, non-2xx, non-JSON body)
//! becomes:
//! ```json
//! { "error": "The AI service failed to respond.", "details": "<reason>" }
//! ```
//! with status 500. There is no retry, the caller decides what to do.
//!
//!
//!
//! # Setup
//!
//! Environment variables, all optional.
//!
//! | Variable                | Default                                                            |
//! |-------------------------|--------------------------------------------------------------------|
//! | `RUST_PORT`             | `5001`                                                             |
//! | `UPSTREAM_URL`          | `https://huggingface.co/spaces/text-ashish/ai_service/get_recipe`  |
//! | `ALLOWED_ORIGINS`       | `http://localhost:5173,https://nutriscense-frontend.netlify.app`   |
//! | `UPSTREAM_TIMEOUT_SECS` | `120`                                                              |
//! | `RUST_LOG`              | `info`                                                             |
//!
//! Run the relay.
//! ```sh
//! cargo run --bin relay
//! ```
//!
//! Try it.
//! ```sh
//! curl -X POST localhost:5001/api/recipe \
//!   -H 'Content-Type: application/json' \
//!   -d '{"query":"vegan curry","dietary":"Vegan","health":"None","allergens":"nuts","calories":600,"protein":20,"fat":15}'
//! ```
use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod cors;
pub mod error;
pub mod routes;
pub mod state;
pub mod upstream;
pub mod utils;

use config::Config;
use cors::{cors_layer, origin_guard};
use error::AppError;
use routes::{recipe_handler, status_handler};
use state::RelayState;

pub fn app(state: Arc<RelayState>) -> Router {
    Router::new()
        .route("/", get(status_handler))
        .route("/api/recipe", post(recipe_handler))
        .layer(cors_layer(&state.allowed_origins))
        .layer(middleware::from_fn_with_state(state.clone(), origin_guard))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_server() -> Result<(), AppError> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Loading config...");
    let config = Config::load()?;

    info!("Initializing state...");
    let state = RelayState::new(config)?;
    info!(
        "Forwarding to {} for origins {:?}",
        state.config.upstream_url, state.config.allowed_origins
    );

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    info!("Relay running on {address}");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Relay shutting down...");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {e}");
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
}
