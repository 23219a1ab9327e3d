//! Ossi Backend
//!
//! Records open source contribution reports and answers Slack slash commands.

mod api;
mod auth;
mod commands;
mod config;
mod db;
mod errors;
mod models;
mod slack;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use commands::CommandResponder;
use config::Config;
use db::{ContributionStore, Repository};
use errors::AppError;
use slack::SlackClient;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ContributionStore>,
    pub responder: CommandResponder,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Arc<dyn ContributionStore>, config: Arc<Config>) -> Result<Self, AppError> {
        let chat = Arc::new(SlackClient::new(config.clone())?);
        let responder = CommandResponder::new(store.clone(), chat, config.clone());
        Ok(Self {
            store,
            responder,
            config,
        })
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env();

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Ossi Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);
    tracing::info!("Slack API: {}", config.slack_api_url);

    if config.api_psk.is_none() {
        tracing::warn!("No API PSK configured (OSSI_API_PSK). Admin authentication is disabled!");
    }
    if config.slack_token.is_none() {
        tracing::warn!("No SLACK_TOKEN configured. Review notifications will fail.");
    }

    let pool = db::init_database(&config.db_path).await?;
    let store: Arc<dyn ContributionStore> = Arc::new(Repository::new(pool));

    let bind_addr = config.bind_addr;
    let state = AppState::new(store, Arc::new(config))?;
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!("Server listening on {}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    let psk = state.config.api_psk.clone();

    // Admin routes for the submission and review flows
    let api_routes = Router::new()
        .route(
            "/contributions",
            get(api::list_contributions).post(api::create_contribution),
        )
        .route(
            "/contributions/{id}/{sequence}/status",
            put(api::update_status),
        )
        .layer(middleware::from_fn(move |req, next| {
            auth::psk_auth_layer(psk.clone(), req, next)
        }));

    let slack_routes = Router::new().route("/commands", post(api::slash_command));

    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .nest("/slack", slack_routes)
        .merge(health_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
