use axum::{
    routing::{get, post},
    Router,
};
use sea_orm::DatabaseConnection;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

// Re-export shared types from lifesim-types
pub use lifesim_types::*;

pub mod bootstrap;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod log_storage;
pub mod pdf;
pub mod scene;

use config::Config;
use database::setup_database;
use error::{AppError, Result};
use log_storage::LogStorage;
use scene::SceneStore;

// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Config,
    pub logs: LogStorage,
    pub scenes: SceneStore,
}

impl AppState {
    /// Prepare the log directory and scene file, then connect and migrate
    /// the database.
    pub async fn initialize(config: Config) -> Result<Self> {
        let (logs, scenes) = bootstrap::prepare(&config).await?;
        let db = setup_database(&config.database_url).await?;

        Ok(AppState {
            db,
            config,
            logs,
            scenes,
        })
    }
}

pub async fn run_server() -> Result<()> {
    // Initialize tracing, honouring RUST_LOG
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;
    let server_address = config.server_address();
    let static_dir = config.static_dir.clone();

    let state = AppState::initialize(config).await?;
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(&server_address)
        .await
        .map_err(|e| {
            AppError::ServerError(format!("Failed to bind to {}: {}", server_address, e))
        })?;

    tracing::info!("🚀 Life simulation backend starting on {}", server_address);
    tracing::info!("📁 Static directory: {}", static_dir.display());

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::ServerError(format!("Server error: {}", e)))?;

    Ok(())
}

pub fn create_app(state: AppState) -> Router {
    let static_dir = state.config.static_dir.clone();

    Router::new()
        // Meta
        .route("/api/meta/instructions", get(handlers::meta_instructions))
        .route("/api/meta/directives", get(handlers::meta_directives))
        // World state
        .route("/api/state/scene", get(handlers::get_scene_state))
        .route("/api/state/advance-time", post(handlers::advance_time))
        .route(
            "/api/state/flags",
            get(handlers::get_flags).post(handlers::set_flag),
        )
        // Players and NPCs
        .route(
            "/api/player/:player_id",
            get(handlers::get_player).patch(handlers::update_player),
        )
        .route("/api/npc", post(handlers::create_npc))
        .route("/api/npc/:npc_id", get(handlers::get_npc))
        // Event logging
        .route("/api/turns/resolve", post(handlers::resolve_turn))
        .route("/api/logs/events", get(handlers::get_events))
        .route("/api/logs/pdf", get(handlers::get_pdf_log))
        // Health check
        .route("/health", get(handlers::health_check))
        // Scene file, event log and rendered PDF live under here
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state)
}
