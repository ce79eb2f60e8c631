//! Mythic Bastionlands API server entry point.

use std::error::Error;
use std::sync::{Arc, Mutex};

use bastionlands_api::config::AppConfig;
use bastionlands_api::error::AppError;
use bastionlands_api::state::AppState;
use bastionlands_api::{build_router, telemetry};
use bastionlands_core::determinism::{Clock, DeterministicRng, SeededRng, SystemClock};
use bastionlands_core::repository::SessionRepository;
use bastionlands_narrative::infrastructure::ollama::OllamaClient;
use bastionlands_session::application::narrator::Narrator;
use bastionlands_session_store::in_memory::InMemorySessionRepository;
use bastionlands_session_store::pg_session_repository::PgSessionRepository;
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};

async fn session_repository(
    database_url: Option<&str>,
) -> Result<Arc<dyn SessionRepository>, AppError> {
    let Some(database_url) = database_url else {
        warn!("DATABASE_URL not set; sessions will be lost on restart");
        return Ok(Arc::new(InMemorySessionRepository::new()));
    };

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;
    bastionlands_session_store::run_migrations(&pool).await?;
    info!("connected to PostgreSQL");
    Ok(Arc::new(PgSessionRepository::new(pool)))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "could not listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::from_env()?;
    let telemetry = telemetry::init(config.otlp_endpoint.as_deref())?;

    info!("Starting Mythic Bastionlands API server");

    let session_repository = session_repository(config.database_url.as_deref()).await?;

    let model = OllamaClient::new(
        config.llm_base_url.clone(),
        config.llm_model.clone(),
        config.llm_timeout,
    )
    .map_err(|e| AppError::Config(format!("language model client: {e}")))?;
    info!(base_url = %config.llm_base_url, model = model.model(), "language model configured");

    let rng = match config.rng_seed {
        Some(seed) => {
            info!(seed, "dice are seeded");
            SeededRng::from_seed(seed)
        }
        None => SeededRng::from_entropy(),
    };

    let clock: Arc<dyn Clock + Send + Sync> = Arc::new(SystemClock);
    let rng: Arc<Mutex<dyn DeterministicRng + Send>> = Arc::new(Mutex::new(rng));
    let app_state = AppState::new(
        clock,
        rng,
        session_repository,
        Narrator::new(Arc::new(model), config.llm_timeout),
    );

    let app = build_router(app_state);

    let addr = config.bind_addr()?;
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    telemetry.shutdown();
    Ok(())
}
