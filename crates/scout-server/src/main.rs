mod configuration;
mod error;
mod routes;
mod state;

use scout::invoker::{AgentInvoker, Credentials};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Ok(path) = dotenv::dotenv() {
        eprintln!("Loaded environment from {:?}", path);
    }

    // Initialize tracing for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let settings = configuration::Settings::new()?;
    let addr = settings.server.socket_addr()?;

    // Credentials are read once here; each request that needs a missing key fails on its own
    let credentials = Credentials::from_env();
    if credentials.gemini_api_key.is_none() {
        tracing::warn!("GEMINI_API_KEY is not set, chat requests will fail");
    }

    let invoker = AgentInvoker::new(settings.invoker.into_config(credentials));
    info!(config = ?invoker.config(), "agent invoker ready");
    let state = state::AppState::new(invoker);

    // Create router with CORS support
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = routes::configure(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
