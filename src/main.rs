use tokio::net::TcpListener;

use finboard_backend::app;
use finboard_backend::config::AppConfig;
use finboard_backend::logging::{init_logging, LoggingConfig};
use finboard_backend::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize logging FIRST
    init_logging(LoggingConfig::from_env())?;

    let config = AppConfig::from_env()?;
    tracing::info!(
        "📊 Sample data: {} (fallback: {} quarters from {}, seed {})",
        config.sample_data_path.display(),
        config.sample_params.num_quarters,
        config.sample_params.start_year,
        config.sample_params.seed
    );

    let addr = config.bind_addr;
    let app = app::create_app(AppState::new(config));

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("🚀 Finboard backend running at http://{}/", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
