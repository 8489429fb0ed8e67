use anyhow::Result;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use common::database::{health_check, init_pool, run_migrations};
use notes::{AppState, MIGRATOR, config::AppConfig, jwt::JwtService, routes};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("notes=info,common=info,tower_http=info")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting notes service");

    // Missing secrets or database settings abort here, before anything listens
    let config = AppConfig::from_env()?;
    let jwt_service = JwtService::new(config.jwt.clone())?;

    let pool = init_pool(&config.database).await?;

    if health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    run_migrations(&pool, &MIGRATOR).await?;

    let app_state = AppState::postgres(pool, jwt_service);
    let app = routes::create_router(app_state);

    let listener = tokio::net::TcpListener::bind(config.server_addr).await?;
    info!("Notes service listening on {}", config.server_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
