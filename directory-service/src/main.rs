use directory_service::{
    build_router, config::DirectoryConfig, ensure_bootstrap_admin,
    services::{AuthService, Database, JwtService},
    AppState,
};
use service_core::observability::logging::init_tracing;
use sqlx::sqlite::SqlitePoolOptions;
use std::net::SocketAddr;
use tokio::signal;

#[tokio::main]
async fn main() -> Result<(), service_core::error::AppError> {
    // Load configuration - fail fast if invalid
    let config = DirectoryConfig::from_env()?;

    init_tracing(&config.service_name, &config.log_level);

    tracing::info!(
        service = %config.service_name,
        version = %config.service_version,
        environment = ?config.environment,
        "Starting directory service"
    );

    // Initialize the account store
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&config.database.url)
        .await?;
    let db = Database::new(pool);
    db.migrate().await?;
    tracing::info!("Database initialized successfully");

    // Initialize session signing
    let jwt = JwtService::new(&config.jwt)
        .map_err(service_core::error::AppError::InternalError)?;
    tracing::info!("JWT service initialized");

    let auth_service = AuthService::new(db.clone(), jwt.clone());

    // Seed the initial administrator if missing
    ensure_bootstrap_admin(&db, &config.bootstrap).await?;

    // Create application state
    let state = AppState {
        config: config.clone(),
        db,
        jwt,
        auth_service,
    };

    // Build application router
    let app = build_router(state).await?;

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
    tracing::info!(address = %addr, "Listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Service shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
