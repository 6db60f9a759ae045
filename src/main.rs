use tokio::net::TcpListener;

use vat_extractor::{config::LoggingConfig, create_router, logging, Config};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    logging::init_tracing(&LoggingConfig::from_env())?;

    let config = Config::load()?;

    tracing::info!("Starting VAT Document Extractor Service");
    tracing::info!("Max upload size: {}MB", config.max_file_size_mb);
    tracing::info!("Log format: {}", config.log_format);

    let addr = config.bind_address();
    let app = create_router(config);

    tracing::info!("Server listening on {}", addr);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
