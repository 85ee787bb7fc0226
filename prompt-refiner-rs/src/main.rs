// prompt-refiner-rs/src/main.rs
// Main Entry Point for the prompt refiner HTTP service

use prompt_refiner::{build_app, RefinerConfig};

const SERVICE_NAME: &str = "prompt-refiner";
const DEFAULT_PORT: u16 = 8000;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file
    config_rs::load_dotenv();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = RefinerConfig::from_env()?;
    log::info!("Loaded configuration: {:?}", config);

    let app = build_app(&config)?;

    let addr = config_rs::get_bind_address(SERVICE_NAME, DEFAULT_PORT);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    log::info!("Prompt refiner listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("Prompt refiner stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    log::info!("Shutdown signal received");
}
