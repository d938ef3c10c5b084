use gptproto_plugin::{
    config::Config,
    logger,
    server::{router, AppState},
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    match dotenv::dotenv() {
        Ok(_) => log::info!("✅ .env file loaded successfully"),
        Err(_) => log::warn!("⚠️  No .env file found, using system environment variables"),
    }

    logger::init_with_config(logger::LoggerConfig::development())?;

    let config = Config::from_env();
    log::info!("🔧 GPTProto base URL: {}", config.gptproto.base_url());
    log::debug!(
        "Poll interval: {:?}, poll timeout: {:?}",
        config.gptproto.poll_interval(),
        config.gptproto.poll_timeout()
    );

    let port = config.port();
    let app = router(AppState::new(&config));

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    log::info!("🚀 GPTProto Dify Plugin is running on port {}", port);
    log::info!("📍 Health check: http://localhost:{}/health", port);
    log::info!("📍 API endpoint: http://localhost:{}/api/dify/receive", port);

    axum::serve(listener, app).await?;
    Ok(())
}
