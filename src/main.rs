use barista_api::{app, config::AppConfig, AppContext};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, AUTH_ISSUER, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env();
    tracing::info!("Starting barista API in {:?} mode", config.environment);

    let ctx = AppContext::from_config(&config).await?;
    let app = app(ctx);

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    tracing::info!("barista API listening on http://{}", bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
