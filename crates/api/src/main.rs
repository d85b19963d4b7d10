use std::env;

use anyhow::Result;
use voyage_api::build_app;
use voyage_lookups::LookupConfig;
use voyage_observability::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    init_tracing("voyage_api");

    let config = LookupConfig::from_env();
    let bind = env::var("VOYAGE_BIND").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

    let app = build_app(&config)?;

    let listener = tokio::net::TcpListener::bind(&bind).await?;
    tracing::info!(
        bind = %bind,
        weather_key = config.weather_api_key.is_some(),
        "voyage concierge api started"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
