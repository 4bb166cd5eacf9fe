use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use narrate_backend::infrastructure::config::{Config, LogFormat};
use narrate_backend::infrastructure::http::start_http_server;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;

    init_logging(&config);

    tracing::info!(
        "Starting Narrate Backend on {}:{}",
        config.host,
        config.port
    );
    tracing::info!(
        development = config.is_development(),
        provider = ?config.tts_provider,
        bucket = %config.storage_bucket,
        visibility = ?config.bucket_visibility,
        "Configuration loaded"
    );

    let missing = config.missing_required();
    if !missing.is_empty() {
        tracing::warn!(
            missing = ?missing,
            "Required configuration missing. Narration requests will fail until it is provided"
        );
    }

    start_http_server(Arc::new(config)).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "narrate_backend=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "narrate_backend=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
