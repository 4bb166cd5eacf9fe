use async_openai::{config::OpenAIConfig, Client};
use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;

use crate::{
    controllers::{health, narrate::NarrateController},
    domain::narration::{NarrationService, NarrationServiceApi},
    infrastructure::{
        config::{Config, TtsProvider},
        middleware::{cors_middleware, request_id_middleware},
        repositories::{
            ElevenLabsTtsRepository, OpenAiTtsRepository, StorageRepository,
            SupabaseStorageRepository, TtsRepository,
        },
    },
};

/// Wire repositories, services and controllers into the application router
pub fn create_app(config: Arc<Config>) -> Router {
    let narrate_controller = match build_narration_service(&config) {
        Some(service) => Arc::new(NarrateController::new(service)),
        None => {
            let missing = config.missing_required();
            tracing::warn!(
                missing = ?missing,
                "Narration is not configured; POST /narrate will answer 500"
            );
            Arc::new(NarrateController::unconfigured(missing))
        }
    };

    let narrate_routes = Router::new()
        .route(
            "/narrate",
            get(NarrateController::hint)
                .post(NarrateController::narrate)
                .options(NarrateController::preflight)
                .fallback(NarrateController::method_not_allowed),
        )
        .with_state(narrate_controller);

    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(config)
        .merge(narrate_routes)
        .layer(middleware::from_fn(cors_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
}

fn build_narration_service(config: &Config) -> Option<Arc<dyn NarrationServiceApi>> {
    let http_client = reqwest::Client::new();

    tracing::info!("Instantiating repositories...");
    let tts_repo: Arc<dyn TtsRepository> = match config.tts_provider {
        TtsProvider::ElevenLabs => Arc::new(ElevenLabsTtsRepository::new(
            http_client.clone(),
            config.elevenlabs_base_url.clone(),
            config.elevenlabs_api_key.clone()?,
            config.elevenlabs_model_id.clone(),
        )),
        TtsProvider::OpenAi => {
            let openai_config = OpenAIConfig::new().with_api_key(config.openai_api_key.clone()?);
            Arc::new(OpenAiTtsRepository::new(
                Arc::new(Client::with_config(openai_config)),
                config.openai_tts_model.clone(),
            ))
        }
    };

    let storage_repo: Arc<dyn StorageRepository> = Arc::new(SupabaseStorageRepository::new(
        http_client,
        config.storage_url.clone()?,
        config.storage_service_key.clone()?,
        config.storage_bucket.clone(),
        config.bucket_visibility,
        Duration::from_secs(config.signed_url_ttl_seconds),
    ));

    tracing::info!(
        provider = ?config.tts_provider,
        bucket = %config.storage_bucket,
        visibility = ?config.bucket_visibility,
        timeout_ms = config.tts_timeout_ms,
        "Instantiating narration service..."
    );
    Some(Arc::new(NarrationService::new(
        storage_repo,
        tts_repo,
        config.default_voice_id.clone(),
        config.tts_timeout(),
    )))
}

/// Start the HTTP server with all routes configured
pub async fn start_http_server(config: Arc<Config>) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_app(config.clone());

    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
