use serde::Deserialize;
use std::env;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_ELEVENLABS_VOICE: &str = "21m00Tcm4TlvDq8ikWAM";
pub const DEFAULT_OPENAI_VOICE: &str = "alloy";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub log_format: LogFormat,
    // Synthesis
    pub tts_provider: TtsProvider,
    pub elevenlabs_api_key: Option<String>,
    pub elevenlabs_base_url: String,
    pub elevenlabs_model_id: String,
    pub openai_api_key: Option<String>,
    pub openai_tts_model: String,
    pub default_voice_id: String,
    pub tts_timeout_ms: u64,
    // Object storage
    pub storage_url: Option<String>,
    pub storage_service_key: Option<String>,
    pub storage_bucket: String,
    pub bucket_visibility: BucketVisibility,
    pub signed_url_ttl_seconds: u64,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum TtsProvider {
    ElevenLabs,
    OpenAi,
}

/// Whether stored narrations are readable without credentials.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum BucketVisibility {
    Public,
    Private,
}

impl FromStr for TtsProvider {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "elevenlabs" => Ok(TtsProvider::ElevenLabs),
            "openai" => Ok(TtsProvider::OpenAi),
            other => Err(format!(
                "Unsupported TTS_PROVIDER '{}', expected 'elevenlabs' or 'openai'",
                other
            )),
        }
    }
}

impl FromStr for BucketVisibility {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "public" => Ok(BucketVisibility::Public),
            "private" => Ok(BucketVisibility::Private),
            other => Err(format!(
                "Unsupported BUCKET_VISIBILITY '{}', expected 'public' or 'private'",
                other
            )),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let tts_provider = optional_var("TTS_PROVIDER")
            .map(|value| value.parse::<TtsProvider>())
            .transpose()?
            .unwrap_or(TtsProvider::ElevenLabs);

        let default_voice_id = optional_var("DEFAULT_VOICE_ID").unwrap_or_else(|| {
            match tts_provider {
                TtsProvider::ElevenLabs => DEFAULT_ELEVENLABS_VOICE.to_string(),
                TtsProvider::OpenAi => DEFAULT_OPENAI_VOICE.to_string(),
            }
        });

        let config = Config {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()?,
            environment: match env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string())
                .as_str()
            {
                "production" => Environment::Production,
                _ => Environment::Development,
            },
            log_format: match env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .as_str()
            {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
            tts_provider,
            elevenlabs_api_key: optional_var("ELEVENLABS_API_KEY"),
            elevenlabs_base_url: env::var("ELEVENLABS_BASE_URL")
                .unwrap_or_else(|_| "https://api.elevenlabs.io".to_string()),
            elevenlabs_model_id: env::var("ELEVENLABS_MODEL_ID")
                .unwrap_or_else(|_| "eleven_multilingual_v2".to_string()),
            openai_api_key: optional_var("OPENAI_API_KEY"),
            openai_tts_model: env::var("OPENAI_TTS_MODEL").unwrap_or_else(|_| "tts-1".to_string()),
            default_voice_id,
            tts_timeout_ms: env::var("TTS_TIMEOUT_MS")
                .unwrap_or_else(|_| "25000".to_string())
                .parse()?,
            storage_url: optional_var("SUPABASE_URL"),
            storage_service_key: optional_var("SUPABASE_SERVICE_ROLE_KEY"),
            storage_bucket: optional_var("STORAGE_BUCKET").unwrap_or_else(|| "audio".to_string()),
            bucket_visibility: optional_var("BUCKET_VISIBILITY")
                .map(|value| value.parse::<BucketVisibility>())
                .transpose()?
                .unwrap_or(BucketVisibility::Public),
            signed_url_ttl_seconds: env::var("SIGNED_URL_TTL_SECONDS")
                .unwrap_or_else(|_| "604800".to_string())
                .parse()?,
        };

        Ok(config)
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    pub fn tts_timeout(&self) -> Duration {
        Duration::from_millis(self.tts_timeout_ms)
    }

    /// Environment variables that must be set before narration requests can be served.
    pub fn missing_required(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        match self.tts_provider {
            TtsProvider::ElevenLabs if self.elevenlabs_api_key.is_none() => {
                missing.push("ELEVENLABS_API_KEY")
            }
            TtsProvider::OpenAi if self.openai_api_key.is_none() => missing.push("OPENAI_API_KEY"),
            _ => {}
        }
        if self.storage_url.is_none() {
            missing.push("SUPABASE_URL");
        }
        if self.storage_service_key.is_none() {
            missing.push("SUPABASE_SERVICE_ROLE_KEY");
        }
        missing
    }
}

/// Unset and blank variables are both treated as absent.
fn optional_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
