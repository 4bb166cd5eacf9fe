use super::canonical::canonicalize;
use super::dto::{NarrationOutcome, NarrationRequest, NarrationResult};
use super::error::NarrationServiceError;
use super::identifier::content_identifier;
use super::locator::ArtifactLocation;
use super::synthesis::{SynthesisInvoker, SynthesisOutcome};
use crate::infrastructure::repositories::{StorageRepository, TtsRepository};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Request fields after validation; every field is trimmed and non-empty.
#[derive(Debug)]
struct ValidatedRequest {
    title: String,
    campaign: String,
    text: String,
    voice: String,
}

pub struct NarrationService {
    storage_repo: Arc<dyn StorageRepository>,
    synthesis: SynthesisInvoker,
    default_voice: String,
}

impl NarrationService {
    pub fn new(
        storage_repo: Arc<dyn StorageRepository>,
        tts_repo: Arc<dyn TtsRepository>,
        default_voice: String,
        synthesis_timeout: Duration,
    ) -> Self {
        Self {
            storage_repo,
            synthesis: SynthesisInvoker::new(tts_repo, synthesis_timeout),
            default_voice,
        }
    }
}

#[async_trait]
pub trait NarrationServiceApi: Send + Sync {
    /// Narrate text, reusing a stored artifact when one exists
    ///
    /// This operation:
    /// - Validates title, campaign and text
    /// - Derives the content identifier from voice + canonical text
    /// - Returns the stored artifact's URL on a cache hit
    /// - Otherwise synthesizes, uploads and returns the new artifact's URL
    ///
    /// Returns `Processing` when synthesis outlives its deadline.
    async fn narrate(
        &self,
        request: NarrationRequest,
    ) -> Result<NarrationOutcome, NarrationServiceError>;
}

#[async_trait]
impl NarrationServiceApi for NarrationService {
    async fn narrate(
        &self,
        request: NarrationRequest,
    ) -> Result<NarrationOutcome, NarrationServiceError> {
        // 1. Validate before any external call
        let input = self.validate(request)?;

        // 2. Derive the cache key and location
        let canonical_text = canonicalize(&input.text);
        let id = content_identifier(&input.voice, &canonical_text);
        let location = ArtifactLocation::locate(&id, &input.campaign, &input.title);

        tracing::info!(
            id = %id,
            object_path = %location.object_path,
            voice = %input.voice,
            text_length = canonical_text.len(),
            "Narration request"
        );

        // 3. Cache probe
        if self.storage_repo.exists(&location.object_path).await {
            tracing::info!(id = %id, object_path = %location.object_path, "Narration cache hit");
            let url = self.storage_repo.resolve_url(&location.object_path).await;
            return Ok(NarrationOutcome::Resolved(NarrationResult {
                id,
                url,
                filename: location.suggested_filename,
                bytes: None,
            }));
        }

        // 4. Synthesize under deadline
        tracing::info!(id = %id, "Narration cache miss, synthesizing");
        let audio = match self.synthesis.invoke(&input.voice, &canonical_text).await? {
            SynthesisOutcome::Audio(audio) => audio,
            SynthesisOutcome::Pending => {
                tracing::info!(id = %id, "Narration still processing");
                return Ok(NarrationOutcome::Processing { id });
            }
        };

        // 5. Publish and resolve
        let byte_count = audio.len();
        self.storage_repo.upload(&location.object_path, audio).await?;
        let url = self.storage_repo.resolve_url(&location.object_path).await;

        Ok(NarrationOutcome::Resolved(NarrationResult {
            id,
            url,
            filename: location.suggested_filename,
            bytes: Some(byte_count),
        }))
    }
}

impl NarrationService {
    fn validate(&self, request: NarrationRequest) -> Result<ValidatedRequest, NarrationServiceError> {
        let title = required_field("title", request.title)?;
        let campaign = required_field("campaign", request.campaign)?;
        let text = required_field("text", request.text)?;

        let voice = request
            .voice_id
            .map(|voice| voice.trim().to_string())
            .filter(|voice| !voice.is_empty())
            .unwrap_or_else(|| self.default_voice.clone());

        // ':' would make the "voice::text" hash input ambiguous
        if voice.contains(':') {
            return Err(NarrationServiceError::Invalid(
                "voiceId must not contain ':'".to_string(),
            ));
        }

        if !self.synthesis.supports_voice(&voice) {
            return Err(NarrationServiceError::Invalid(format!(
                "Unsupported voiceId: {}",
                voice
            )));
        }

        Ok(ValidatedRequest {
            title,
            campaign,
            text,
            voice,
        })
    }
}

fn required_field(name: &str, value: Option<String>) -> Result<String, NarrationServiceError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| NarrationServiceError::Invalid(format!("Missing or empty field: {}", name)))
}
