use super::error::NarrationServiceError;
use crate::infrastructure::repositories::{TtsRepository, TtsRepositoryError};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum SynthesisOutcome {
    Audio(Vec<u8>),
    /// The provider did not answer before the deadline.
    Pending,
}

/// Runs one TTS call under a wall-clock deadline.
pub struct SynthesisInvoker {
    tts_repo: Arc<dyn TtsRepository>,
    timeout: Duration,
}

impl SynthesisInvoker {
    pub fn new(tts_repo: Arc<dyn TtsRepository>, timeout: Duration) -> Self {
        Self { tts_repo, timeout }
    }

    pub fn supports_voice(&self, voice: &str) -> bool {
        self.tts_repo.supports_voice(voice)
    }

    pub async fn invoke(
        &self,
        voice: &str,
        canonical_text: &str,
    ) -> Result<SynthesisOutcome, NarrationServiceError> {
        match tokio::time::timeout(self.timeout, self.tts_repo.synthesize(voice, canonical_text)).await {
            Ok(Ok(audio)) => Ok(SynthesisOutcome::Audio(audio)),
            Ok(Err(TtsRepositoryError::TimedOut)) | Err(_) => {
                tracing::warn!(
                    voice = voice,
                    timeout_ms = self.timeout.as_millis(),
                    "TTS synthesis did not finish in time"
                );
                Ok(SynthesisOutcome::Pending)
            }
            Ok(Err(e)) => Err(e.into()),
        }
    }
}
