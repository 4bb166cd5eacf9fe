use async_trait::async_trait;

/// Longest upstream error body kept for diagnostics.
pub const MAX_DETAIL_LENGTH: usize = 2000;

#[derive(Debug, thiserror::Error)]
pub enum TtsRepositoryError {
    /// The provider answered with a non-success status.
    #[error("TTS provider returned {status}: {detail}")]
    Upstream { status: u16, detail: String },
    /// The transport gave up before the provider answered.
    #[error("TTS request timed out")]
    TimedOut,
    #[error("TTS transport error: {0}")]
    Transport(String),
}

/// Repository for TTS synthesis operations.
/// Abstracts the underlying TTS provider (ElevenLabs, OpenAI, ...)
///
/// Implementations are responsible for:
/// - Provider-specific request format and authentication
/// - Handling provider-specific text length limitations
/// - Returning a single MP3 stream
#[async_trait]
pub trait TtsRepository: Send + Sync {
    /// Whether the provider can synthesize with `voice`. Checked before any
    /// storage or synthesis call.
    fn supports_voice(&self, _voice: &str) -> bool {
        true
    }

    /// Synthesize canonical text with the given provider voice.
    ///
    /// # Errors
    /// Returns [`TtsRepositoryError::Upstream`] with the provider status and body
    /// when synthesis is rejected, or a transport error when it never answered.
    async fn synthesize(&self, voice: &str, text: &str) -> Result<Vec<u8>, TtsRepositoryError>;
}

/// Cap an upstream body so a misbehaving provider cannot bloat our responses.
pub fn cap_detail(body: String) -> String {
    if body.len() <= MAX_DETAIL_LENGTH {
        return body;
    }
    let mut end = MAX_DETAIL_LENGTH;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
