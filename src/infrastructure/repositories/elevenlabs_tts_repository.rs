use super::tts_repository::{cap_detail, TtsRepository, TtsRepositoryError};
use async_trait::async_trait;
use reqwest::header;
use serde::Serialize;

const OUTPUT_FORMAT: &str = "mp3_44100_128";

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    text: &'a str,
    model_id: &'a str,
}

/// ElevenLabs implementation of TTS repository
pub struct ElevenLabsTtsRepository {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
    model_id: String,
}

impl ElevenLabsTtsRepository {
    pub fn new(http_client: reqwest::Client, base_url: String, api_key: String, model_id: String) -> Self {
        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model_id,
        }
    }

    fn speech_url(&self, voice: &str) -> String {
        format!(
            "{}/v1/text-to-speech/{}?output_format={}",
            self.base_url,
            urlencoding::encode(voice),
            OUTPUT_FORMAT
        )
    }
}

#[async_trait]
impl TtsRepository for ElevenLabsTtsRepository {
    async fn synthesize(&self, voice: &str, text: &str) -> Result<Vec<u8>, TtsRepositoryError> {
        let start_time = std::time::Instant::now();

        tracing::info!(
            provider = "elevenlabs",
            model = %self.model_id,
            voice = voice,
            text_length = text.len(),
            "Calling ElevenLabs TTS API"
        );

        let response = self
            .http_client
            .post(self.speech_url(voice))
            .header("xi-api-key", &self.api_key)
            .header(header::ACCEPT, "audio/mpeg")
            .json(&SpeechRequest {
                text,
                model_id: &self.model_id,
            })
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, voice = voice, "ElevenLabs TTS API call failed");
                if e.is_timeout() {
                    TtsRepositoryError::TimedOut
                } else {
                    TtsRepositoryError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::error!(
                status = status.as_u16(),
                voice = voice,
                detail = %detail,
                "ElevenLabs rejected synthesis request"
            );
            return Err(TtsRepositoryError::Upstream {
                status: status.as_u16(),
                detail: cap_detail(detail),
            });
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| TtsRepositoryError::Transport(e.to_string()))?
            .to_vec();

        tracing::info!(
            provider = "elevenlabs",
            voice = voice,
            latency_ms = start_time.elapsed().as_millis(),
            characters_count = text.len(),
            audio_size_bytes = audio.len(),
            "TTS synthesis completed"
        );

        Ok(audio)
    }
}
