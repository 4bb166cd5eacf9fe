use super::tts_repository::{TtsRepository, TtsRepositoryError};
use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{CreateSpeechRequest, SpeechModel, Voice},
    Client,
};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

/// OpenAI has a limit of 4096 characters per request
const MAX_BATCH_SIZE: usize = 4096;

static SENTENCE_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"([.!?]+\s+)").unwrap());

/// OpenAI TTS implementation of TTS repository
pub struct OpenAiTtsRepository {
    client: Arc<Client<OpenAIConfig>>,
    model: String,
}

impl OpenAiTtsRepository {
    pub fn new(client: Arc<Client<OpenAIConfig>>, model: String) -> Self {
        Self { client, model }
    }

    fn parse_voice(voice: &str) -> Option<Voice> {
        match voice.to_lowercase().as_str() {
            "alloy" => Some(Voice::Alloy),
            "echo" => Some(Voice::Echo),
            "fable" => Some(Voice::Fable),
            "onyx" => Some(Voice::Onyx),
            "nova" => Some(Voice::Nova),
            "shimmer" => Some(Voice::Shimmer),
            _ => None,
        }
    }

    /// Split text into batches that respect sentence boundaries
    /// Each batch is at most MAX_BATCH_SIZE characters
    fn split_into_batches(&self, text: &str) -> Vec<String> {
        if text.len() <= MAX_BATCH_SIZE {
            return vec![text.to_string()];
        }

        let mut batches = Vec::new();
        let mut current_batch = String::new();
        let mut last_end = 0;

        for mat in SENTENCE_END.find_iter(text) {
            Self::append_segment(&mut batches, &mut current_batch, &text[last_end..mat.end()]);
            last_end = mat.end();
        }

        // Text after the last sentence boundary
        if last_end < text.len() {
            Self::append_segment(&mut batches, &mut current_batch, &text[last_end..]);
        }

        if !current_batch.trim().is_empty() {
            batches.push(current_batch.trim().to_string());
        }

        batches
    }

    fn append_segment(batches: &mut Vec<String>, current_batch: &mut String, segment: &str) {
        if !current_batch.is_empty() && current_batch.len() + segment.len() > MAX_BATCH_SIZE {
            batches.push(current_batch.trim().to_string());
            current_batch.clear();
        }

        // No boundary to split on: fall back to fixed-size character chunks
        if segment.len() > MAX_BATCH_SIZE {
            let chars: Vec<char> = segment.trim().chars().collect();
            for chunk in chars.chunks(MAX_BATCH_SIZE) {
                batches.push(chunk.iter().collect());
            }
        } else {
            current_batch.push_str(segment);
        }
    }

    async fn call_openai(&self, text: &str, voice: Voice) -> Result<Vec<u8>, TtsRepositoryError> {
        let model = match self.model.as_str() {
            "tts-1" => SpeechModel::Tts1,
            "tts-1-hd" => SpeechModel::Tts1Hd,
            other => SpeechModel::Other(other.to_string()),
        };

        let request = CreateSpeechRequest {
            model,
            input: text.to_string(),
            voice,
            response_format: None, // Defaults to MP3
            speed: None,
        };

        let response = self.client.audio().speech(request).await.map_err(|e| {
            tracing::error!(
                error = %e,
                model = %self.model,
                text_length = text.len(),
                "OpenAI TTS API call failed"
            );
            map_openai_error(e)
        })?;

        Ok(response.bytes.to_vec())
    }
}

#[async_trait]
impl TtsRepository for OpenAiTtsRepository {
    fn supports_voice(&self, voice: &str) -> bool {
        Self::parse_voice(voice).is_some()
    }

    async fn synthesize(&self, voice: &str, text: &str) -> Result<Vec<u8>, TtsRepositoryError> {
        let start_time = std::time::Instant::now();

        let voice_enum = Self::parse_voice(voice).ok_or_else(|| TtsRepositoryError::Upstream {
            status: 400,
            detail: format!("Unknown OpenAI voice '{}'", voice),
        })?;

        let batches = self.split_into_batches(text);
        tracing::info!(
            provider = "openai",
            model = %self.model,
            voice = voice,
            batch_count = batches.len(),
            text_length = text.len(),
            "Starting OpenAI TTS synthesis"
        );

        // MP3 frames concatenate cleanly, so batches are merged in order
        let mut merged_audio = Vec::new();
        for (index, batch) in batches.iter().enumerate() {
            let audio = self.call_openai(batch, voice_enum.clone()).await?;
            merged_audio.extend(audio);
            tracing::debug!(
                batch_index = index,
                total_audio_size = merged_audio.len(),
                "Batch synthesized and merged"
            );
        }

        tracing::info!(
            provider = "openai",
            model = %self.model,
            voice = voice,
            latency_ms = start_time.elapsed().as_millis(),
            characters_count = text.len(),
            audio_size_bytes = merged_audio.len(),
            "TTS synthesis completed"
        );

        Ok(merged_audio)
    }
}

fn map_openai_error(err: OpenAIError) -> TtsRepositoryError {
    match err {
        OpenAIError::Reqwest(e) if e.is_timeout() => TtsRepositoryError::TimedOut,
        OpenAIError::Reqwest(e) => match e.status() {
            Some(status) => TtsRepositoryError::Upstream {
                status: status.as_u16(),
                detail: e.to_string(),
            },
            None => TtsRepositoryError::Transport(e.to_string()),
        },
        // The SDK does not surface the HTTP status of API errors.
        OpenAIError::ApiError(api_error) => TtsRepositoryError::Upstream {
            status: 502,
            detail: api_error.message,
        },
        other => TtsRepositoryError::Transport(other.to_string()),
    }
}
