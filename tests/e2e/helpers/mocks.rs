use super::{TEST_API_KEY, TEST_SERVICE_KEY};
use std::time::Duration;
use wiremock::{
    matchers::{header, method, path},
    Mock, MockServer, ResponseTemplate,
};

pub fn mock_audio_bytes() -> Vec<u8> {
    // Minimal MP3 frame header plus padding
    vec![0xFF, 0xFB, 0x90, 0x00, 0x00, 0x00, 0x00, 0x00]
}

fn public_path(object_path: &str) -> String {
    format!("/storage/v1/object/public/audio/{}", object_path)
}

fn authenticated_path(object_path: &str) -> String {
    format!("/storage/v1/object/audio/{}", object_path)
}

/// TTS answers with audio, expected exactly `times` times
pub async fn mount_tts_audio(server: &MockServer, voice: &str, times: u64) {
    Mock::given(method("POST"))
        .and(path(format!("/v1/text-to-speech/{}", voice)))
        .and(header("xi-api-key", TEST_API_KEY))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "audio/mpeg")
                .set_body_bytes(mock_audio_bytes()),
        )
        .expect(times)
        .mount(server)
        .await;
}

/// TTS that takes longer than any test timeout
pub async fn mount_slow_tts(server: &MockServer, delay: Duration) {
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(mock_audio_bytes())
                .set_delay(delay),
        )
        .mount(server)
        .await;
}

pub async fn mount_tts_failure(server: &MockServer, status: u16, body: &str) {
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

/// TTS must not be called at all
pub async fn forbid_tts(server: &MockServer) {
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(server)
        .await;
}

/// Public-bucket HEAD answers 404 once, then falls through to later mocks
pub async fn mount_missing_once(server: &MockServer, object_path: &str) {
    Mock::given(method("HEAD"))
        .and(path(public_path(object_path)))
        .respond_with(ResponseTemplate::new(404))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(server)
        .await;
}

/// Object present in a public bucket
pub async fn mount_public_object(server: &MockServer, object_path: &str) {
    Mock::given(method("HEAD"))
        .and(path(public_path(object_path)))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", "audio/mpeg"))
        .mount(server)
        .await;
}

/// Object present in a private bucket
pub async fn mount_private_object(server: &MockServer, object_path: &str) {
    Mock::given(method("GET"))
        .and(path(authenticated_path(object_path)))
        .and(header("authorization", format!("Bearer {}", TEST_SERVICE_KEY).as_str()))
        .and(header("range", "bytes=0-0"))
        .respond_with(ResponseTemplate::new(206).set_body_bytes(vec![0xFF]))
        .mount(server)
        .await;
}

/// Upload accepted, expected exactly `times` times
pub async fn mount_upload(server: &MockServer, object_path: &str, times: u64) {
    Mock::given(method("POST"))
        .and(path(authenticated_path(object_path)))
        .and(header("x-upsert", "true"))
        .and(header("content-type", "audio/mpeg"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "Key": format!("audio/{}", object_path)
        })))
        .expect(times)
        .mount(server)
        .await;
}

pub async fn mount_upload_failure(server: &MockServer, object_path: &str, status: u16, body: &str) {
    Mock::given(method("POST"))
        .and(path(authenticated_path(object_path)))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

pub async fn mount_sign(server: &MockServer, object_path: &str, token: &str) {
    Mock::given(method("POST"))
        .and(path(format!("/storage/v1/object/sign/audio/{}", object_path)))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "signedURL": format!("/object/sign/audio/{}?token={}", object_path, token)
        })))
        .mount(server)
        .await;
}

pub async fn mount_sign_failure(server: &MockServer, object_path: &str) {
    Mock::given(method("POST"))
        .and(path(format!("/storage/v1/object/sign/audio/{}", object_path)))
        .respond_with(ResponseTemplate::new(500).set_body_string("signing unavailable"))
        .mount(server)
        .await;
}
