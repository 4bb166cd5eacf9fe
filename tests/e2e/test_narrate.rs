use crate::e2e::helpers;

use helpers::mocks::{
    forbid_tts, mount_missing_once, mount_public_object, mount_slow_tts, mount_tts_audio,
    mount_tts_failure, mount_upload, mount_upload_failure,
};
use helpers::{expected_id, TestContext, TEST_VOICE};
use hyper::{Method, StatusCode};
use narrate_backend::infrastructure::config::TtsProvider;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::time::Duration;
use test_context::test_context;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_usage_hint_on_get(ctx: &TestContext) {
    let response = ctx.client.get("/narrate").await.unwrap();

    response.assert_status(StatusCode::OK);
    let body = response.body.as_ref().unwrap();
    assert_eq!(body.get("ok").and_then(|v| v.as_bool()), Some(true));
    assert!(response.field("hint").unwrap().contains("title"));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_narrate_then_serve_from_cache(ctx: &TestContext) {
    let object_path = ctx.object_path("Hello world");
    mount_missing_once(&ctx.storage_server, &object_path).await;
    mount_tts_audio(&ctx.tts_server, TEST_VOICE, 1).await;
    mount_upload(&ctx.storage_server, &object_path, 1).await;
    mount_public_object(&ctx.storage_server, &object_path).await;

    let payload = json!({ "title": "Card A", "campaign": "Camp1", "text": "Hello world" });

    let first = ctx.client.post("/narrate", &payload).await.unwrap();
    first.assert_status(StatusCode::OK);

    let id = expected_id(TEST_VOICE, "Hello world");
    assert_eq!(id.len(), 12);
    assert_eq!(first.field("id"), Some(id.as_str()));
    assert_eq!(first.field("url"), Some(ctx.public_url(&object_path).as_str()));
    assert!(first.field("url").unwrap().contains(&format!("cards/{}.mp3", id)));
    assert_eq!(
        first.field("filename"),
        Some(format!("Camp1__Card_A__{}.mp3", id).as_str())
    );
    assert_eq!(
        first.body.as_ref().unwrap().get("bytes").and_then(|v| v.as_u64()),
        Some(8)
    );

    let second = ctx.client.post("/narrate", &payload).await.unwrap();
    second.assert_status(StatusCode::OK);
    assert_eq!(second.field("url"), first.field("url"));
    assert!(second.body.as_ref().unwrap().get("bytes").is_none());

    ctx.tts_server.verify().await;
    ctx.storage_server.verify().await;
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reuse_artifact_across_titles_and_formatting(ctx: &TestContext) {
    let object_path = ctx.object_path("Hello world");
    mount_public_object(&ctx.storage_server, &object_path).await;
    forbid_tts(&ctx.tts_server).await;

    let a = ctx
        .client
        .post("/narrate", &json!({ "title": "Card A", "campaign": "Camp1", "text": "Hello world" }))
        .await
        .unwrap();
    let b = ctx
        .client
        .post(
            "/narrate",
            &json!({ "title": "Renamed", "campaign": "Camp2", "text": "  Hello \t world\r\n" }),
        )
        .await
        .unwrap();

    a.assert_status(StatusCode::OK);
    b.assert_status(StatusCode::OK);
    assert_eq!(a.field("id"), b.field("id"));
    assert_eq!(a.field("url"), b.field("url"));
    assert_ne!(a.field("filename"), b.field("filename"));

    ctx.tts_server.verify().await;
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_empty_text_without_upstream_calls(ctx: &TestContext) {
    let response = ctx
        .client
        .post("/narrate", &json!({ "title": "Card A", "campaign": "Camp1", "text": "   " }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("text");

    assert!(ctx.tts_server.received_requests().await.unwrap().is_empty());
    assert!(ctx.storage_server.received_requests().await.unwrap().is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_missing_title_or_campaign(ctx: &TestContext) {
    let missing_title = ctx
        .client
        .post("/narrate", &json!({ "campaign": "Camp1", "text": "Hello" }))
        .await
        .unwrap();
    missing_title
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("title");

    let missing_campaign = ctx
        .client
        .post("/narrate", &json!({ "title": "Card A", "text": "Hello" }))
        .await
        .unwrap();
    missing_campaign
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("campaign");

    assert!(ctx.storage_server.received_requests().await.unwrap().is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_malformed_json(ctx: &TestContext) {
    let response = ctx.client.post_raw("/narrate", "{not json").await.unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Invalid JSON body");
}

#[tokio::test]
async fn it_should_report_processing_on_timeout_and_serve_later_retry() {
    let ctx = TestContext::start(|config| config.tts_timeout_ms = 200).await;
    let object_path = ctx.object_path("Hello world");
    mount_missing_once(&ctx.storage_server, &object_path).await;
    mount_slow_tts(&ctx.tts_server, Duration::from_secs(10)).await;

    let payload = json!({ "title": "Card A", "campaign": "Camp1", "text": "Hello world" });

    let first = ctx.client.post("/narrate", &payload).await.unwrap();
    first.assert_status(StatusCode::ACCEPTED);
    let body = first.body.as_ref().unwrap();
    assert_eq!(body.get("ok").and_then(|v| v.as_bool()), Some(false));
    assert_eq!(first.field("status"), Some("processing"));
    assert_eq!(first.field("id"), Some(expected_id(TEST_VOICE, "Hello world").as_str()));
    assert!(first.field("hint").is_some());

    // Another attempt published the artifact in the meantime
    mount_public_object(&ctx.storage_server, &object_path).await;

    let retry = ctx.client.post("/narrate", &payload).await.unwrap();
    retry.assert_status(StatusCode::OK);
    assert_eq!(retry.field("url"), Some(ctx.public_url(&object_path).as_str()));
    assert_eq!(ctx.tts_server.received_requests().await.unwrap().len(), 1);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_pass_through_tts_failure_status(ctx: &TestContext) {
    let object_path = ctx.object_path("Hello world");
    mount_missing_once(&ctx.storage_server, &object_path).await;
    mount_tts_failure(&ctx.tts_server, 401, r#"{"detail":{"status":"invalid_api_key"}}"#).await;

    let response = ctx
        .client
        .post("/narrate", &json!({ "title": "Card A", "campaign": "Camp1", "text": "Hello world" }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::UNAUTHORIZED)
        .assert_error_message("TTS synthesis failed");
    assert!(response.field("detail").unwrap().contains("invalid_api_key"));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_pass_through_upload_failure_status(ctx: &TestContext) {
    let object_path = ctx.object_path("Hello world");
    mount_missing_once(&ctx.storage_server, &object_path).await;
    mount_tts_audio(&ctx.tts_server, TEST_VOICE, 1).await;
    mount_upload_failure(&ctx.storage_server, &object_path, 403, "row-level security").await;

    let response = ctx
        .client
        .post("/narrate", &json!({ "title": "Card A", "campaign": "Camp1", "text": "Hello world" }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::FORBIDDEN)
        .assert_error_message("Storage upload failed");
    assert_eq!(response.field("detail"), Some("row-level security"));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_use_requested_voice(ctx: &TestContext) {
    let id = expected_id("custom-voice", "Hello world");
    let object_path = format!("cards/{}.mp3", id);
    mount_missing_once(&ctx.storage_server, &object_path).await;
    mount_tts_audio(&ctx.tts_server, "custom-voice", 1).await;
    mount_upload(&ctx.storage_server, &object_path, 1).await;

    let response = ctx
        .client
        .post(
            "/narrate",
            &json!({ "title": "Card A", "campaign": "Camp1", "text": "Hello world", "voiceId": "custom-voice" }),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.field("id"), Some(id.as_str()));
    assert_ne!(id, expected_id(TEST_VOICE, "Hello world"));
}

#[tokio::test]
async fn it_should_reject_voice_unknown_to_provider_without_upstream_calls() {
    let ctx = TestContext::start(|config| {
        config.tts_provider = TtsProvider::OpenAi;
        config.openai_api_key = Some("sk-test".to_string());
        config.default_voice_id = "alloy".to_string();
    })
    .await;

    let response = ctx
        .client
        .post(
            "/narrate",
            &json!({ "title": "Card A", "campaign": "Camp1", "text": "Hello world", "voiceId": "narrator" }),
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("narrator");
    assert!(ctx.storage_server.received_requests().await.unwrap().is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_unsupported_methods(ctx: &TestContext) {
    for method in [Method::PUT, Method::DELETE, Method::PATCH] {
        let response = ctx
            .client
            .request(method, "/narrate", None, &[])
            .await
            .unwrap();

        response
            .assert_status(StatusCode::METHOD_NOT_ALLOWED)
            .assert_header("allow", "GET, POST, OPTIONS");
    }
}

#[tokio::test]
async fn it_should_fail_with_500_when_unconfigured() {
    let ctx = TestContext::start(|config| {
        config.storage_url = None;
        config.elevenlabs_api_key = None;
    })
    .await;

    let response = ctx
        .client
        .post("/narrate", &json!({ "title": "Card A", "campaign": "Camp1", "text": "Hello world" }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR)
        .assert_error_message("ELEVENLABS_API_KEY, SUPABASE_URL");

    // GET still answers so callers can discover the contract
    ctx.client.get("/narrate").await.unwrap().assert_status(StatusCode::OK);
}
