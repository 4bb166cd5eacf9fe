use super::storage_repository::{StorageError, StorageRepository};
use super::tts_repository::cap_detail;
use crate::infrastructure::config::BucketVisibility;
use async_trait::async_trait;
use reqwest::{header, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const STORAGE_API_PREFIX: &str = "/storage/v1";
const FIRST_BYTE_RANGE: &str = "bytes=0-0";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SignUrlRequest {
    expires_in: u64,
}

#[derive(Debug, Deserialize)]
struct SignUrlResponse {
    #[serde(rename = "signedURL")]
    signed_url: Option<String>,
}

/// Supabase Storage implementation of the storage repository.
pub struct SupabaseStorageRepository {
    http_client: reqwest::Client,
    base_url: String,
    service_key: String,
    bucket: String,
    visibility: BucketVisibility,
    signed_url_ttl: Duration,
}

impl SupabaseStorageRepository {
    pub fn new(
        http_client: reqwest::Client,
        base_url: String,
        service_key: String,
        bucket: String,
        visibility: BucketVisibility,
        signed_url_ttl: Duration,
    ) -> Self {
        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            service_key,
            bucket,
            visibility,
            signed_url_ttl,
        }
    }

    /// Unauthenticated URL for an object. Also the fallback when signing fails.
    pub fn public_url(&self, object_path: &str) -> String {
        format!(
            "{}{}/object/public/{}/{}",
            self.base_url,
            STORAGE_API_PREFIX,
            urlencoding::encode(&self.bucket),
            encode_object_path(object_path)
        )
    }

    fn authenticated_url(&self, object_path: &str) -> String {
        format!(
            "{}{}/object/{}/{}",
            self.base_url,
            STORAGE_API_PREFIX,
            urlencoding::encode(&self.bucket),
            encode_object_path(object_path)
        )
    }

    fn sign_endpoint(&self, object_path: &str) -> String {
        format!(
            "{}{}/object/sign/{}/{}",
            self.base_url,
            STORAGE_API_PREFIX,
            urlencoding::encode(&self.bucket),
            encode_object_path(object_path)
        )
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .bearer_auth(&self.service_key)
            .header("apikey", &self.service_key)
    }

    async fn probe_public(&self, object_path: &str) -> bool {
        let url = self.public_url(object_path);

        match self.http_client.head(&url).send().await {
            Ok(response) if is_present(response.status()) => return true,
            Ok(response) if response.status() == StatusCode::NOT_FOUND => {
                tracing::debug!(object_path = object_path, "HEAD probe reports object missing");
                return false;
            }
            Ok(response) => tracing::debug!(
                object_path = object_path,
                status = response.status().as_u16(),
                "HEAD probe inconclusive, retrying with range request"
            ),
            Err(e) => tracing::debug!(
                object_path = object_path,
                error = %e,
                "HEAD probe failed, retrying with range request"
            ),
        }

        self.probe_range(self.http_client.get(&url), object_path).await
    }

    async fn probe_private(&self, object_path: &str) -> bool {
        let url = self.authenticated_url(object_path);
        let request = self.authorized(self.http_client.get(&url));
        self.probe_range(request, object_path).await
    }

    async fn probe_range(&self, request: reqwest::RequestBuilder, object_path: &str) -> bool {
        match request.header(header::RANGE, FIRST_BYTE_RANGE).send().await {
            Ok(response) => {
                let present = is_present(response.status());
                tracing::debug!(
                    object_path = object_path,
                    status = response.status().as_u16(),
                    present = present,
                    "Range probe completed"
                );
                present
            }
            Err(e) => {
                tracing::warn!(
                    object_path = object_path,
                    error = %e,
                    "Range probe failed, treating as cache miss"
                );
                false
            }
        }
    }

    async fn create_signed_url(&self, object_path: &str) -> Result<String, StorageError> {
        let response = self
            .authorized(self.http_client.post(self.sign_endpoint(object_path)))
            .json(&SignUrlRequest {
                expires_in: self.signed_url_ttl.as_secs(),
            })
            .send()
            .await
            .map_err(|e| StorageError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(StorageError::Upstream {
                status: status.as_u16(),
                detail: cap_detail(detail),
            });
        }

        let body: SignUrlResponse = response
            .json()
            .await
            .map_err(|e| StorageError::MalformedResponse(e.to_string()))?;
        let signed_path = body
            .signed_url
            .filter(|path| !path.is_empty())
            .ok_or_else(|| StorageError::MalformedResponse("missing signedURL".to_string()))?;

        Ok(self.absolute_signed_url(&signed_path))
    }

    fn absolute_signed_url(&self, signed_path: &str) -> String {
        if signed_path.starts_with("http://") || signed_path.starts_with("https://") {
            return signed_path.to_string();
        }
        let separator = if signed_path.starts_with('/') { "" } else { "/" };
        format!(
            "{}{}{}{}",
            self.base_url, STORAGE_API_PREFIX, separator, signed_path
        )
    }
}

#[async_trait]
impl StorageRepository for SupabaseStorageRepository {
    async fn exists(&self, object_path: &str) -> bool {
        match self.visibility {
            BucketVisibility::Public => self.probe_public(object_path).await,
            BucketVisibility::Private => self.probe_private(object_path).await,
        }
    }

    async fn resolve_url(&self, object_path: &str) -> String {
        match self.visibility {
            BucketVisibility::Public => self.public_url(object_path),
            BucketVisibility::Private => match self.create_signed_url(object_path).await {
                Ok(url) => url,
                Err(e) => {
                    tracing::warn!(
                        object_path = object_path,
                        error = %e,
                        "Signing failed, falling back to public URL"
                    );
                    self.public_url(object_path)
                }
            },
        }
    }

    async fn upload(&self, object_path: &str, audio: Vec<u8>) -> Result<(), StorageError> {
        let start_time = std::time::Instant::now();
        let size = audio.len();

        let response = self
            .authorized(self.http_client.post(self.authenticated_url(object_path)))
            .header(header::CONTENT_TYPE, "audio/mpeg")
            .header("x-upsert", "true")
            .body(audio)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, object_path = object_path, "Storage upload failed");
                StorageError::Transport(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::error!(
                status = status.as_u16(),
                object_path = object_path,
                detail = %detail,
                "Storage rejected upload"
            );
            return Err(StorageError::Upstream {
                status: status.as_u16(),
                detail: cap_detail(detail),
            });
        }

        tracing::info!(
            object_path = object_path,
            audio_size_bytes = size,
            latency_ms = start_time.elapsed().as_millis(),
            "Artifact uploaded"
        );

        Ok(())
    }
}

fn is_present(status: StatusCode) -> bool {
    status.is_success()
}

fn encode_object_path(object_path: &str) -> String {
    object_path
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
