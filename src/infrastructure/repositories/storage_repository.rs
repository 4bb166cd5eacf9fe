use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage returned {status}: {detail}")]
    Upstream { status: u16, detail: String },
    #[error("storage transport error: {0}")]
    Transport(String),
    #[error("unexpected storage response: {0}")]
    MalformedResponse(String),
}

/// Object store holding narrated artifacts, addressed by object path.
///
/// Implementations decide how existence and access URLs work for the bucket's
/// visibility. `exists` and `resolve_url` never fail: probe errors read as a
/// cache miss and URL signing errors fall back to the public-style URL.
#[async_trait]
pub trait StorageRepository: Send + Sync {
    /// Whether an artifact is already stored at `object_path`.
    async fn exists(&self, object_path: &str) -> bool;

    /// URL the caller can fetch the artifact from.
    async fn resolve_url(&self, object_path: &str) -> String;

    /// Upload with overwrite semantics.
    async fn upload(&self, object_path: &str, audio: Vec<u8>) -> Result<(), StorageError>;
}
