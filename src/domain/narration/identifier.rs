use sha2::{Digest, Sha256};

/// Length of the hex prefix kept from the digest.
pub const CONTENT_ID_LENGTH: usize = 12;

const VOICE_SEPARATOR: &str = "::";

/// Derive the cache key for a narration from the voice and canonical text.
///
/// The result is the first [`CONTENT_ID_LENGTH`] lowercase hex characters of
/// `SHA-256(voice + "::" + canonical_text)`. Callers must reject voices
/// containing `:` so the separator stays unambiguous.
pub fn content_identifier(voice: &str, canonical_text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(voice.as_bytes());
    hasher.update(VOICE_SEPARATOR.as_bytes());
    hasher.update(canonical_text.as_bytes());
    let digest = format!("{:x}", hasher.finalize());

    digest[..CONTENT_ID_LENGTH].to_string()
}
