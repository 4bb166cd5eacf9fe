use serde::{Deserialize, Serialize};

/// Body of POST /narrate. Fields are optional here so that absence is reported
/// as a validation error rather than a deserialization failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrationRequest {
    pub title: Option<String>,
    pub campaign: Option<String>,
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice_id: Option<String>,
}

/// A narration that is stored and reachable.
#[derive(Debug, Clone, PartialEq)]
pub struct NarrationResult {
    pub id: String,
    pub url: String,
    pub filename: String,
    /// Size of freshly synthesized audio; `None` when served from storage.
    pub bytes: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NarrationOutcome {
    Resolved(NarrationResult),
    /// Synthesis outran its deadline; resubmitting the same payload is safe.
    Processing { id: String },
}
