use axum::{body::Bytes, extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    domain::narration::{NarrationOutcome, NarrationRequest, NarrationServiceApi},
    error::{AppError, AppResult},
};

const USAGE_HINT: &str = "POST JSON {title, campaign, text, voiceId?} to narrate text into an MP3 and receive its URL.";
const PROCESSING_HINT: &str = "Narration is still being generated. Resubmit the identical request shortly.";

/// Response for GET /narrate
#[derive(Debug, Serialize, Deserialize)]
pub struct HintResponse {
    pub ok: bool,
    pub hint: String,
}

/// Response for a stored narration
#[derive(Debug, Serialize, Deserialize)]
pub struct NarrationResponse {
    pub ok: bool,
    pub id: String,
    pub url: String,
    pub filename: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes: Option<usize>,
}

/// Response when synthesis outran its deadline
#[derive(Debug, Serialize, Deserialize)]
pub struct ProcessingResponse {
    pub ok: bool,
    pub status: String,
    pub id: String,
    pub hint: String,
}

pub struct NarrateController {
    narration_service: Option<Arc<dyn NarrationServiceApi>>,
    missing_config: Vec<&'static str>,
}

impl NarrateController {
    pub fn new(narration_service: Arc<dyn NarrationServiceApi>) -> Self {
        Self {
            narration_service: Some(narration_service),
            missing_config: Vec::new(),
        }
    }

    /// Controller for a process started without the settings narration needs.
    /// Every POST answers 500 naming what is missing.
    pub fn unconfigured(missing_config: Vec<&'static str>) -> Self {
        Self {
            narration_service: None,
            missing_config,
        }
    }

    /// GET /narrate - Usage hint
    pub async fn hint() -> Json<HintResponse> {
        Json(HintResponse {
            ok: true,
            hint: USAGE_HINT.to_string(),
        })
    }

    /// OPTIONS /narrate - CORS preflight, headers come from the CORS middleware
    pub async fn preflight() -> StatusCode {
        StatusCode::OK
    }

    /// Any other method on /narrate
    pub async fn method_not_allowed() -> AppError {
        AppError::MethodNotAllowed
    }

    /// POST /narrate - Narrate text or return the stored narration
    pub async fn narrate(
        State(controller): State<Arc<NarrateController>>,
        body: Bytes,
    ) -> AppResult<axum::response::Response> {
        let service = controller.narration_service.as_ref().ok_or_else(|| {
            AppError::Configuration(controller.missing_config.join(", "))
        })?;

        let request: NarrationRequest = serde_json::from_slice(&body)
            .map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {}", e)))?;

        let response = match service.narrate(request).await? {
            NarrationOutcome::Resolved(result) => (
                StatusCode::OK,
                Json(NarrationResponse {
                    ok: true,
                    id: result.id,
                    url: result.url,
                    filename: result.filename,
                    bytes: result.bytes,
                }),
            )
                .into_response(),
            NarrationOutcome::Processing { id } => (
                StatusCode::ACCEPTED,
                Json(ProcessingResponse {
                    ok: false,
                    status: "processing".to_string(),
                    id,
                    hint: PROCESSING_HINT.to_string(),
                }),
            )
                .into_response(),
        };

        Ok(response)
    }
}
