use crate::error::AppError;
use crate::infrastructure::repositories::{StorageError, TtsRepositoryError};

/// Status used when an upstream failed without answering at all.
const BAD_GATEWAY: u16 = 502;

#[derive(Debug, thiserror::Error)]
pub enum NarrationServiceError {
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("{message}")]
    Upstream {
        status: u16,
        message: String,
        detail: String,
    },
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<TtsRepositoryError> for NarrationServiceError {
    fn from(err: TtsRepositoryError) -> Self {
        let (status, detail) = match err {
            TtsRepositoryError::Upstream { status, detail } => (status, detail),
            TtsRepositoryError::TimedOut => (BAD_GATEWAY, "request timed out".to_string()),
            TtsRepositoryError::Transport(detail) => (BAD_GATEWAY, detail),
        };
        NarrationServiceError::Upstream {
            status,
            message: "TTS synthesis failed".to_string(),
            detail,
        }
    }
}

impl From<StorageError> for NarrationServiceError {
    fn from(err: StorageError) -> Self {
        let (status, detail) = match err {
            StorageError::Upstream { status, detail } => (status, detail),
            StorageError::Transport(detail) | StorageError::MalformedResponse(detail) => {
                (BAD_GATEWAY, detail)
            }
        };
        NarrationServiceError::Upstream {
            status,
            message: "Storage upload failed".to_string(),
            detail,
        }
    }
}

impl From<NarrationServiceError> for AppError {
    fn from(err: NarrationServiceError) -> Self {
        match err {
            NarrationServiceError::Invalid(msg) => AppError::BadRequest(msg),
            NarrationServiceError::Upstream {
                status,
                message,
                detail,
            } => AppError::Upstream {
                status,
                message,
                detail,
            },
            NarrationServiceError::Other(e) => AppError::Internal(e.to_string()),
        }
    }
}
