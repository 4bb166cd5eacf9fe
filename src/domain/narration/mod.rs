pub mod canonical;
pub mod dto;
pub mod error;
pub mod identifier;
pub mod locator;
pub mod service;
pub mod synthesis;

pub use canonical::canonicalize;
pub use dto::{NarrationOutcome, NarrationRequest, NarrationResult};
pub use error::NarrationServiceError;
pub use identifier::content_identifier;
pub use locator::ArtifactLocation;
pub use service::{NarrationService, NarrationServiceApi};
