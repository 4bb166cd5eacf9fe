pub mod elevenlabs_tts_repository;
pub mod openai_tts_repository;
pub mod storage_repository;
pub mod supabase_storage_repository;
pub mod tts_repository;

pub use elevenlabs_tts_repository::ElevenLabsTtsRepository;
pub use openai_tts_repository::OpenAiTtsRepository;
pub use storage_repository::{StorageError, StorageRepository};
pub use supabase_storage_repository::SupabaseStorageRepository;
pub use tts_repository::{TtsRepository, TtsRepositoryError};
