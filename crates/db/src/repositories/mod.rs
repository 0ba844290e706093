use emojibot_core::PreferenceError;
use thiserror::Error;

pub mod memory;
pub mod preference;

pub use memory::InMemoryPreferenceStore;
pub use preference::SqlPreferenceStore;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
}

impl From<RepositoryError> for PreferenceError {
    fn from(error: RepositoryError) -> Self {
        Self::Backend(error.to_string())
    }
}
