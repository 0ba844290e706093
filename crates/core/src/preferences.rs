use async_trait::async_trait;
use thiserror::Error;

use crate::style::StylePreference;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PreferenceError {
    #[error("preference backend failure: {0}")]
    Backend(String),
}

/// Per-user style preference storage.
///
/// Implementations own their synchronisation. Concurrent writes to the same
/// user resolve as last-write-wins.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Stored style for `user_id`, or `None` when the user never chose one.
    async fn find_style(&self, user_id: &str) -> Result<Option<StylePreference>, PreferenceError>;

    async fn save_style(&self, user_id: &str, style: StylePreference)
        -> Result<(), PreferenceError>;

    async fn style_or_default(&self, user_id: &str) -> Result<StylePreference, PreferenceError> {
        Ok(self.find_style(user_id).await?.unwrap_or_default())
    }
}
