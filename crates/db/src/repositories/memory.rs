use std::collections::HashMap;

use tokio::sync::RwLock;

use emojibot_core::{PreferenceError, PreferenceStore, StylePreference};

/// Process-lifetime preference store. Entries are never evicted.
#[derive(Default)]
pub struct InMemoryPreferenceStore {
    styles: RwLock<HashMap<String, StylePreference>>,
}

impl InMemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.styles.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.styles.read().await.is_empty()
    }
}

#[async_trait::async_trait]
impl PreferenceStore for InMemoryPreferenceStore {
    async fn find_style(&self, user_id: &str) -> Result<Option<StylePreference>, PreferenceError> {
        let styles = self.styles.read().await;
        Ok(styles.get(user_id).copied())
    }

    async fn save_style(
        &self,
        user_id: &str,
        style: StylePreference,
    ) -> Result<(), PreferenceError> {
        let mut styles = self.styles.write().await;
        styles.insert(user_id.to_owned(), style);
        Ok(())
    }
}
