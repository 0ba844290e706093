use chrono::Utc;
use sqlx::Row;

use emojibot_core::{PreferenceError, PreferenceStore, StylePreference};

use super::RepositoryError;
use crate::DbPool;

pub struct SqlPreferenceStore {
    pool: DbPool,
}

impl SqlPreferenceStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait::async_trait]
impl PreferenceStore for SqlPreferenceStore {
    async fn find_style(&self, user_id: &str) -> Result<Option<StylePreference>, PreferenceError> {
        let row = sqlx::query("SELECT style FROM user_style_preference WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(RepositoryError::from)?;

        let Some(row) = row else {
            return Ok(None);
        };
        let tag: String =
            row.try_get("style").map_err(|e| RepositoryError::Decode(e.to_string()))?;

        // Rows written before validation existed may hold arbitrary tags.
        Ok(Some(StylePreference::from_tag_lossy(&tag)))
    }

    async fn save_style(
        &self,
        user_id: &str,
        style: StylePreference,
    ) -> Result<(), PreferenceError> {
        sqlx::query(
            "INSERT INTO user_style_preference (user_id, style, updated_at)
             VALUES (?, ?, ?)
             ON CONFLICT(user_id) DO UPDATE SET
                 style = excluded.style,
                 updated_at = excluded.updated_at",
        )
        .bind(user_id)
        .bind(style.as_tag())
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(RepositoryError::from)?;

        Ok(())
    }
}
