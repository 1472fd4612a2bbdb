// src/db/settings_repo.rs

use async_trait::async_trait;
use serde_json::Value;

use crate::{
    common::error::AppError,
    db::{PgStore, SettingsRepository},
};

#[async_trait]
impl SettingsRepository for PgStore {
    async fn get_setting(&self, key: &str) -> Result<Option<Value>, AppError> {
        // Seção nunca salva = None; o service aplica os defaults
        let value: Option<Value> = sqlx::query_scalar("SELECT value FROM settings WHERE key = $1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(value)
    }

    async fn put_setting(&self, key: &str, value: &Value) -> Result<(), AppError> {
        // UPSERT (Insert or Update)
        sqlx::query(
            r#"
            INSERT INTO settings (key, value)
            VALUES ($1, $2)
            ON CONFLICT (key)
            DO UPDATE SET
                value = EXCLUDED.value,
                updated_at = NOW()
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
