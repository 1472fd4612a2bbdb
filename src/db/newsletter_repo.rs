// src/db/newsletter_repo.rs

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{NewsletterRepository, PgStore},
    models::newsletter::NewsletterSubscriber,
};

#[async_trait]
impl NewsletterRepository for PgStore {
    async fn subscribe(&self, email: &str) -> Result<(NewsletterSubscriber, bool), AppError> {
        // ON CONFLICT DO NOTHING não devolve linha quando o e-mail já existe
        let inserted = sqlx::query_as::<_, NewsletterSubscriber>(
            r#"
            INSERT INTO newsletter_subscribers (id, email)
            VALUES ($1, $2)
            ON CONFLICT (email) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(subscriber) = inserted {
            return Ok((subscriber, true));
        }

        let existing = sqlx::query_as::<_, NewsletterSubscriber>(
            "SELECT * FROM newsletter_subscribers WHERE email = $1",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        Ok((existing, false))
    }

    async fn list_subscribers(&self) -> Result<Vec<NewsletterSubscriber>, AppError> {
        let subscribers = sqlx::query_as::<_, NewsletterSubscriber>(
            "SELECT * FROM newsletter_subscribers ORDER BY subscribed_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(subscribers)
    }
}
