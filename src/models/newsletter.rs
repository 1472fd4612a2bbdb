// src/models/newsletter.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewsletterSubscriber {
    pub id: Uuid,
    #[schema(example = "cliente@example.com")]
    pub email: String,
    pub subscribed_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct NewsletterPayload {
    #[validate(email(message = "Please enter a valid email address."))]
    pub email: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NewsletterResponse {
    pub message: String,
}
