// src/handlers/newsletter.rs

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::{
    common::{
        error::AppError,
        extract::JsonBody,
    },
    config::AppState,
    models::newsletter::{NewsletterPayload, NewsletterResponse, NewsletterSubscriber},
};

#[utoipa::path(
    post,
    path = "/api/newsletter",
    tag = "Newsletter",
    request_body = NewsletterPayload,
    responses(
        (status = 201, description = "Inscrição criada", body = NewsletterResponse),
        (status = 200, description = "Email já inscrito", body = NewsletterResponse),
        (status = 400, description = "Email inválido")
    )
)]
pub async fn subscribe(
    State(app_state): State<AppState>,
    JsonBody(payload): JsonBody<NewsletterPayload>,
) -> Result<(StatusCode, Json<NewsletterResponse>), AppError> {
    payload.validate()?;

    // Guardado sempre em minúsculas
    let email = payload.email.trim().to_lowercase();
    let (_, created) = app_state.store.subscribe(&email).await?;

    if created {
        tracing::info!("Nova inscrição na newsletter");
        Ok((
            StatusCode::CREATED,
            Json(NewsletterResponse {
                message: "Thanks for subscribing!".to_string(),
            }),
        ))
    } else {
        Ok((
            StatusCode::OK,
            Json(NewsletterResponse {
                message: "You are already subscribed.".to_string(),
            }),
        ))
    }
}

#[utoipa::path(
    get,
    path = "/api/admin/newsletter",
    tag = "Newsletter",
    responses(
        (status = 200, description = "Inscritos, mais recentes primeiro", body = Vec<NewsletterSubscriber>)
    ),
    security(("session" = []))
)]
pub async fn list_subscribers(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<NewsletterSubscriber>>, AppError> {
    let subscribers = app_state.store.list_subscribers().await?;
    Ok(Json(subscribers))
}
