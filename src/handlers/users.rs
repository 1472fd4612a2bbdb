// src/handlers/users.rs
//
// Gestão de usuários: só admins.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        error::AppError,
        extract::{JsonBody, PathParam},
    },
    config::AppState,
    middleware::rbac::{AdminOnly, RequireRole},
    models::auth::{CreateUserPayload, UpdateUserPayload, User},
};

#[utoipa::path(
    get,
    path = "/api/admin/users",
    tag = "Admin Users",
    responses(
        (status = 200, description = "Todos os usuários", body = Vec<User>),
        (status = 403, description = "Apenas admins")
    ),
    security(("session" = []))
)]
pub async fn list_users(
    State(app_state): State<AppState>,
    _guard: RequireRole<AdminOnly>,
) -> Result<Json<Vec<User>>, AppError> {
    let users = app_state.user_service.list_users().await?;
    Ok(Json(users))
}

#[utoipa::path(
    post,
    path = "/api/admin/users",
    tag = "Admin Users",
    request_body = CreateUserPayload,
    responses(
        (status = 201, description = "Usuário criado", body = User),
        (status = 409, description = "Username ou email já em uso")
    ),
    security(("session" = []))
)]
pub async fn create_user(
    State(app_state): State<AppState>,
    _guard: RequireRole<AdminOnly>,
    JsonBody(payload): JsonBody<CreateUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let user = app_state.user_service.create_user(payload).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[utoipa::path(
    put,
    path = "/api/admin/users/{id}",
    tag = "Admin Users",
    request_body = UpdateUserPayload,
    params(
        ("id" = Uuid, Path, description = "ID do usuário")
    ),
    responses(
        (status = 200, description = "Usuário atualizado", body = User),
        (status = 403, description = "Super admin não pode ser desativado nem rebaixado"),
        (status = 404, description = "Usuário não encontrado")
    ),
    security(("session" = []))
)]
pub async fn update_user(
    State(app_state): State<AppState>,
    _guard: RequireRole<AdminOnly>,
    PathParam(id): PathParam<Uuid>,
    JsonBody(payload): JsonBody<UpdateUserPayload>,
) -> Result<Json<User>, AppError> {
    payload.validate()?;

    let user = app_state.user_service.update_user(id, payload).await?;
    Ok(Json(user))
}

#[utoipa::path(
    delete,
    path = "/api/admin/users/{id}",
    tag = "Admin Users",
    params(
        ("id" = Uuid, Path, description = "ID do usuário")
    ),
    responses(
        (status = 204, description = "Usuário removido"),
        (status = 403, description = "Super admin ou a própria conta"),
        (status = 404, description = "Usuário não encontrado")
    ),
    security(("session" = []))
)]
pub async fn delete_user(
    State(app_state): State<AppState>,
    guard: RequireRole<AdminOnly>,
    PathParam(id): PathParam<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state
        .user_service
        .delete_user(&guard.session().user, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
