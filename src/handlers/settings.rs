// src/handlers/settings.rs

use axum::{extract::State, Json};

use crate::{
    common::{
        error::AppError,
        extract::JsonBody,
    },
    config::AppState,
    middleware::rbac::{AdminOnly, RequireRole},
    models::settings::{PaymentSettings, PublicSettings, StoreSettings},
};

#[utoipa::path(
    get,
    path = "/api/settings/public",
    tag = "Settings",
    responses(
        (status = 200, description = "Dados da loja visíveis no checkout", body = PublicSettings)
    )
)]
pub async fn get_public_settings(
    State(app_state): State<AppState>,
) -> Result<Json<PublicSettings>, AppError> {
    let settings = app_state.settings_service.public_settings().await?;
    Ok(Json(settings))
}

#[utoipa::path(
    get,
    path = "/api/admin/settings/store",
    tag = "Settings",
    responses(
        (status = 200, description = "Configurações da loja", body = StoreSettings)
    ),
    security(("session" = []))
)]
pub async fn get_store_settings(
    State(app_state): State<AppState>,
    _guard: RequireRole<AdminOnly>,
) -> Result<Json<StoreSettings>, AppError> {
    let settings = app_state.settings_service.store_settings().await?;
    Ok(Json(settings))
}

#[utoipa::path(
    put,
    path = "/api/admin/settings/store",
    tag = "Settings",
    request_body = StoreSettings,
    responses(
        (status = 200, description = "Configurações salvas", body = StoreSettings),
        (status = 400, description = "Campos inválidos")
    ),
    security(("session" = []))
)]
pub async fn update_store_settings(
    State(app_state): State<AppState>,
    _guard: RequireRole<AdminOnly>,
    JsonBody(payload): JsonBody<StoreSettings>,
) -> Result<Json<StoreSettings>, AppError> {
    // A validação fica no service (inclui regras que o derive não cobre)
    let settings = app_state.settings_service.update_store_settings(payload).await?;
    Ok(Json(settings))
}

#[utoipa::path(
    get,
    path = "/api/admin/settings/payment",
    tag = "Settings",
    responses(
        (status = 200, description = "Formas de pagamento", body = PaymentSettings)
    ),
    security(("session" = []))
)]
pub async fn get_payment_settings(
    State(app_state): State<AppState>,
    _guard: RequireRole<AdminOnly>,
) -> Result<Json<PaymentSettings>, AppError> {
    let settings = app_state.settings_service.payment_settings().await?;
    Ok(Json(settings))
}

#[utoipa::path(
    put,
    path = "/api/admin/settings/payment",
    tag = "Settings",
    request_body = PaymentSettings,
    responses(
        (status = 200, description = "Formas de pagamento salvas", body = PaymentSettings),
        (status = 400, description = "Campos inválidos ou nenhuma forma habilitada")
    ),
    security(("session" = []))
)]
pub async fn update_payment_settings(
    State(app_state): State<AppState>,
    _guard: RequireRole<AdminOnly>,
    JsonBody(payload): JsonBody<PaymentSettings>,
) -> Result<Json<PaymentSettings>, AppError> {
    let settings = app_state.settings_service.update_payment_settings(payload).await?;
    Ok(Json(settings))
}
