// src/handlers/purchases.rs

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
    models::purchase::{
        PurchaseDetail, PurchasePayload, PurchaseStatusPayload, PurchaseSummary, Supplier,
        SupplierPayload,
    },
};

// ---
// Fornecedores
// ---

#[utoipa::path(
    get,
    path = "/api/admin/suppliers",
    tag = "Admin Purchases",
    responses(
        (status = 200, description = "Fornecedores", body = Vec<Supplier>)
    ),
    security(("session" = []))
)]
pub async fn list_suppliers(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<Supplier>>, AppError> {
    let suppliers = app_state.purchase_service.list_suppliers().await?;
    Ok(Json(suppliers))
}

#[utoipa::path(
    get,
    path = "/api/admin/suppliers/{id}",
    tag = "Admin Purchases",
    params(
        ("id" = Uuid, Path, description = "ID do fornecedor")
    ),
    responses(
        (status = 200, description = "Fornecedor", body = Supplier),
        (status = 404, description = "Fornecedor não encontrado")
    ),
    security(("session" = []))
)]
pub async fn get_supplier(
    State(app_state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
) -> Result<Json<Supplier>, AppError> {
    let supplier = app_state.purchase_service.get_supplier(id).await?;
    Ok(Json(supplier))
}

#[utoipa::path(
    post,
    path = "/api/admin/suppliers",
    tag = "Admin Purchases",
    request_body = SupplierPayload,
    responses(
        (status = 201, description = "Fornecedor criado", body = Supplier),
        (status = 409, description = "Nome já cadastrado")
    ),
    security(("session" = []))
)]
pub async fn create_supplier(
    State(app_state): State<AppState>,
    JsonBody(payload): JsonBody<SupplierPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let supplier = app_state.purchase_service.create_supplier(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(supplier)))
}

#[utoipa::path(
    put,
    path = "/api/admin/suppliers/{id}",
    tag = "Admin Purchases",
    request_body = SupplierPayload,
    params(
        ("id" = Uuid, Path, description = "ID do fornecedor")
    ),
    responses(
        (status = 200, description = "Fornecedor atualizado", body = Supplier),
        (status = 404, description = "Fornecedor não encontrado")
    ),
    security(("session" = []))
)]
pub async fn update_supplier(
    State(app_state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
    JsonBody(payload): JsonBody<SupplierPayload>,
) -> Result<Json<Supplier>, AppError> {
    payload.validate()?;

    let supplier = app_state
        .purchase_service
        .update_supplier(id, payload.into())
        .await?;
    Ok(Json(supplier))
}

#[utoipa::path(
    delete,
    path = "/api/admin/suppliers/{id}",
    tag = "Admin Purchases",
    params(
        ("id" = Uuid, Path, description = "ID do fornecedor")
    ),
    responses(
        (status = 204, description = "Fornecedor removido"),
        (status = 409, description = "Fornecedor tem notas de compra")
    ),
    security(("session" = []))
)]
pub async fn delete_supplier(
    State(app_state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.purchase_service.delete_supplier(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---
// Notas de compra
// ---

#[utoipa::path(
    get,
    path = "/api/admin/purchases",
    tag = "Admin Purchases",
    responses(
        (status = 200, description = "Notas com o nome do fornecedor", body = Vec<PurchaseSummary>)
    ),
    security(("session" = []))
)]
pub async fn list_purchases(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<PurchaseSummary>>, AppError> {
    let purchases = app_state.purchase_service.list_purchases().await?;
    Ok(Json(purchases))
}

#[utoipa::path(
    get,
    path = "/api/admin/purchases/{id}",
    tag = "Admin Purchases",
    params(
        ("id" = Uuid, Path, description = "ID da nota")
    ),
    responses(
        (status = 200, description = "Nota com itens", body = PurchaseDetail),
        (status = 404, description = "Nota não encontrada")
    ),
    security(("session" = []))
)]
pub async fn get_purchase(
    State(app_state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
) -> Result<Json<PurchaseDetail>, AppError> {
    let purchase = app_state.purchase_service.get_purchase(id).await?;
    Ok(Json(purchase))
}

#[utoipa::path(
    post,
    path = "/api/admin/purchases",
    tag = "Admin Purchases",
    request_body = PurchasePayload,
    responses(
        (status = 201, description = "Nota criada; totais calculados no servidor", body = PurchaseDetail),
        (status = 400, description = "Sem itens ou produto inexistente"),
        (status = 404, description = "Fornecedor não encontrado"),
        (status = 409, description = "Número de nota repetido para o fornecedor")
    ),
    security(("session" = []))
)]
pub async fn create_purchase(
    State(app_state): State<AppState>,
    JsonBody(payload): JsonBody<PurchasePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let purchase = app_state.purchase_service.create_purchase(payload).await?;
    Ok((StatusCode::CREATED, Json(purchase)))
}

#[utoipa::path(
    put,
    path = "/api/admin/purchases/{id}/status",
    tag = "Admin Purchases",
    request_body = PurchaseStatusPayload,
    params(
        ("id" = Uuid, Path, description = "ID da nota")
    ),
    responses(
        (status = 200, description = "Status aplicado (received incrementa o estoque)", body = PurchaseDetail),
        (status = 404, description = "Nota não encontrada"),
        (status = 409, description = "Transição não permitida")
    ),
    security(("session" = []))
)]
pub async fn update_purchase_status(
    State(app_state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
    JsonBody(payload): JsonBody<PurchaseStatusPayload>,
) -> Result<Json<PurchaseDetail>, AppError> {
    let purchase = app_state
        .purchase_service
        .update_status(id, payload.status)
        .await?;
    Ok(Json(purchase))
}

#[utoipa::path(
    delete,
    path = "/api/admin/purchases/{id}",
    tag = "Admin Purchases",
    params(
        ("id" = Uuid, Path, description = "ID da nota")
    ),
    responses(
        (status = 204, description = "Nota removida"),
        (status = 409, description = "Apenas notas pendentes podem ser removidas")
    ),
    security(("session" = []))
)]
pub async fn delete_purchase(
    State(app_state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.purchase_service.delete_purchase(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
