// src/handlers/catalog.rs

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
        extract::{JsonBody, PathParam, QueryParams},
    },
    config::AppState,
    models::catalog::{
        Category, CategoryPayload, Product, ProductPage, ProductPayload, ProductQuery,
        ProductWithCategory,
    },
};

// ---
// Vitrine (público)
// ---

#[utoipa::path(
    get,
    path = "/api/products",
    tag = "Catalog",
    params(ProductQuery),
    responses(
        (status = 200, description = "Página de produtos filtrada", body = ProductPage),
        (status = 400, description = "Filtro, ordenação ou paginação inválidos")
    )
)]
pub async fn list_products(
    State(app_state): State<AppState>,
    QueryParams(query): QueryParams<ProductQuery>,
) -> Result<Json<ProductPage>, AppError> {
    let page = app_state.catalog_service.search_products(&query).await?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/api/products/featured",
    tag = "Catalog",
    responses(
        (status = 200, description = "Produtos em destaque", body = Vec<ProductWithCategory>)
    )
)]
pub async fn featured_products(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<ProductWithCategory>>, AppError> {
    let products = app_state.catalog_service.featured_products().await?;
    Ok(Json(products))
}

#[utoipa::path(
    get,
    path = "/api/products/{slug}",
    tag = "Catalog",
    params(
        ("slug" = String, Path, description = "Slug do produto")
    ),
    responses(
        (status = 200, description = "Produto com categoria", body = ProductWithCategory),
        (status = 404, description = "Produto não encontrado")
    )
)]
pub async fn get_product(
    State(app_state): State<AppState>,
    PathParam(slug): PathParam<String>,
) -> Result<Json<ProductWithCategory>, AppError> {
    let product = app_state.catalog_service.product_by_slug(&slug).await?;
    Ok(Json(product))
}

#[utoipa::path(
    get,
    path = "/api/categories",
    tag = "Catalog",
    responses(
        (status = 200, description = "Todas as categorias", body = Vec<Category>)
    )
)]
pub async fn list_categories(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<Category>>, AppError> {
    let categories = app_state.catalog_service.list_categories().await?;
    Ok(Json(categories))
}

// ---
// Admin: produtos
// ---

#[utoipa::path(
    post,
    path = "/api/admin/products",
    tag = "Admin Catalog",
    request_body = ProductPayload,
    responses(
        (status = 201, description = "Produto criado", body = Product),
        (status = 404, description = "Categoria não encontrada"),
        (status = 409, description = "Slug já existe")
    ),
    security(("session" = []))
)]
pub async fn create_product(
    State(app_state): State<AppState>,
    JsonBody(payload): JsonBody<ProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let product = app_state.catalog_service.create_product(payload).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

#[utoipa::path(
    put,
    path = "/api/admin/products/{id}",
    tag = "Admin Catalog",
    request_body = ProductPayload,
    params(
        ("id" = Uuid, Path, description = "ID do produto")
    ),
    responses(
        (status = 200, description = "Produto atualizado", body = Product),
        (status = 404, description = "Produto ou categoria não encontrados"),
        (status = 409, description = "Slug já existe")
    ),
    security(("session" = []))
)]
pub async fn update_product(
    State(app_state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
    JsonBody(payload): JsonBody<ProductPayload>,
) -> Result<Json<Product>, AppError> {
    payload.validate()?;

    let product = app_state.catalog_service.update_product(id, payload).await?;
    Ok(Json(product))
}

#[utoipa::path(
    delete,
    path = "/api/admin/products/{id}",
    tag = "Admin Catalog",
    params(
        ("id" = Uuid, Path, description = "ID do produto")
    ),
    responses(
        (status = 204, description = "Produto removido"),
        (status = 404, description = "Produto não encontrado"),
        (status = 409, description = "Produto presente em notas de compra")
    ),
    security(("session" = []))
)]
pub async fn delete_product(
    State(app_state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.catalog_service.delete_product(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---
// Admin: categorias
// ---

#[utoipa::path(
    post,
    path = "/api/admin/categories",
    tag = "Admin Catalog",
    request_body = CategoryPayload,
    responses(
        (status = 201, description = "Categoria criada", body = Category),
        (status = 409, description = "Slug já existe")
    ),
    security(("session" = []))
)]
pub async fn create_category(
    State(app_state): State<AppState>,
    JsonBody(payload): JsonBody<CategoryPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let category = app_state.catalog_service.create_category(payload).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

#[utoipa::path(
    put,
    path = "/api/admin/categories/{id}",
    tag = "Admin Catalog",
    request_body = CategoryPayload,
    params(
        ("id" = Uuid, Path, description = "ID da categoria")
    ),
    responses(
        (status = 200, description = "Categoria atualizada", body = Category),
        (status = 404, description = "Categoria não encontrada")
    ),
    security(("session" = []))
)]
pub async fn update_category(
    State(app_state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
    JsonBody(payload): JsonBody<CategoryPayload>,
) -> Result<Json<Category>, AppError> {
    payload.validate()?;

    let category = app_state.catalog_service.update_category(id, payload).await?;
    Ok(Json(category))
}

#[utoipa::path(
    delete,
    path = "/api/admin/categories/{id}",
    tag = "Admin Catalog",
    params(
        ("id" = Uuid, Path, description = "ID da categoria")
    ),
    responses(
        (status = 204, description = "Categoria removida"),
        (status = 409, description = "Categoria ainda tem produtos")
    ),
    security(("session" = []))
)]
pub async fn delete_category(
    State(app_state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.catalog_service.delete_category(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
