// src/models/catalog.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::models::settings::validate_money;

// --- 1. Categorias ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    #[schema(example = "Cakes")]
    pub name: String,
    #[schema(example = "cakes")]
    pub slug: String,
    pub created_at: DateTime<Utc>,
}

// --- 2. Produtos ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    #[schema(example = "strawberry-dream-cake")]
    pub slug: String,
    #[schema(example = "Strawberry Dream Cake")]
    pub name: String,
    pub description: String,
    #[schema(example = 24.99)]
    pub price: Decimal,
    pub image: String,
    pub category_id: Uuid,
    pub featured: bool,
    pub is_bestseller: bool,
    pub is_new: bool,
    pub is_popular: bool,
    // Variantes opcionais (TEXT[] no Postgres)
    pub sizes: Vec<String>,
    pub colors: Vec<String>,
    pub dietary_options: Vec<String>,
    #[schema(example = 12)]
    pub stock: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Visão de leitura da vitrine: produto + categoria embutida
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductWithCategory {
    #[serde(flatten)]
    pub product: Product,
    pub category: Category,
}

// Dados de entrada já validados para criar/atualizar um produto.
// O slug já chega resolvido (informado ou derivado do nome).
#[derive(Debug, Clone)]
pub struct ProductInput {
    pub slug: String,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub image: String,
    pub category_id: Uuid,
    pub featured: bool,
    pub is_bestseller: bool,
    pub is_new: bool,
    pub is_popular: bool,
    pub sizes: Vec<String>,
    pub colors: Vec<String>,
    pub dietary_options: Vec<String>,
    pub stock: i32,
}

#[derive(Debug, Clone)]
pub struct CategoryInput {
    pub name: String,
    pub slug: String,
}

// --- Payloads do admin ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    #[validate(length(min = 2, message = "Product name must be at least 2 characters."))]
    #[schema(example = "Strawberry Dream Cake")]
    pub name: String,
    /// Opcional: derivado do nome quando ausente
    pub slug: Option<String>,
    #[serde(default)]
    pub description: String,
    #[validate(custom(function = "validate_money"))]
    #[schema(example = 24.99)]
    pub price: Decimal,
    #[serde(default)]
    pub image: String,
    pub category_id: Uuid,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub is_bestseller: bool,
    #[serde(default)]
    pub is_new: bool,
    #[serde(default)]
    pub is_popular: bool,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub dietary_options: Vec<String>,
    #[serde(default)]
    #[validate(range(min = 0, message = "Stock cannot be negative."))]
    pub stock: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CategoryPayload {
    #[validate(length(min = 2, message = "Category name must be at least 2 characters."))]
    #[schema(example = "Cakes")]
    pub name: String,
    pub slug: Option<String>,
}

// --- 3. Query da vitrine (GET /api/products) ---
// Tudo chega como string crua; o parsing e as regras ficam em
// services::catalog_query.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductQuery {
    /// Busca livre (nome ou descrição, sem diferenciar maiúsculas)
    pub q: Option<String>,
    /// Slug da categoria
    pub category: Option<String>,
    /// Faixas de preço separadas por vírgula: "0-10,20-30" ou "50-"
    pub price: Option<String>,
    /// Tags dietéticas separadas por vírgula; o produto precisa ter todas
    pub dietary: Option<String>,
    pub featured: Option<bool>,
    pub bestseller: Option<bool>,
    pub new: Option<bool>,
    pub popular: Option<bool>,
    /// newest | price_asc | price_desc | name_asc | name_desc
    pub sort: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductPage {
    pub products: Vec<ProductWithCategory>,
    #[schema(example = 42)]
    pub total: usize,
    pub limit: Option<usize>,
    pub offset: usize,
}
