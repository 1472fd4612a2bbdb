// src/db.rs
//
// Camada de persistência. Cada domínio tem o seu trait de repositório;
// `PgStore` (Postgres via sqlx) e `MemoryStore` (sem DATABASE_URL) implementam todos.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        auth::{NewUser, User, UserChanges},
        catalog::{Category, CategoryInput, Product, ProductInput, ProductWithCategory},
        newsletter::NewsletterSubscriber,
        purchase::{
            NewPurchase, PurchaseDetail, PurchaseSummary, Supplier, SupplierInput,
        },
    },
};

pub mod catalog_repo;
pub mod memory;
pub mod newsletter_repo;
pub mod purchase_repo;
pub mod seed;
pub mod settings_repo;
pub mod supplier_repo;
pub mod user_repo;

pub use memory::MemoryStore;

#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn list_categories(&self) -> Result<Vec<Category>, AppError>;
    async fn find_category(&self, id: Uuid) -> Result<Option<Category>, AppError>;
    async fn create_category(&self, input: &CategoryInput) -> Result<Category, AppError>;
    async fn update_category(&self, id: Uuid, input: &CategoryInput) -> Result<Option<Category>, AppError>;
    /// Falha com Conflict se ainda houver produtos na categoria.
    async fn delete_category(&self, id: Uuid) -> Result<bool, AppError>;

    /// Catálogo completo, em ordem de cadastro.
    async fn list_products(&self) -> Result<Vec<ProductWithCategory>, AppError>;
    async fn find_product(&self, id: Uuid) -> Result<Option<Product>, AppError>;
    async fn find_product_by_slug(&self, slug: &str) -> Result<Option<ProductWithCategory>, AppError>;
    async fn find_products_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Product>, AppError>;
    async fn create_product(&self, input: &ProductInput) -> Result<Product, AppError>;
    async fn update_product(&self, id: Uuid, input: &ProductInput) -> Result<Option<Product>, AppError>;
    /// Falha com Conflict se o produto aparece em alguma nota de compra.
    async fn delete_product(&self, id: Uuid) -> Result<bool, AppError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn list_users(&self) -> Result<Vec<User>, AppError>;
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, AppError>;
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError>;
    async fn create_user(&self, user: &NewUser) -> Result<User, AppError>;
    async fn update_user(&self, id: Uuid, changes: &UserChanges) -> Result<Option<User>, AppError>;
    async fn touch_last_login(&self, id: Uuid) -> Result<(), AppError>;
    async fn delete_user(&self, id: Uuid) -> Result<bool, AppError>;
}

#[async_trait]
pub trait SupplierRepository: Send + Sync {
    async fn list_suppliers(&self) -> Result<Vec<Supplier>, AppError>;
    async fn find_supplier(&self, id: Uuid) -> Result<Option<Supplier>, AppError>;
    async fn create_supplier(&self, input: &SupplierInput) -> Result<Supplier, AppError>;
    async fn update_supplier(&self, id: Uuid, input: &SupplierInput) -> Result<Option<Supplier>, AppError>;
    /// Falha com Conflict se o fornecedor tiver notas de compra.
    async fn delete_supplier(&self, id: Uuid) -> Result<bool, AppError>;
}

#[async_trait]
pub trait PurchaseRepository: Send + Sync {
    async fn list_purchases(&self) -> Result<Vec<PurchaseSummary>, AppError>;
    async fn find_purchase(&self, id: Uuid) -> Result<Option<PurchaseDetail>, AppError>;
    /// Grava cabeçalho + itens. Se a nota já nasce "received", o estoque
    /// é incrementado na mesma transação.
    async fn create_purchase(&self, purchase: &NewPurchase) -> Result<PurchaseDetail, AppError>;
    /// pending -> received + incremento de estoque, atômico.
    /// Retorna None se a nota não existe ou não está mais pendente.
    async fn mark_received(&self, id: Uuid) -> Result<Option<PurchaseDetail>, AppError>;
    /// Só remove notas pendentes.
    async fn delete_pending_purchase(&self, id: Uuid) -> Result<bool, AppError>;
}

#[async_trait]
pub trait SettingsRepository: Send + Sync {
    async fn get_setting(&self, key: &str) -> Result<Option<Value>, AppError>;
    async fn put_setting(&self, key: &str, value: &Value) -> Result<(), AppError>;
}

#[async_trait]
pub trait NewsletterRepository: Send + Sync {
    /// Retorna o inscrito e `true` se a inscrição é nova.
    async fn subscribe(&self, email: &str) -> Result<(NewsletterSubscriber, bool), AppError>;
    async fn list_subscribers(&self) -> Result<Vec<NewsletterSubscriber>, AppError>;
}

// O "banco" completo que o AppState carrega
pub trait Store:
    CatalogRepository
    + UserRepository
    + SupplierRepository
    + PurchaseRepository
    + SettingsRepository
    + NewsletterRepository
{
}

impl<T> Store for T where
    T: CatalogRepository
        + UserRepository
        + SupplierRepository
        + PurchaseRepository
        + SettingsRepository
        + NewsletterRepository
{
}

pub type DynStore = Arc<dyn Store>;

// Implementação Postgres: as queries ficam em db/*_repo.rs
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}
