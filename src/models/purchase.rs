// src/models/purchase.rs

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::settings::validate_money;

// --- Fornecedores ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    pub id: Uuid,
    #[schema(example = "Moinho Dourado Ltda")]
    pub name: String,
    pub contact_person: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct SupplierInput {
    pub name: String,
    pub contact_person: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SupplierPayload {
    #[validate(length(min = 2, message = "Supplier name must be at least 2 characters."))]
    pub name: String,
    pub contact_person: Option<String>,
    #[validate(email(message = "Please enter a valid email address."))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl From<SupplierPayload> for SupplierInput {
    fn from(payload: SupplierPayload) -> Self {
        SupplierInput {
            name: payload.name.trim().to_string(),
            contact_person: payload.contact_person,
            email: payload.email,
            phone: payload.phone,
            address: payload.address,
        }
    }
}

// --- Status da nota de compra ---
// Única transição permitida: Pending -> Received (sem volta).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "invoice_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Pending,
    Received,
}

impl InvoiceStatus {
    pub fn can_transition_to(self, next: InvoiceStatus) -> bool {
        matches!((self, next), (InvoiceStatus::Pending, InvoiceStatus::Received))
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvoiceStatus::Pending => write!(f, "pending"),
            InvoiceStatus::Received => write!(f, "received"),
        }
    }
}

// --- Cabeçalho da nota ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseInvoice {
    pub id: Uuid,
    pub supplier_id: Uuid,
    #[schema(example = "INV-2024-001")]
    pub invoice_number: String,
    pub date: DateTime<Utc>,
    pub status: InvoiceStatus,
    #[schema(example = 150.5)]
    pub total_amount: Decimal,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- Itens da nota ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseItem {
    pub id: Uuid,
    pub purchase_id: Uuid,
    pub product_id: Uuid,
    #[schema(example = 10)]
    pub quantity: i32,
    #[schema(example = 12.5)]
    pub unit_cost: Decimal,
    #[schema(example = 125.0)]
    pub subtotal: Decimal,
}

// Listagem: cabeçalho + nome do fornecedor
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseSummary {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub header: PurchaseInvoice,
    pub supplier_name: String,
    pub item_count: i64,
}

// Detalhe: cabeçalho + fornecedor + itens (na ordem em que foram lançados)
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseDetail {
    #[serde(flatten)]
    pub header: PurchaseInvoice,
    pub supplier_name: String,
    pub items: Vec<PurchaseItem>,
}

// Linha já precificada pelo service (subtotal calculado no servidor)
#[derive(Debug, Clone, PartialEq)]
pub struct NewPurchaseItem {
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_cost: Decimal,
    pub subtotal: Decimal,
}

#[derive(Debug, Clone)]
pub struct NewPurchase {
    pub supplier_id: Uuid,
    pub invoice_number: String,
    pub date: DateTime<Utc>,
    pub status: InvoiceStatus,
    pub total_amount: Decimal,
    pub notes: Option<String>,
    pub items: Vec<NewPurchaseItem>,
}

// --- Payloads ---
// Totais e subtotais enviados pelo cliente são ignorados (campos desconhecidos).

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseItemPayload {
    pub product_id: Uuid,
    #[validate(range(min = 1, message = "Quantity must be at least 1."))]
    #[schema(example = 10)]
    pub quantity: i32,
    #[validate(custom(function = "validate_money"))]
    #[schema(example = 12.5)]
    pub unit_cost: Decimal,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchasePayload {
    pub supplier_id: Uuid,
    #[validate(length(min = 1, message = "Invoice number is required."))]
    #[schema(example = "INV-2024-001")]
    pub invoice_number: String,
    // Padrão: agora
    pub date: Option<DateTime<Utc>>,
    // Padrão: pending
    pub status: Option<InvoiceStatus>,
    pub notes: Option<String>,
    #[validate(length(min = 1, message = "Add at least one item."), nested)]
    pub items: Vec<PurchaseItemPayload>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PurchaseStatusPayload {
    pub status: InvoiceStatus,
}
