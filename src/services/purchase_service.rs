// src/services/purchase_service.rs
//
// Fornecedores e notas de compra. O servidor calcula subtotais e total;
// o estoque só muda quando a nota passa (ou já nasce) como "received".

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::DynStore,
    models::purchase::{
        InvoiceStatus, NewPurchase, NewPurchaseItem, PurchaseDetail, PurchaseItemPayload,
        PurchasePayload, PurchaseSummary, Supplier, SupplierInput,
    },
};

/// Maior valor de NUMERIC(14,2): teto de subtotal e total da nota.
pub const MAX_INVOICE_AMOUNT: Decimal = Decimal::from_parts(0x107A_3FFF, 0x5AF3, 0, false, 2);

fn invoice_too_large() -> AppError {
    AppError::BadRequest("The invoice total is too large.".to_string())
}

fn within_invoice_range(amount: Option<Decimal>) -> Result<Decimal, AppError> {
    amount
        .filter(|value| *value <= MAX_INVOICE_AMOUNT)
        .ok_or_else(invoice_too_large)
}

/// Precifica os itens: subtotal = quantidade × custo unitário,
/// total = soma dos subtotais.
pub fn price_items(items: &[PurchaseItemPayload]) -> Result<(Vec<NewPurchaseItem>, Decimal), AppError> {
    let mut priced = Vec::with_capacity(items.len());
    let mut total = Decimal::ZERO;
    for item in items {
        let subtotal =
            within_invoice_range(item.unit_cost.checked_mul(Decimal::from(item.quantity)))?;
        total = within_invoice_range(total.checked_add(subtotal))?;
        priced.push(NewPurchaseItem {
            product_id: item.product_id,
            quantity: item.quantity,
            unit_cost: item.unit_cost,
            subtotal,
        });
    }
    Ok((priced, total))
}

#[derive(Clone)]
pub struct PurchaseService {
    store: DynStore,
}

impl PurchaseService {
    pub fn new(store: DynStore) -> Self {
        Self { store }
    }

    // ---
    // Fornecedores
    // ---

    pub async fn list_suppliers(&self) -> Result<Vec<Supplier>, AppError> {
        self.store.list_suppliers().await
    }

    pub async fn get_supplier(&self, id: Uuid) -> Result<Supplier, AppError> {
        self.store
            .find_supplier(id)
            .await?
            .ok_or(AppError::NotFound("Supplier"))
    }

    pub async fn create_supplier(&self, input: SupplierInput) -> Result<Supplier, AppError> {
        self.store.create_supplier(&input).await
    }

    pub async fn update_supplier(&self, id: Uuid, input: SupplierInput) -> Result<Supplier, AppError> {
        self.store
            .update_supplier(id, &input)
            .await?
            .ok_or(AppError::NotFound("Supplier"))
    }

    pub async fn delete_supplier(&self, id: Uuid) -> Result<(), AppError> {
        if !self.store.delete_supplier(id).await? {
            return Err(AppError::NotFound("Supplier"));
        }
        Ok(())
    }

    // ---
    // Notas de compra
    // ---

    pub async fn list_purchases(&self) -> Result<Vec<PurchaseSummary>, AppError> {
        self.store.list_purchases().await
    }

    pub async fn get_purchase(&self, id: Uuid) -> Result<PurchaseDetail, AppError> {
        self.store
            .find_purchase(id)
            .await?
            .ok_or(AppError::NotFound("Purchase invoice"))
    }

    pub async fn create_purchase(&self, payload: PurchasePayload) -> Result<PurchaseDetail, AppError> {
        if self.store.find_supplier(payload.supplier_id).await?.is_none() {
            return Err(AppError::NotFound("Supplier"));
        }

        let product_ids: Vec<Uuid> = payload.items.iter().map(|i| i.product_id).collect();
        let known = self.store.find_products_by_ids(&product_ids).await?;
        if let Some(missing) = product_ids
            .iter()
            .find(|id| !known.iter().any(|p| p.id == **id))
        {
            return Err(AppError::BadRequest(format!(
                "Product {} does not exist.",
                missing
            )));
        }

        let (items, total_amount) = price_items(&payload.items)?;
        let purchase = NewPurchase {
            supplier_id: payload.supplier_id,
            invoice_number: payload.invoice_number.trim().to_string(),
            date: payload.date.unwrap_or_else(Utc::now),
            status: payload.status.unwrap_or(InvoiceStatus::Pending),
            total_amount,
            notes: payload.notes,
            items,
        };

        self.store.create_purchase(&purchase).await
    }

    /// Aplica a transição de status. Mesmo status: nada muda.
    pub async fn update_status(&self, id: Uuid, status: InvoiceStatus) -> Result<PurchaseDetail, AppError> {
        let current = self.get_purchase(id).await?;
        let from = current.header.status;

        if from == status {
            return Ok(current);
        }
        if !from.can_transition_to(status) {
            return Err(AppError::InvalidStatusTransition { from, to: status });
        }

        match self.store.mark_received(id).await? {
            Some(received) => {
                tracing::info!(
                    purchase_id = %id,
                    items = received.items.len(),
                    "Nota recebida, estoque atualizado"
                );
                Ok(received)
            }
            // Outra requisição recebeu a nota antes: o estado pedido já vale
            None => self.get_purchase(id).await,
        }
    }

    pub async fn delete_purchase(&self, id: Uuid) -> Result<(), AppError> {
        let current = self.get_purchase(id).await?;
        if current.header.status != InvoiceStatus::Pending
            || !self.store.delete_pending_purchase(id).await?
        {
            return Err(AppError::Conflict(
                "Only pending invoices can be deleted.".to_string(),
            ));
        }
        Ok(())
    }
}
