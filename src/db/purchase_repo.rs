// src/db/purchase_repo.rs

use async_trait::async_trait;
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::{
    common::{db_utils::unique_violation, error::AppError},
    db::{PgStore, PurchaseRepository},
    models::purchase::{
        InvoiceStatus, NewPurchase, PurchaseDetail, PurchaseInvoice, PurchaseItem, PurchaseSummary,
    },
};

// Soma a quantidade de cada item ao estoque do produto (dentro da transação)
async fn apply_stock_increments(
    tx: &mut Transaction<'_, Postgres>,
    items: &[PurchaseItem],
) -> Result<(), AppError> {
    for item in items {
        sqlx::query("UPDATE products SET stock = stock + $2, updated_at = NOW() WHERE id = $1")
            .bind(item.product_id)
            .bind(item.quantity)
            .execute(&mut **tx)
            .await?;
    }
    Ok(())
}

async fn load_items(
    executor: impl sqlx::PgExecutor<'_>,
    purchase_id: Uuid,
) -> Result<Vec<PurchaseItem>, AppError> {
    let items = sqlx::query_as::<_, PurchaseItem>(
        r#"
        SELECT id, purchase_id, product_id, quantity, unit_cost, subtotal
        FROM purchase_items
        WHERE purchase_id = $1
        ORDER BY position ASC
        "#,
    )
    .bind(purchase_id)
    .fetch_all(executor)
    .await?;
    Ok(items)
}

async fn supplier_name(
    executor: impl sqlx::PgExecutor<'_>,
    supplier_id: Uuid,
) -> Result<String, AppError> {
    let name: String = sqlx::query_scalar("SELECT name FROM suppliers WHERE id = $1")
        .bind(supplier_id)
        .fetch_one(executor)
        .await?;
    Ok(name)
}

#[async_trait]
impl PurchaseRepository for PgStore {
    async fn list_purchases(&self) -> Result<Vec<PurchaseSummary>, AppError> {
        let purchases = sqlx::query_as::<_, PurchaseSummary>(
            r#"
            SELECT p.*,
                   s.name AS supplier_name,
                   (SELECT COUNT(*) FROM purchase_items i WHERE i.purchase_id = p.id) AS item_count
            FROM purchases p
            JOIN suppliers s ON s.id = p.supplier_id
            ORDER BY p.date DESC, p.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(purchases)
    }

    async fn find_purchase(&self, id: Uuid) -> Result<Option<PurchaseDetail>, AppError> {
        let Some(header) = sqlx::query_as::<_, PurchaseInvoice>("SELECT * FROM purchases WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
        else {
            return Ok(None);
        };

        let supplier_name = supplier_name(&self.pool, header.supplier_id).await?;
        let items = load_items(&self.pool, id).await?;

        Ok(Some(PurchaseDetail {
            header,
            supplier_name,
            items,
        }))
    }

    async fn create_purchase(&self, purchase: &NewPurchase) -> Result<PurchaseDetail, AppError> {
        let mut tx = self.pool.begin().await?;

        let header = sqlx::query_as::<_, PurchaseInvoice>(
            r#"
            INSERT INTO purchases (id, supplier_id, invoice_number, date, status, total_amount, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(purchase.supplier_id)
        .bind(&purchase.invoice_number)
        .bind(purchase.date)
        .bind(purchase.status)
        .bind(purchase.total_amount)
        .bind(&purchase.notes)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            unique_violation(
                e,
                format!(
                    "Invoice '{}' already exists for this supplier.",
                    purchase.invoice_number
                ),
            )
        })?;

        let mut items = Vec::with_capacity(purchase.items.len());
        for (position, item) in purchase.items.iter().enumerate() {
            let saved = sqlx::query_as::<_, PurchaseItem>(
                r#"
                INSERT INTO purchase_items (id, purchase_id, product_id, quantity, unit_cost, subtotal, position)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING id, purchase_id, product_id, quantity, unit_cost, subtotal
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(header.id)
            .bind(item.product_id)
            .bind(item.quantity)
            .bind(item.unit_cost)
            .bind(item.subtotal)
            .bind(position as i32)
            .fetch_one(&mut *tx)
            .await?;
            items.push(saved);
        }

        if header.status == InvoiceStatus::Received {
            apply_stock_increments(&mut tx, &items).await?;
        }

        let supplier_name = supplier_name(&mut *tx, header.supplier_id).await?;

        tx.commit().await?;

        tracing::info!(
            purchase_id = %header.id,
            status = %header.status,
            items = items.len(),
            "Nota de compra registrada"
        );

        Ok(PurchaseDetail {
            header,
            supplier_name,
            items,
        })
    }

    async fn mark_received(&self, id: Uuid) -> Result<Option<PurchaseDetail>, AppError> {
        let mut tx = self.pool.begin().await?;

        // O filtro por status garante que duas confirmações simultâneas
        // não incrementam o estoque duas vezes
        let Some(header) = sqlx::query_as::<_, PurchaseInvoice>(
            r#"
            UPDATE purchases SET status = 'received', updated_at = NOW()
            WHERE id = $1 AND status = 'pending'
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        else {
            tx.rollback().await?;
            return Ok(None);
        };

        let items = load_items(&mut *tx, id).await?;
        apply_stock_increments(&mut tx, &items).await?;
        let supplier_name = supplier_name(&mut *tx, header.supplier_id).await?;

        tx.commit().await?;

        Ok(Some(PurchaseDetail {
            header,
            supplier_name,
            items,
        }))
    }

    async fn delete_pending_purchase(&self, id: Uuid) -> Result<bool, AppError> {
        // Itens saem junto (ON DELETE CASCADE)
        let result = sqlx::query("DELETE FROM purchases WHERE id = $1 AND status = 'pending'")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
