// src/db/supplier_repo.rs

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    common::{
        db_utils::{foreign_key_violation, unique_violation},
        error::AppError,
    },
    db::{PgStore, SupplierRepository},
    models::purchase::{Supplier, SupplierInput},
};

#[async_trait]
impl SupplierRepository for PgStore {
    async fn list_suppliers(&self) -> Result<Vec<Supplier>, AppError> {
        let suppliers = sqlx::query_as::<_, Supplier>("SELECT * FROM suppliers ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(suppliers)
    }

    async fn find_supplier(&self, id: Uuid) -> Result<Option<Supplier>, AppError> {
        let supplier = sqlx::query_as::<_, Supplier>("SELECT * FROM suppliers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(supplier)
    }

    async fn create_supplier(&self, input: &SupplierInput) -> Result<Supplier, AppError> {
        sqlx::query_as::<_, Supplier>(
            r#"
            INSERT INTO suppliers (id, name, contact_person, email, phone, address)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&input.name)
        .bind(&input.contact_person)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.address)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| unique_violation(e, format!("Supplier '{}' already exists.", input.name)))
    }

    async fn update_supplier(&self, id: Uuid, input: &SupplierInput) -> Result<Option<Supplier>, AppError> {
        sqlx::query_as::<_, Supplier>(
            r#"
            UPDATE suppliers SET
                name = $2, contact_person = $3, email = $4, phone = $5, address = $6
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.contact_person)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.address)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| unique_violation(e, format!("Supplier '{}' already exists.", input.name)))
    }

    async fn delete_supplier(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM suppliers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| foreign_key_violation(e, "The supplier has purchase invoices."))?;
        Ok(result.rows_affected() > 0)
    }
}
