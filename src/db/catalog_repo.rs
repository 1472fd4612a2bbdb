// src/db/catalog_repo.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::{
    common::{
        db_utils::{foreign_key_violation, unique_violation},
        error::AppError,
    },
    db::{CatalogRepository, PgStore},
    models::catalog::{Category, CategoryInput, Product, ProductInput, ProductWithCategory},
};

// Linha do JOIN produtos x categorias
#[derive(FromRow)]
struct ProductRow {
    #[sqlx(flatten)]
    product: Product,
    category_name: String,
    category_slug: String,
    category_created_at: DateTime<Utc>,
}

impl From<ProductRow> for ProductWithCategory {
    fn from(row: ProductRow) -> Self {
        let category = Category {
            id: row.product.category_id,
            name: row.category_name,
            slug: row.category_slug,
            created_at: row.category_created_at,
        };
        ProductWithCategory {
            product: row.product,
            category,
        }
    }
}

const PRODUCT_WITH_CATEGORY_SELECT: &str = r#"
    SELECT p.*,
           c.name AS category_name,
           c.slug AS category_slug,
           c.created_at AS category_created_at
    FROM products p
    JOIN categories c ON c.id = p.category_id
"#;

#[async_trait]
impl CatalogRepository for PgStore {
    // ---
    // Categorias
    // ---

    async fn list_categories(&self) -> Result<Vec<Category>, AppError> {
        let categories = sqlx::query_as::<_, Category>("SELECT * FROM categories ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(categories)
    }

    async fn find_category(&self, id: Uuid) -> Result<Option<Category>, AppError> {
        let category = sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(category)
    }

    async fn create_category(&self, input: &CategoryInput) -> Result<Category, AppError> {
        sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (id, name, slug)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&input.name)
        .bind(&input.slug)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| unique_violation(e, format!("Category slug '{}' already exists.", input.slug)))
    }

    async fn update_category(&self, id: Uuid, input: &CategoryInput) -> Result<Option<Category>, AppError> {
        sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories SET name = $2, slug = $3
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| unique_violation(e, format!("Category slug '{}' already exists.", input.slug)))
    }

    async fn delete_category(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| foreign_key_violation(e, "The category still has products."))?;
        Ok(result.rows_affected() > 0)
    }

    // ---
    // Produtos
    // ---

    async fn list_products(&self) -> Result<Vec<ProductWithCategory>, AppError> {
        let sql = format!("{} ORDER BY p.created_at ASC, p.name ASC", PRODUCT_WITH_CATEGORY_SELECT);
        let rows = sqlx::query_as::<_, ProductRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_product(&self, id: Uuid) -> Result<Option<Product>, AppError> {
        let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(product)
    }

    async fn find_product_by_slug(&self, slug: &str) -> Result<Option<ProductWithCategory>, AppError> {
        let sql = format!("{} WHERE p.slug = $1", PRODUCT_WITH_CATEGORY_SELECT);
        let row = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Into::into))
    }

    async fn find_products_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Product>, AppError> {
        // O SQLx lida bem com arrays usando ANY
        let products = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(products)
    }

    async fn create_product(&self, input: &ProductInput) -> Result<Product, AppError> {
        sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (
                id, slug, name, description, price, image, category_id,
                featured, is_bestseller, is_new, is_popular,
                sizes, colors, dietary_options, stock
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&input.slug)
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.price)
        .bind(&input.image)
        .bind(input.category_id)
        .bind(input.featured)
        .bind(input.is_bestseller)
        .bind(input.is_new)
        .bind(input.is_popular)
        .bind(&input.sizes)
        .bind(&input.colors)
        .bind(&input.dietary_options)
        .bind(input.stock)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| unique_violation(e, format!("Product slug '{}' already exists.", input.slug)))
    }

    async fn update_product(&self, id: Uuid, input: &ProductInput) -> Result<Option<Product>, AppError> {
        sqlx::query_as::<_, Product>(
            r#"
            UPDATE products SET
                slug = $2, name = $3, description = $4, price = $5, image = $6,
                category_id = $7, featured = $8, is_bestseller = $9, is_new = $10,
                is_popular = $11, sizes = $12, colors = $13, dietary_options = $14,
                stock = $15, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&input.slug)
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.price)
        .bind(&input.image)
        .bind(input.category_id)
        .bind(input.featured)
        .bind(input.is_bestseller)
        .bind(input.is_new)
        .bind(input.is_popular)
        .bind(&input.sizes)
        .bind(&input.colors)
        .bind(&input.dietary_options)
        .bind(input.stock)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| unique_violation(e, format!("Product slug '{}' already exists.", input.slug)))
    }

    async fn delete_product(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| foreign_key_violation(e, "The product is referenced by purchase invoices."))?;
        Ok(result.rows_affected() > 0)
    }
}
