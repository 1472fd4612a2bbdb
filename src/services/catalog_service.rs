// src/services/catalog_service.rs

use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        slug::{is_valid_slug, slugify},
    },
    db::DynStore,
    models::catalog::{
        Category, CategoryInput, CategoryPayload, Product, ProductInput, ProductPage,
        ProductPayload, ProductQuery, ProductWithCategory,
    },
    services::catalog_query::CatalogFilter,
};

/// Slug informado (precisa ser válido) ou derivado do nome.
pub fn resolve_slug(explicit: Option<&str>, name: &str) -> Result<String, AppError> {
    match explicit.map(str::trim).filter(|s| !s.is_empty()) {
        Some(slug) if is_valid_slug(slug) => Ok(slug.to_string()),
        Some(slug) => Err(AppError::BadRequest(format!(
            "Invalid slug '{}'. Use lowercase letters, digits and hyphens.",
            slug
        ))),
        None => {
            let derived = slugify(name);
            if derived.is_empty() {
                return Err(AppError::BadRequest(
                    "Could not derive a slug from the name.".to_string(),
                ));
            }
            Ok(derived)
        }
    }
}

#[derive(Clone)]
pub struct CatalogService {
    store: DynStore,
}

impl CatalogService {
    pub fn new(store: DynStore) -> Self {
        Self { store }
    }

    // --- Vitrine ---

    pub async fn search_products(&self, query: &ProductQuery) -> Result<ProductPage, AppError> {
        // Valida antes de ir ao banco
        let filter = CatalogFilter::from_query(query)?;
        let catalogue = self.store.list_products().await?;
        Ok(filter.apply(catalogue))
    }

    pub async fn featured_products(&self) -> Result<Vec<ProductWithCategory>, AppError> {
        let catalogue = self.store.list_products().await?;
        Ok(catalogue.into_iter().filter(|p| p.product.featured).collect())
    }

    pub async fn product_by_slug(&self, slug: &str) -> Result<ProductWithCategory, AppError> {
        self.store
            .find_product_by_slug(slug)
            .await?
            .ok_or(AppError::NotFound("Product"))
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>, AppError> {
        self.store.list_categories().await
    }

    // --- Admin: produtos ---

    async fn product_input(&self, payload: ProductPayload) -> Result<ProductInput, AppError> {
        if self.store.find_category(payload.category_id).await?.is_none() {
            return Err(AppError::NotFound("Category"));
        }

        let name = payload.name.trim().to_string();
        let slug = resolve_slug(payload.slug.as_deref(), &name)?;

        Ok(ProductInput {
            slug,
            name,
            description: payload.description,
            price: payload.price,
            image: payload.image,
            category_id: payload.category_id,
            featured: payload.featured,
            is_bestseller: payload.is_bestseller,
            is_new: payload.is_new,
            is_popular: payload.is_popular,
            sizes: payload.sizes,
            colors: payload.colors,
            dietary_options: payload.dietary_options,
            stock: payload.stock,
        })
    }

    pub async fn create_product(&self, payload: ProductPayload) -> Result<Product, AppError> {
        let input = self.product_input(payload).await?;
        let product = self.store.create_product(&input).await?;
        tracing::info!(product_id = %product.id, slug = %product.slug, "Produto criado");
        Ok(product)
    }

    pub async fn update_product(&self, id: Uuid, payload: ProductPayload) -> Result<Product, AppError> {
        let input = self.product_input(payload).await?;
        self.store
            .update_product(id, &input)
            .await?
            .ok_or(AppError::NotFound("Product"))
    }

    pub async fn delete_product(&self, id: Uuid) -> Result<(), AppError> {
        if !self.store.delete_product(id).await? {
            return Err(AppError::NotFound("Product"));
        }
        tracing::info!(product_id = %id, "Produto removido");
        Ok(())
    }

    // --- Admin: categorias ---

    fn category_input(payload: CategoryPayload) -> Result<CategoryInput, AppError> {
        let name = payload.name.trim().to_string();
        let slug = resolve_slug(payload.slug.as_deref(), &name)?;
        Ok(CategoryInput { name, slug })
    }

    pub async fn create_category(&self, payload: CategoryPayload) -> Result<Category, AppError> {
        let input = Self::category_input(payload)?;
        self.store.create_category(&input).await
    }

    pub async fn update_category(&self, id: Uuid, payload: CategoryPayload) -> Result<Category, AppError> {
        let input = Self::category_input(payload)?;
        self.store
            .update_category(id, &input)
            .await?
            .ok_or(AppError::NotFound("Category"))
    }

    pub async fn delete_category(&self, id: Uuid) -> Result<(), AppError> {
        if !self.store.delete_category(id).await? {
            return Err(AppError::NotFound("Category"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_is_derived_from_name_when_missing() {
        assert_eq!(resolve_slug(None, "Red Velvet Cake").unwrap(), "red-velvet-cake");
        assert_eq!(resolve_slug(Some("  "), "Baguette").unwrap(), "baguette");
    }

    #[test]
    fn explicit_slug_must_be_valid() {
        assert_eq!(resolve_slug(Some("my-cake"), "Whatever").unwrap(), "my-cake");
        assert!(matches!(
            resolve_slug(Some("My Cake!"), "Whatever"),
            Err(AppError::BadRequest(_))
        ));
        assert!(resolve_slug(None, "!!!").is_err());
    }
}
