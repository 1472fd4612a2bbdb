// src/db/memory.rs
//
// Store em memória, usado quando não há DATABASE_URL (e nos testes).
// Cada operação roda sob um único write lock, então as regras de
// unicidade e as transições de estoque ficam atômicas como no Postgres.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use serde_json::Value;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{
        CatalogRepository, NewsletterRepository, PurchaseRepository, SettingsRepository,
        SupplierRepository, UserRepository,
    },
    models::{
        auth::{NewUser, User, UserChanges},
        catalog::{Category, CategoryInput, Product, ProductInput, ProductWithCategory},
        newsletter::NewsletterSubscriber,
        purchase::{
            InvoiceStatus, NewPurchase, PurchaseDetail, PurchaseInvoice, PurchaseItem,
            PurchaseSummary, Supplier, SupplierInput,
        },
    },
};

#[derive(Default)]
struct Tables {
    categories: Vec<Category>,
    products: Vec<Product>,
    users: Vec<User>,
    suppliers: Vec<Supplier>,
    purchases: Vec<PurchaseInvoice>,
    // Em ordem de lançamento
    purchase_items: Vec<PurchaseItem>,
    settings: HashMap<String, Value>,
    subscribers: Vec<NewsletterSubscriber>,
}

impl Tables {
    fn category(&self, id: Uuid) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    fn supplier_name(&self, supplier_id: Uuid) -> String {
        self.suppliers
            .iter()
            .find(|s| s.id == supplier_id)
            .map(|s| s.name.clone())
            .unwrap_or_default()
    }

    fn items_of(&self, purchase_id: Uuid) -> Vec<PurchaseItem> {
        self.purchase_items
            .iter()
            .filter(|i| i.purchase_id == purchase_id)
            .cloned()
            .collect()
    }

    fn detail(&self, header: PurchaseInvoice) -> PurchaseDetail {
        PurchaseDetail {
            supplier_name: self.supplier_name(header.supplier_id),
            items: self.items_of(header.id),
            header,
        }
    }

    fn with_category(&self, product: &Product) -> Option<ProductWithCategory> {
        self.category(product.category_id).map(|category| ProductWithCategory {
            product: product.clone(),
            category: category.clone(),
        })
    }

    fn check_product_slug(&self, slug: &str, except: Option<Uuid>) -> Result<(), AppError> {
        if self
            .products
            .iter()
            .any(|p| p.slug == slug && Some(p.id) != except)
        {
            return Err(AppError::Conflict(format!("Product slug '{}' already exists.", slug)));
        }
        Ok(())
    }

    fn check_category_slug(&self, slug: &str, except: Option<Uuid>) -> Result<(), AppError> {
        if self
            .categories
            .iter()
            .any(|c| c.slug == slug && Some(c.id) != except)
        {
            return Err(AppError::Conflict(format!("Category slug '{}' already exists.", slug)));
        }
        Ok(())
    }

    fn check_supplier_name(&self, name: &str, except: Option<Uuid>) -> Result<(), AppError> {
        if self
            .suppliers
            .iter()
            .any(|s| s.name == name && Some(s.id) != except)
        {
            return Err(AppError::Conflict(format!("Supplier '{}' already exists.", name)));
        }
        Ok(())
    }

    fn apply_stock_increments(&mut self, items: &[PurchaseItem]) {
        let now = Utc::now();
        for item in items {
            if let Some(product) = self.products.iter_mut().find(|p| p.id == item.product_id) {
                product.stock = product.stock.saturating_add(item.quantity);
                product.updated_at = now;
            }
        }
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CatalogRepository for MemoryStore {
    async fn list_categories(&self) -> Result<Vec<Category>, AppError> {
        let mut categories = self.tables.read().categories.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn find_category(&self, id: Uuid) -> Result<Option<Category>, AppError> {
        Ok(self.tables.read().category(id).cloned())
    }

    async fn create_category(&self, input: &CategoryInput) -> Result<Category, AppError> {
        let mut tables = self.tables.write();
        tables.check_category_slug(&input.slug, None)?;

        let category = Category {
            id: Uuid::new_v4(),
            name: input.name.clone(),
            slug: input.slug.clone(),
            created_at: Utc::now(),
        };
        tables.categories.push(category.clone());
        Ok(category)
    }

    async fn update_category(&self, id: Uuid, input: &CategoryInput) -> Result<Option<Category>, AppError> {
        let mut tables = self.tables.write();
        // Linha inexistente vence o conflito, como no UPDATE do Postgres
        if !tables.categories.iter().any(|c| c.id == id) {
            return Ok(None);
        }
        tables.check_category_slug(&input.slug, Some(id))?;

        let Some(category) = tables.categories.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        category.name = input.name.clone();
        category.slug = input.slug.clone();
        Ok(Some(category.clone()))
    }

    async fn delete_category(&self, id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.tables.write();
        if tables.products.iter().any(|p| p.category_id == id) {
            return Err(AppError::Conflict("The category still has products.".to_string()));
        }
        let before = tables.categories.len();
        tables.categories.retain(|c| c.id != id);
        Ok(tables.categories.len() < before)
    }

    async fn list_products(&self) -> Result<Vec<ProductWithCategory>, AppError> {
        let tables = self.tables.read();
        let mut products: Vec<ProductWithCategory> = tables
            .products
            .iter()
            .filter_map(|p| tables.with_category(p))
            .collect();
        products.sort_by(|a, b| {
            a.product
                .created_at
                .cmp(&b.product.created_at)
                .then_with(|| a.product.name.cmp(&b.product.name))
        });
        Ok(products)
    }

    async fn find_product(&self, id: Uuid) -> Result<Option<Product>, AppError> {
        Ok(self.tables.read().products.iter().find(|p| p.id == id).cloned())
    }

    async fn find_product_by_slug(&self, slug: &str) -> Result<Option<ProductWithCategory>, AppError> {
        let tables = self.tables.read();
        Ok(tables
            .products
            .iter()
            .find(|p| p.slug == slug)
            .and_then(|p| tables.with_category(p)))
    }

    async fn find_products_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Product>, AppError> {
        let tables = self.tables.read();
        Ok(tables
            .products
            .iter()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn create_product(&self, input: &ProductInput) -> Result<Product, AppError> {
        let mut tables = self.tables.write();
        tables.check_product_slug(&input.slug, None)?;
        if tables.category(input.category_id).is_none() {
            return Err(AppError::NotFound("Category"));
        }

        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4(),
            slug: input.slug.clone(),
            name: input.name.clone(),
            description: input.description.clone(),
            price: input.price,
            image: input.image.clone(),
            category_id: input.category_id,
            featured: input.featured,
            is_bestseller: input.is_bestseller,
            is_new: input.is_new,
            is_popular: input.is_popular,
            sizes: input.sizes.clone(),
            colors: input.colors.clone(),
            dietary_options: input.dietary_options.clone(),
            stock: input.stock,
            created_at: now,
            updated_at: now,
        };
        tables.products.push(product.clone());
        Ok(product)
    }

    async fn update_product(&self, id: Uuid, input: &ProductInput) -> Result<Option<Product>, AppError> {
        let mut tables = self.tables.write();
        // Linha inexistente vence o conflito, como no UPDATE do Postgres
        if !tables.products.iter().any(|p| p.id == id) {
            return Ok(None);
        }
        tables.check_product_slug(&input.slug, Some(id))?;
        if tables.category(input.category_id).is_none() {
            return Err(AppError::NotFound("Category"));
        }

        let Some(product) = tables.products.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        product.slug = input.slug.clone();
        product.name = input.name.clone();
        product.description = input.description.clone();
        product.price = input.price;
        product.image = input.image.clone();
        product.category_id = input.category_id;
        product.featured = input.featured;
        product.is_bestseller = input.is_bestseller;
        product.is_new = input.is_new;
        product.is_popular = input.is_popular;
        product.sizes = input.sizes.clone();
        product.colors = input.colors.clone();
        product.dietary_options = input.dietary_options.clone();
        product.stock = input.stock;
        product.updated_at = Utc::now();
        Ok(Some(product.clone()))
    }

    async fn delete_product(&self, id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.tables.write();
        if tables.purchase_items.iter().any(|i| i.product_id == id) {
            return Err(AppError::Conflict(
                "The product is referenced by purchase invoices.".to_string(),
            ));
        }
        let before = tables.products.len();
        tables.products.retain(|p| p.id != id);
        Ok(tables.products.len() < before)
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        Ok(self.tables.read().users.clone())
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.tables.read().users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .tables
            .read()
            .users
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn create_user(&self, user: &NewUser) -> Result<User, AppError> {
        let mut tables = self.tables.write();
        if tables.users.iter().any(|u| u.username == user.username) {
            return Err(AppError::Conflict(format!(
                "Username '{}' is already taken.",
                user.username
            )));
        }
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(AppError::Conflict(format!("Email '{}' is already in use.", user.email)));
        }

        let created = User {
            id: Uuid::new_v4(),
            username: user.username.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            full_name: user.full_name.clone(),
            role: user.role,
            status: user.status,
            is_admin: user.is_admin,
            is_super_admin: user.is_super_admin,
            created_at: Utc::now(),
            last_login: None,
        };
        tables.users.push(created.clone());
        Ok(created)
    }

    async fn update_user(&self, id: Uuid, changes: &UserChanges) -> Result<Option<User>, AppError> {
        let mut tables = self.tables.write();
        if let Some(email) = &changes.email {
            if tables.users.iter().any(|u| &u.email == email && u.id != id) {
                return Err(AppError::Conflict(format!("Email '{}' is already in use.", email)));
            }
        }

        let Some(user) = tables.users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        if let Some(email) = &changes.email {
            user.email = email.clone();
        }
        if let Some(full_name) = &changes.full_name {
            user.full_name = Some(full_name.clone());
        }
        if let Some(role) = changes.role {
            user.role = role;
        }
        if let Some(status) = changes.status {
            user.status = status;
        }
        if let Some(is_admin) = changes.is_admin {
            user.is_admin = is_admin;
        }
        if let Some(hash) = &changes.password_hash {
            user.password_hash = hash.clone();
        }
        Ok(Some(user.clone()))
    }

    async fn touch_last_login(&self, id: Uuid) -> Result<(), AppError> {
        if let Some(user) = self.tables.write().users.iter_mut().find(|u| u.id == id) {
            user.last_login = Some(Utc::now());
        }
        Ok(())
    }

    async fn delete_user(&self, id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.tables.write();
        let before = tables.users.len();
        tables.users.retain(|u| u.id != id);
        Ok(tables.users.len() < before)
    }
}

#[async_trait]
impl SupplierRepository for MemoryStore {
    async fn list_suppliers(&self) -> Result<Vec<Supplier>, AppError> {
        let mut suppliers = self.tables.read().suppliers.clone();
        suppliers.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(suppliers)
    }

    async fn find_supplier(&self, id: Uuid) -> Result<Option<Supplier>, AppError> {
        Ok(self.tables.read().suppliers.iter().find(|s| s.id == id).cloned())
    }

    async fn create_supplier(&self, input: &SupplierInput) -> Result<Supplier, AppError> {
        let mut tables = self.tables.write();
        tables.check_supplier_name(&input.name, None)?;

        let supplier = Supplier {
            id: Uuid::new_v4(),
            name: input.name.clone(),
            contact_person: input.contact_person.clone(),
            email: input.email.clone(),
            phone: input.phone.clone(),
            address: input.address.clone(),
            created_at: Utc::now(),
        };
        tables.suppliers.push(supplier.clone());
        Ok(supplier)
    }

    async fn update_supplier(&self, id: Uuid, input: &SupplierInput) -> Result<Option<Supplier>, AppError> {
        let mut tables = self.tables.write();
        // Linha inexistente vence o conflito, como no UPDATE do Postgres
        if !tables.suppliers.iter().any(|s| s.id == id) {
            return Ok(None);
        }
        tables.check_supplier_name(&input.name, Some(id))?;

        let Some(supplier) = tables.suppliers.iter_mut().find(|s| s.id == id) else {
            return Ok(None);
        };
        supplier.name = input.name.clone();
        supplier.contact_person = input.contact_person.clone();
        supplier.email = input.email.clone();
        supplier.phone = input.phone.clone();
        supplier.address = input.address.clone();
        Ok(Some(supplier.clone()))
    }

    async fn delete_supplier(&self, id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.tables.write();
        if tables.purchases.iter().any(|p| p.supplier_id == id) {
            return Err(AppError::Conflict("The supplier has purchase invoices.".to_string()));
        }
        let before = tables.suppliers.len();
        tables.suppliers.retain(|s| s.id != id);
        Ok(tables.suppliers.len() < before)
    }
}

#[async_trait]
impl PurchaseRepository for MemoryStore {
    async fn list_purchases(&self) -> Result<Vec<PurchaseSummary>, AppError> {
        let tables = self.tables.read();
        let mut purchases: Vec<PurchaseSummary> = tables
            .purchases
            .iter()
            .map(|header| PurchaseSummary {
                supplier_name: tables.supplier_name(header.supplier_id),
                item_count: tables
                    .purchase_items
                    .iter()
                    .filter(|i| i.purchase_id == header.id)
                    .count() as i64,
                header: header.clone(),
            })
            .collect();
        purchases.sort_by(|a, b| {
            b.header
                .date
                .cmp(&a.header.date)
                .then_with(|| b.header.created_at.cmp(&a.header.created_at))
        });
        Ok(purchases)
    }

    async fn find_purchase(&self, id: Uuid) -> Result<Option<PurchaseDetail>, AppError> {
        let tables = self.tables.read();
        Ok(tables
            .purchases
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .map(|header| tables.detail(header)))
    }

    async fn create_purchase(&self, purchase: &NewPurchase) -> Result<PurchaseDetail, AppError> {
        let mut tables = self.tables.write();

        if !tables.suppliers.iter().any(|s| s.id == purchase.supplier_id) {
            return Err(AppError::NotFound("Supplier"));
        }
        if tables.purchases.iter().any(|p| {
            p.supplier_id == purchase.supplier_id && p.invoice_number == purchase.invoice_number
        }) {
            return Err(AppError::Conflict(format!(
                "Invoice '{}' already exists for this supplier.",
                purchase.invoice_number
            )));
        }
        if let Some(missing) = purchase
            .items
            .iter()
            .find(|i| !tables.products.iter().any(|p| p.id == i.product_id))
        {
            return Err(AppError::BadRequest(format!(
                "Product {} does not exist.",
                missing.product_id
            )));
        }

        let now = Utc::now();
        let header = PurchaseInvoice {
            id: Uuid::new_v4(),
            supplier_id: purchase.supplier_id,
            invoice_number: purchase.invoice_number.clone(),
            date: purchase.date,
            status: purchase.status,
            total_amount: purchase.total_amount,
            notes: purchase.notes.clone(),
            created_at: now,
            updated_at: now,
        };
        let items: Vec<PurchaseItem> = purchase
            .items
            .iter()
            .map(|item| PurchaseItem {
                id: Uuid::new_v4(),
                purchase_id: header.id,
                product_id: item.product_id,
                quantity: item.quantity,
                unit_cost: item.unit_cost,
                subtotal: item.subtotal,
            })
            .collect();

        if header.status == InvoiceStatus::Received {
            tables.apply_stock_increments(&items);
        }
        tables.purchases.push(header.clone());
        tables.purchase_items.extend(items);

        Ok(tables.detail(header))
    }

    async fn mark_received(&self, id: Uuid) -> Result<Option<PurchaseDetail>, AppError> {
        let mut tables = self.tables.write();

        let Some(header) = tables
            .purchases
            .iter_mut()
            .find(|p| p.id == id && p.status == InvoiceStatus::Pending)
        else {
            return Ok(None);
        };
        header.status = InvoiceStatus::Received;
        header.updated_at = Utc::now();
        let header = header.clone();

        let items = tables.items_of(id);
        tables.apply_stock_increments(&items);

        Ok(Some(tables.detail(header)))
    }

    async fn delete_pending_purchase(&self, id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.tables.write();
        let before = tables.purchases.len();
        tables
            .purchases
            .retain(|p| !(p.id == id && p.status == InvoiceStatus::Pending));
        let deleted = tables.purchases.len() < before;
        if deleted {
            tables.purchase_items.retain(|i| i.purchase_id != id);
        }
        Ok(deleted)
    }
}

#[async_trait]
impl SettingsRepository for MemoryStore {
    async fn get_setting(&self, key: &str) -> Result<Option<Value>, AppError> {
        Ok(self.tables.read().settings.get(key).cloned())
    }

    async fn put_setting(&self, key: &str, value: &Value) -> Result<(), AppError> {
        self.tables
            .write()
            .settings
            .insert(key.to_string(), value.clone());
        Ok(())
    }
}

#[async_trait]
impl NewsletterRepository for MemoryStore {
    async fn subscribe(&self, email: &str) -> Result<(NewsletterSubscriber, bool), AppError> {
        let mut tables = self.tables.write();
        if let Some(existing) = tables.subscribers.iter().find(|s| s.email == email) {
            return Ok((existing.clone(), false));
        }
        let subscriber = NewsletterSubscriber {
            id: Uuid::new_v4(),
            email: email.to_string(),
            subscribed_at: Utc::now(),
        };
        tables.subscribers.push(subscriber.clone());
        Ok((subscriber, true))
    }

    async fn list_subscribers(&self) -> Result<Vec<NewsletterSubscriber>, AppError> {
        let mut subscribers = self.tables.read().subscribers.clone();
        subscribers.sort_by(|a, b| b.subscribed_at.cmp(&a.subscribed_at));
        Ok(subscribers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::purchase::NewPurchaseItem;
    use rust_decimal::Decimal;

    fn category_input(slug: &str) -> CategoryInput {
        CategoryInput {
            name: slug.to_uppercase(),
            slug: slug.to_string(),
        }
    }

    fn product_input(slug: &str, category_id: Uuid, stock: i32) -> ProductInput {
        ProductInput {
            slug: slug.to_string(),
            name: slug.to_string(),
            description: String::new(),
            price: Decimal::new(1000, 2),
            image: String::new(),
            category_id,
            featured: false,
            is_bestseller: false,
            is_new: false,
            is_popular: false,
            sizes: vec![],
            colors: vec![],
            dietary_options: vec![],
            stock,
        }
    }

    fn supplier_input(name: &str) -> SupplierInput {
        SupplierInput {
            name: name.to_string(),
            contact_person: None,
            email: None,
            phone: None,
            address: None,
        }
    }

    fn new_purchase(supplier_id: Uuid, product_id: Uuid, quantity: i32, status: InvoiceStatus) -> NewPurchase {
        NewPurchase {
            supplier_id,
            invoice_number: "INV-1".to_string(),
            date: Utc::now(),
            status,
            total_amount: Decimal::from(quantity),
            notes: None,
            items: vec![NewPurchaseItem {
                product_id,
                quantity,
                unit_cost: Decimal::ONE,
                subtotal: Decimal::from(quantity),
            }],
        }
    }

    #[tokio::test]
    async fn duplicate_slugs_are_conflicts() {
        let store = MemoryStore::new();
        let cat = store.create_category(&category_input("cakes")).await.unwrap();
        let err = store.create_category(&category_input("cakes")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        store.create_product(&product_input("brownie", cat.id, 0)).await.unwrap();
        let err = store
            .create_product(&product_input("brownie", cat.id, 0))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn updating_a_missing_row_is_none_even_with_a_taken_key() {
        let store = MemoryStore::new();
        let cat = store.create_category(&category_input("cakes")).await.unwrap();
        store.create_product(&product_input("brownie", cat.id, 0)).await.unwrap();
        store.create_supplier(&supplier_input("Moinho")).await.unwrap();
        let unknown = Uuid::new_v4();

        assert!(store
            .update_category(unknown, &category_input("cakes"))
            .await
            .unwrap()
            .is_none());
        assert!(store
            .update_product(unknown, &product_input("brownie", Uuid::new_v4(), 0))
            .await
            .unwrap()
            .is_none());
        assert!(store
            .update_supplier(unknown, &supplier_input("Moinho"))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn category_in_use_cannot_be_deleted() {
        let store = MemoryStore::new();
        let cat = store.create_category(&category_input("cakes")).await.unwrap();
        let product = store.create_product(&product_input("brownie", cat.id, 0)).await.unwrap();

        assert!(matches!(
            store.delete_category(cat.id).await,
            Err(AppError::Conflict(_))
        ));

        assert!(store.delete_product(product.id).await.unwrap());
        assert!(store.delete_category(cat.id).await.unwrap());
    }

    #[tokio::test]
    async fn receiving_increments_stock_once() {
        let store = MemoryStore::new();
        let cat = store.create_category(&category_input("breads")).await.unwrap();
        let product = store.create_product(&product_input("baguette", cat.id, 2)).await.unwrap();
        let supplier = store.create_supplier(&supplier_input("Moinho")).await.unwrap();

        let purchase = store
            .create_purchase(&new_purchase(supplier.id, product.id, 5, InvoiceStatus::Pending))
            .await
            .unwrap();
        assert_eq!(store.find_product(product.id).await.unwrap().unwrap().stock, 2);

        let received = store.mark_received(purchase.header.id).await.unwrap().unwrap();
        assert_eq!(received.header.status, InvoiceStatus::Received);
        assert_eq!(store.find_product(product.id).await.unwrap().unwrap().stock, 7);

        // Segunda confirmação não faz nada
        assert!(store.mark_received(purchase.header.id).await.unwrap().is_none());
        assert_eq!(store.find_product(product.id).await.unwrap().unwrap().stock, 7);

        assert!(!store.delete_pending_purchase(purchase.header.id).await.unwrap());
    }

    #[tokio::test]
    async fn supplier_with_invoices_cannot_be_deleted() {
        let store = MemoryStore::new();
        let cat = store.create_category(&category_input("breads")).await.unwrap();
        let product = store.create_product(&product_input("baguette", cat.id, 0)).await.unwrap();
        let supplier = store.create_supplier(&supplier_input("Moinho")).await.unwrap();

        store
            .create_purchase(&new_purchase(supplier.id, product.id, 1, InvoiceStatus::Received))
            .await
            .unwrap();
        assert_eq!(store.find_product(product.id).await.unwrap().unwrap().stock, 1);

        assert!(matches!(
            store.delete_supplier(supplier.id).await,
            Err(AppError::Conflict(_))
        ));
        assert!(matches!(
            store
                .create_purchase(&new_purchase(supplier.id, product.id, 1, InvoiceStatus::Pending))
                .await,
            Err(AppError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn newsletter_subscription_is_idempotent() {
        let store = MemoryStore::new();
        let (first, created) = store.subscribe("ana@example.com").await.unwrap();
        assert!(created);
        let (second, created) = store.subscribe("ana@example.com").await.unwrap();
        assert!(!created);
        assert_eq!(first.id, second.id);
        assert_eq!(store.list_subscribers().await.unwrap().len(), 1);
    }
}
