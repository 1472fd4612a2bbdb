// src/models/cart.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::catalog::Product;

// Linha do carrinho: snapshot do preço no momento em que o produto entrou.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: Uuid,
    pub name: String,
    pub image: String,
    #[schema(example = 24.99)]
    pub price: Decimal,
    #[schema(example = 2)]
    pub quantity: u32,
}

impl CartItem {
    /// Satura em `Decimal::MAX` em vez de estourar (preço vem do cliente).
    pub fn line_total(&self) -> Decimal {
        self.price.saturating_mul(Decimal::from(self.quantity))
    }
}

// O carrinho é um valor serializável: o cliente guarda o JSON (local storage)
// e o servidor usa o mesmo tipo para precificar o checkout.
// Invariante: `subtotal` == Σ price × quantity, recalculado a cada mutação.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase", from = "CartItems")]
pub struct Cart {
    items: Vec<CartItem>,
    subtotal: Decimal,
}

// Ao desserializar, o subtotal enviado pelo cliente é descartado e recalculado.
#[derive(Deserialize)]
struct CartItems {
    #[serde(default)]
    items: Vec<CartItem>,
}

impl From<CartItems> for Cart {
    fn from(raw: CartItems) -> Self {
        let mut cart = Cart {
            items: raw.items,
            subtotal: Decimal::ZERO,
        };
        cart.items.retain(|i| i.quantity >= 1);
        cart.recompute();
        cart
    }
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn subtotal(&self) -> Decimal {
        self.subtotal
    }

    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Adiciona uma unidade. Se o produto já está no carrinho, só incrementa.
    pub fn add(&mut self, product: &Product) {
        self.add_quantity(product, 1);
    }

    /// Equivale a chamar `add` `quantity` vezes (tela de detalhe "adicionar N").
    pub fn add_quantity(&mut self, product: &Product, quantity: u32) {
        if quantity == 0 {
            return;
        }

        match self.items.iter_mut().find(|i| i.product_id == product.id) {
            Some(item) => item.quantity = item.quantity.saturating_add(quantity),
            None => self.items.push(CartItem {
                product_id: product.id,
                name: product.name.clone(),
                image: product.image.clone(),
                price: product.price,
                quantity,
            }),
        }

        self.recompute();
    }

    /// Define a quantidade de uma linha, com mínimo 1. Produto ausente: nada muda.
    pub fn update(&mut self, product_id: Uuid, quantity: u32) {
        if let Some(item) = self.items.iter_mut().find(|i| i.product_id == product_id) {
            item.quantity = quantity.max(1);
            self.recompute();
        }
    }

    pub fn remove(&mut self, product_id: Uuid) {
        self.items.retain(|i| i.product_id != product_id);
        self.recompute();
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.recompute();
    }

    fn recompute(&mut self) {
        self.subtotal = self
            .items
            .iter()
            .map(CartItem::line_total)
            .fold(Decimal::ZERO, Decimal::saturating_add);
    }
}

// --- Checkout: POST /api/cart/quote ---

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartLinePayload {
    pub product_id: Uuid,
    #[validate(range(min = 1, message = "Quantity must be at least 1."))]
    #[schema(example = 2)]
    pub quantity: u32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartQuoteRequest {
    #[validate(length(min = 1, message = "The cart is empty."), nested)]
    pub items: Vec<CartLinePayload>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartQuote {
    pub cart: Cart,
    // Produtos que não existem mais no catálogo
    pub unavailable: Vec<Uuid>,
    #[schema(example = 2.5)]
    pub tax: Decimal,
    pub delivery_free: bool,
    #[schema(example = 52.48)]
    pub total: Decimal,
    #[schema(example = "BDT")]
    pub currency: String,
}
