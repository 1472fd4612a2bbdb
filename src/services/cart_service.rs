// src/services/cart_service.rs

use std::collections::HashMap;

use rust_decimal::{Decimal, RoundingStrategy};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::DynStore,
    models::{
        cart::{Cart, CartQuote, CartQuoteRequest},
        catalog::Product,
        settings::StoreSettings,
    },
    services::settings_service::SettingsService,
};

fn cart_too_large() -> AppError {
    AppError::BadRequest("The cart total is too large.".to_string())
}

/// Imposto = subtotal × taxa% arredondado em 2 casas.
pub fn compute_tax(subtotal: Decimal, tax_rate: Decimal) -> Result<Decimal, AppError> {
    let tax = subtotal
        .checked_mul(tax_rate)
        .and_then(|v| v.checked_div(Decimal::ONE_HUNDRED))
        .ok_or_else(cart_too_large)?;
    Ok(tax.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}

/// Precifica um carrinho já montado com as configurações da loja.
pub fn price_cart(
    cart: Cart,
    unavailable: Vec<Uuid>,
    settings: &StoreSettings,
) -> Result<CartQuote, AppError> {
    let subtotal = cart.subtotal();
    // Subtotal saturado: alguma linha estourou
    if subtotal == Decimal::MAX {
        return Err(cart_too_large());
    }
    let tax = compute_tax(subtotal, settings.tax_rate)?;
    let total = subtotal.checked_add(tax).ok_or_else(cart_too_large)?;
    let delivery_free = settings
        .free_delivery_threshold
        .is_some_and(|threshold| !cart.is_empty() && subtotal >= threshold);

    Ok(CartQuote {
        total,
        cart,
        unavailable,
        tax,
        delivery_free,
        currency: settings.store_currency.clone(),
    })
}

#[derive(Clone)]
pub struct CartService {
    store: DynStore,
    settings: SettingsService,
}

impl CartService {
    pub fn new(store: DynStore, settings: SettingsService) -> Self {
        Self { store, settings }
    }

    /// Monta o carrinho com os preços atuais do catálogo. Ids desconhecidos
    /// vão para `unavailable` em vez de falhar o checkout inteiro.
    pub async fn quote(&self, request: &CartQuoteRequest) -> Result<CartQuote, AppError> {
        let ids: Vec<Uuid> = request.items.iter().map(|line| line.product_id).collect();
        let products: HashMap<Uuid, Product> = self
            .store
            .find_products_by_ids(&ids)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        let mut cart = Cart::new();
        let mut unavailable = Vec::new();
        for line in &request.items {
            match products.get(&line.product_id) {
                Some(product) => cart.add_quantity(product, line.quantity),
                None if !unavailable.contains(&line.product_id) => unavailable.push(line.product_id),
                None => {}
            }
        }

        let settings = self.settings.store_settings().await?;
        price_cart(cart, unavailable, &settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn dec(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    fn product(price: &str) -> Product {
        Product {
            id: Uuid::new_v4(),
            slug: "cake".to_string(),
            name: "Cake".to_string(),
            description: String::new(),
            price: dec(price),
            image: String::new(),
            category_id: Uuid::new_v4(),
            featured: false,
            is_bestseller: false,
            is_new: false,
            is_popular: false,
            sizes: vec![],
            colors: vec![],
            dietary_options: vec![],
            stock: 5,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn tax_is_rounded_to_cents() {
        assert_eq!(compute_tax(dec("10.00"), dec("7.5")).unwrap(), dec("0.75"));
        assert_eq!(compute_tax(dec("9.99"), dec("5")).unwrap(), dec("0.50"));
        assert_eq!(compute_tax(dec("100"), Decimal::ZERO).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn quote_adds_tax_and_checks_free_delivery() {
        let settings = StoreSettings {
            tax_rate: dec("10"),
            free_delivery_threshold: Some(dec("50")),
            ..StoreSettings::default()
        };

        let mut cart = Cart::new();
        cart.add_quantity(&product("24.99"), 2);
        let quote = price_cart(cart, vec![], &settings).unwrap();
        assert_eq!(quote.cart.subtotal(), dec("49.98"));
        assert_eq!(quote.tax, dec("5.00"));
        assert_eq!(quote.total, dec("54.98"));
        assert!(!quote.delivery_free);

        let mut cart = Cart::new();
        cart.add_quantity(&product("25.00"), 2);
        assert!(price_cart(cart, vec![], &settings).unwrap().delivery_free);
    }

    #[test]
    fn empty_cart_never_gets_free_delivery() {
        let settings = StoreSettings {
            free_delivery_threshold: Some(Decimal::ZERO),
            ..StoreSettings::default()
        };
        let quote = price_cart(Cart::new(), vec![], &settings).unwrap();
        assert!(!quote.delivery_free);
        assert_eq!(quote.total, Decimal::ZERO);
    }

    #[test]
    fn oversized_totals_are_rejected_instead_of_overflowing() {
        // Taxa salva antes da validação de 0..=100
        let settings = StoreSettings {
            tax_rate: Decimal::from_scientific("1e27").unwrap(),
            ..StoreSettings::default()
        };
        let mut cart = Cart::new();
        cart.add_quantity(&product("24.99"), 1000);
        assert!(matches!(
            price_cart(cart, vec![], &settings),
            Err(AppError::BadRequest(_))
        ));

        let mut cart = Cart::new();
        cart.add_quantity(&product("79228162514264337593543950"), 1000);
        assert_eq!(cart.subtotal(), Decimal::MAX);
        assert!(matches!(
            price_cart(cart, vec![], &StoreSettings::default()),
            Err(AppError::BadRequest(_))
        ));
    }
}
