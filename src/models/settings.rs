// src/models/settings.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

// Chaves das seções na tabela `settings`
pub const STORE_SETTINGS_KEY: &str = "store";
pub const PAYMENT_SETTINGS_KEY: &str = "payment";

/// Maior valor monetário aceito: cabe em NUMERIC(12,2).
pub const MAX_MONEY: Decimal = Decimal::from_parts(0xD4A5_0FFF, 0xE8, 0, false, 2);

fn money_error(message: &'static str) -> ValidationError {
    let mut err = ValidationError::new("money");
    err.message = Some(message.into());
    err
}

/// Preços e custos: não negativos, até MAX_MONEY e no máximo 2 casas decimais.
pub(crate) fn validate_money(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        return Err(money_error("The value cannot be negative."));
    }
    if *val > MAX_MONEY {
        return Err(money_error("The value is too large."));
    }
    if val.normalize().scale() > 2 {
        return Err(money_error("Use at most 2 decimal places."));
    }
    Ok(())
}

// Percentual entre 0 e 100
fn validate_tax_rate(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() || *val > Decimal::ONE_HUNDRED {
        let mut err = ValidationError::new("range");
        err.message = Some("Tax rate must be between 0 and 100.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoreSettings {
    #[validate(length(min = 2, message = "Store name must be at least 2 characters."))]
    #[schema(example = "SweetBite Bakery")]
    pub store_name: String,

    #[validate(email(message = "Please enter a valid email address."))]
    #[schema(example = "hello@sweetbite.com")]
    pub store_email: String,

    pub store_phone: Option<String>,

    #[validate(length(min = 5, message = "Please enter a complete address."))]
    pub store_address: String,

    #[validate(length(min = 3, max = 3, message = "Currency must be an ISO 4217 code."))]
    #[schema(example = "BDT")]
    pub store_currency: String,

    // Percentual (ex: 7.5 = 7,5%)
    #[validate(custom(function = "validate_tax_rate"))]
    #[schema(example = 5.0)]
    pub tax_rate: Decimal,

    // Validado no service (validator não cobre Option<Decimal> com custom)
    #[schema(example = 1000)]
    pub free_delivery_threshold: Option<Decimal>,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            store_name: "SweetBite Bakery".to_string(),
            store_email: "hello@sweetbite.com".to_string(),
            store_phone: None,
            store_address: String::new(),
            store_currency: "BDT".to_string(),
            tax_rate: Decimal::ZERO,
            free_delivery_threshold: Some(Decimal::from(1000)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSettings {
    pub enable_cash_on_delivery: bool,
    pub enable_bkash: bool,
    pub enable_nagad: bool,
    #[validate(length(min = 11, message = "Invalid bKash number."))]
    pub bkash_number: Option<String>,
    #[validate(length(min = 11, message = "Invalid Nagad number."))]
    pub nagad_number: Option<String>,
    pub checkout_notes: Option<String>,
}

impl Default for PaymentSettings {
    fn default() -> Self {
        Self {
            enable_cash_on_delivery: true,
            enable_bkash: true,
            enable_nagad: false,
            bkash_number: None,
            nagad_number: None,
            checkout_notes: None,
        }
    }
}

impl PaymentSettings {
    pub fn enabled_methods(&self) -> Vec<String> {
        let mut methods = Vec::new();
        if self.enable_cash_on_delivery {
            methods.push("cash_on_delivery".to_string());
        }
        if self.enable_bkash {
            methods.push("bkash".to_string());
        }
        if self.enable_nagad {
            methods.push("nagad".to_string());
        }
        methods
    }
}

// O que a vitrine (checkout) pode ver sem login
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicSettings {
    pub store_name: String,
    pub store_currency: String,
    pub tax_rate: Decimal,
    pub free_delivery_threshold: Option<Decimal>,
    pub payment_methods: Vec<String>,
    pub bkash_number: Option<String>,
    pub nagad_number: Option<String>,
    pub checkout_notes: Option<String>,
}
