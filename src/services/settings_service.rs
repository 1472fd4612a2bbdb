// src/services/settings_service.rs

use serde::{de::DeserializeOwned, Serialize};
use validator::Validate;

use crate::{
    common::error::AppError,
    db::DynStore,
    models::settings::{
        validate_money, PaymentSettings, PublicSettings, StoreSettings, PAYMENT_SETTINGS_KEY,
        STORE_SETTINGS_KEY,
    },
};

#[derive(Clone)]
pub struct SettingsService {
    store: DynStore,
}

impl SettingsService {
    pub fn new(store: DynStore) -> Self {
        Self { store }
    }

    // Seção nunca salva: usa os defaults
    async fn load<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T, AppError> {
        match self.store.get_setting(key).await? {
            Some(value) => serde_json::from_value(value)
                .map_err(|e| anyhow::anyhow!("Configuração '{}' corrompida: {}", key, e).into()),
            None => Ok(T::default()),
        }
    }

    async fn save<T: Serialize>(&self, key: &str, settings: &T) -> Result<(), AppError> {
        let value = serde_json::to_value(settings).map_err(anyhow::Error::from)?;
        self.store.put_setting(key, &value).await?;
        tracing::info!(section = key, "Configurações atualizadas");
        Ok(())
    }

    pub async fn store_settings(&self) -> Result<StoreSettings, AppError> {
        self.load(STORE_SETTINGS_KEY).await
    }

    pub async fn update_store_settings(&self, mut settings: StoreSettings) -> Result<StoreSettings, AppError> {
        settings.validate()?;
        if let Some(threshold) = &settings.free_delivery_threshold {
            validate_money(threshold).map_err(|e| {
                AppError::BadRequest(format!(
                    "Invalid free delivery threshold: {}",
                    e.message.unwrap_or_default()
                ))
            })?;
        }
        settings.store_currency = settings.store_currency.to_uppercase();

        self.save(STORE_SETTINGS_KEY, &settings).await?;
        Ok(settings)
    }

    pub async fn payment_settings(&self) -> Result<PaymentSettings, AppError> {
        self.load(PAYMENT_SETTINGS_KEY).await
    }

    pub async fn update_payment_settings(&self, settings: PaymentSettings) -> Result<PaymentSettings, AppError> {
        settings.validate()?;
        if settings.enabled_methods().is_empty() {
            return Err(AppError::BadRequest(
                "At least one payment method must be enabled.".to_string(),
            ));
        }

        self.save(PAYMENT_SETTINGS_KEY, &settings).await?;
        Ok(settings)
    }

    /// O que o checkout precisa, sem dados internos da loja.
    pub async fn public_settings(&self) -> Result<PublicSettings, AppError> {
        let store = self.store_settings().await?;
        let payment = self.payment_settings().await?;

        Ok(PublicSettings {
            store_name: store.store_name,
            store_currency: store.store_currency,
            tax_rate: store.tax_rate,
            free_delivery_threshold: store.free_delivery_threshold,
            payment_methods: payment.enabled_methods(),
            bkash_number: payment.bkash_number.filter(|_| payment.enable_bkash),
            nagad_number: payment.nagad_number.filter(|_| payment.enable_nagad),
            checkout_notes: payment.checkout_notes,
        })
    }
}
