// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use crate::handlers;
use crate::middleware::auth::SESSION_COOKIE;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Catalog ---
        handlers::catalog::list_products,
        handlers::catalog::featured_products,
        handlers::catalog::get_product,
        handlers::catalog::list_categories,

        // --- Cart ---
        handlers::cart::quote_cart,

        // --- Auth ---
        handlers::auth::login,
        handlers::auth::logout,
        handlers::auth::get_me,
        handlers::auth::change_password,

        // --- Newsletter / Settings públicos ---
        handlers::newsletter::subscribe,
        handlers::settings::get_public_settings,

        // --- Admin Catalog ---
        handlers::catalog::create_product,
        handlers::catalog::update_product,
        handlers::catalog::delete_product,
        handlers::catalog::create_category,
        handlers::catalog::update_category,
        handlers::catalog::delete_category,

        // --- Admin Purchases ---
        handlers::purchases::list_suppliers,
        handlers::purchases::get_supplier,
        handlers::purchases::create_supplier,
        handlers::purchases::update_supplier,
        handlers::purchases::delete_supplier,
        handlers::purchases::list_purchases,
        handlers::purchases::get_purchase,
        handlers::purchases::create_purchase,
        handlers::purchases::update_purchase_status,
        handlers::purchases::delete_purchase,

        // --- Admin Users ---
        handlers::users::list_users,
        handlers::users::create_user,
        handlers::users::update_user,
        handlers::users::delete_user,

        // --- Settings ---
        handlers::settings::get_store_settings,
        handlers::settings::update_store_settings,
        handlers::settings::get_payment_settings,
        handlers::settings::update_payment_settings,

        handlers::newsletter::list_subscribers,
    ),
    components(
        schemas(
            // --- Catalog ---
            models::catalog::Category,
            models::catalog::Product,
            models::catalog::ProductWithCategory,
            models::catalog::ProductPage,
            models::catalog::ProductPayload,
            models::catalog::CategoryPayload,

            // --- Cart ---
            models::cart::CartItem,
            models::cart::Cart,
            models::cart::CartLinePayload,
            models::cart::CartQuoteRequest,
            models::cart::CartQuote,

            // --- Auth ---
            models::auth::Role,
            models::auth::UserStatus,
            models::auth::User,
            models::auth::LoginUserPayload,
            models::auth::ChangePasswordPayload,
            models::auth::CreateUserPayload,
            models::auth::UpdateUserPayload,
            models::auth::AuthResponse,

            // --- Purchases ---
            models::purchase::Supplier,
            models::purchase::SupplierPayload,
            models::purchase::InvoiceStatus,
            models::purchase::PurchaseInvoice,
            models::purchase::PurchaseItem,
            models::purchase::PurchaseSummary,
            models::purchase::PurchaseDetail,
            models::purchase::PurchaseItemPayload,
            models::purchase::PurchasePayload,
            models::purchase::PurchaseStatusPayload,

            // --- Settings ---
            models::settings::StoreSettings,
            models::settings::PaymentSettings,
            models::settings::PublicSettings,

            // --- Newsletter ---
            models::newsletter::NewsletterSubscriber,
            models::newsletter::NewsletterPayload,
            models::newsletter::NewsletterResponse,
        )
    ),
    tags(
        (name = "Catalog", description = "Vitrine: produtos e categorias"),
        (name = "Cart", description = "Precificação do carrinho"),
        (name = "Auth", description = "Login, sessão e senha"),
        (name = "Newsletter", description = "Inscrições na newsletter"),
        (name = "Settings", description = "Configurações da Loja"),
        (name = "Admin Catalog", description = "Cadastro de produtos e categorias"),
        (name = "Admin Purchases", description = "Fornecedores e notas de compra"),
        (name = "Admin Users", description = "Usuários do back-office")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        // O token também é aceito como Bearer, mas o fluxo normal é o cookie
        components.add_security_scheme(
            "session",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(SESSION_COOKIE))),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_admin_and_public_routes() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        assert!(paths.contains_key("/api/products"));
        assert!(paths.contains_key("/api/products/{slug}"));
        assert!(paths.contains_key("/api/admin/purchases/{id}/status"));
        assert!(paths.contains_key("/api/admin/settings/payment"));
        assert!(
            doc.components
                .as_ref()
                .is_some_and(|c| c.security_schemes.contains_key("session"))
        );
    }
}
