pub mod auth;
pub mod cart_service;
pub mod catalog_query;
pub mod catalog_service;
pub mod purchase_service;
pub mod settings_service;
pub mod user_service;
