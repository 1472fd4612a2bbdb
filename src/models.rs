pub mod auth;
pub mod cart;
pub mod catalog;
pub mod newsletter;
pub mod purchase;
pub mod settings;
