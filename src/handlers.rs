pub mod auth;
pub mod cart;
pub mod catalog;
pub mod newsletter;
pub mod purchases;
pub mod settings;
pub mod users;
