pub mod addresses;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod follows;
pub mod notifications;
pub mod orders;
pub mod payments;
pub mod reviews;
