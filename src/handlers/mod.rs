pub mod auth;
pub mod catalog;
pub mod products;
pub mod reports;
pub mod setup;
pub mod stock;
pub mod warehouses;
