pub mod analytics;
pub mod auth;
pub mod clients;
pub mod orders;
pub mod products;
