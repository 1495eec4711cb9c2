pub mod clients;
pub mod order_lines;
pub mod orders;
pub mod products;
pub mod users;
