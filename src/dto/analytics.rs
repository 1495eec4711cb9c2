use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{Client, User};

#[derive(Debug, Serialize, ToSchema)]
pub struct TopClient {
    pub total: f64,
    pub client: Client,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TopSeller {
    pub total: f64,
    pub seller: User,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TopClientList {
    pub items: Vec<TopClient>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TopSellerList {
    pub items: Vec<TopSeller>,
}
