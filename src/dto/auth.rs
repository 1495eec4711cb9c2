use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Deserialize, Debug, ToSchema)]
pub struct RegisterRequest {
    pub name: String,
    pub lastname: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
}

/// Token claims. `id`, `email`, `name` and `lastname` must round-trip
/// exactly between issuance and verification.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct Claims {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub lastname: String,
    pub exp: usize,
}
