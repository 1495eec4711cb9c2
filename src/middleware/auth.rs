use axum::{extract::FromRequestParts, http::header};
use jsonwebtoken::{DecodingKey, Validation, decode};
use uuid::Uuid;

use crate::{dto::auth::Claims, error::AppError};

/// Caller identity resolved from the bearer token of the current request.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: String,
    pub name: String,
    pub lastname: String,
}

pub fn ensure_owner(user: &AuthUser, owner_id: Uuid) -> Result<(), AppError> {
    if user.user_id != owner_id {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;
    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or(AppError::Unauthenticated)?;

        let auth_str = auth_header
            .to_str()
            .map_err(|_| AppError::Unauthenticated)?;

        if !auth_str.starts_with("Bearer ") {
            return Err(AppError::Unauthenticated);
        }
        let token = auth_str.trim_start_matches("Bearer ").trim();

        let secret = std::env::var("JWT_SECRET")
            .map_err(|_| AppError::Internal(anyhow::anyhow!("JWT_SECRET is not set")))?;

        let decoded = decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| AppError::Unauthenticated)?;

        let claims = decoded.claims;
        Ok(AuthUser {
            user_id: claims.id,
            email: claims.email,
            name: claims.name,
            lastname: claims.lastname,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_check_accepts_matching_seller() {
        let id = Uuid::new_v4();
        let user = AuthUser {
            user_id: id,
            email: "a@b.c".into(),
            name: "A".into(),
            lastname: "B".into(),
        };
        assert!(ensure_owner(&user, id).is_ok());
    }

    #[test]
    fn owner_check_rejects_other_seller() {
        let user = AuthUser {
            user_id: Uuid::new_v4(),
            email: "a@b.c".into(),
            name: "A".into(),
            lastname: "B".into(),
        };
        assert!(matches!(
            ensure_owner(&user, Uuid::new_v4()),
            Err(AppError::Forbidden)
        ));
    }
}
