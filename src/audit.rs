use serde_json::Value;
use uuid::Uuid;

use crate::{db::DbPool, error::AppResult};

/// Appends one row to the sales audit trail.
///
/// `actor_id` is the acting seller, or None for catalog mutations, which
/// require no identity. Actions follow the `<resource>_<verb>` convention
/// (`order_create`, `client_delete`, ...). Callers treat a failure here as
/// non-fatal: they log it and carry on, so a lost audit row never fails the
/// mutation it describes.
pub async fn log_audit(
    pool: &DbPool,
    actor_id: Option<Uuid>,
    action: &str,
    resource: Option<&str>,
    metadata: Option<Value>,
) -> AppResult<()> {
    sqlx::query(
        r#"
        INSERT INTO audit_logs (id, user_id, action, resource, metadata)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(actor_id)
    .bind(action)
    .bind(resource)
    .bind(metadata)
    .execute(pool)
    .await?;

    Ok(())
}
