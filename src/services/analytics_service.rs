use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    db::DbPool,
    dto::analytics::{TopClient, TopClientList, TopSeller, TopSellerList},
    error::AppResult,
    models::{Client, User},
    response::{ApiResponse, Meta},
};

/// Completed orders grouped by client, summed and joined to the client row.
/// Recomputed from scratch on every call.
pub async fn top_clients(pool: &DbPool) -> AppResult<ApiResponse<TopClientList>> {
    #[derive(sqlx::FromRow)]
    struct Row {
        id: Uuid,
        name: String,
        lastname: String,
        email: String,
        company: String,
        phone: Option<String>,
        seller_id: Uuid,
        created_at: DateTime<Utc>,
        total: f64,
    }

    let rows: Vec<Row> = sqlx::query_as(
        r#"
        SELECT c.id, c.name, c.lastname, c.email, c.company, c.phone,
               c.seller_id, c.created_at,
               SUM(o.total) AS total
        FROM orders o
        JOIN clients c ON c.id = o.client_id
        WHERE o.status = 'COMPLETED'
        GROUP BY c.id
        ORDER BY total DESC
        LIMIT 10
        "#,
    )
    .fetch_all(pool)
    .await?;

    let items = rows
        .into_iter()
        .map(|row| TopClient {
            total: row.total,
            client: Client {
                id: row.id,
                name: row.name,
                lastname: row.lastname,
                email: row.email,
                company: row.company,
                phone: row.phone,
                seller_id: row.seller_id,
                created_at: row.created_at,
            },
        })
        .collect();

    Ok(ApiResponse::success(
        "Top clients",
        TopClientList { items },
        Some(Meta::empty()),
    ))
}

/// Completed orders grouped by seller, joined to the user row. Top 3.
pub async fn top_sellers(pool: &DbPool) -> AppResult<ApiResponse<TopSellerList>> {
    #[derive(sqlx::FromRow)]
    struct Row {
        id: Uuid,
        name: String,
        lastname: String,
        email: String,
        password_hash: String,
        created_at: DateTime<Utc>,
        total: f64,
    }

    let rows: Vec<Row> = sqlx::query_as(
        r#"
        SELECT u.id, u.name, u.lastname, u.email, u.password_hash, u.created_at,
               SUM(o.total) AS total
        FROM orders o
        JOIN users u ON u.id = o.seller_id
        WHERE o.status = 'COMPLETED'
        GROUP BY u.id
        ORDER BY total DESC
        LIMIT 3
        "#,
    )
    .fetch_all(pool)
    .await?;

    let items = rows
        .into_iter()
        .map(|row| TopSeller {
            total: row.total,
            seller: User {
                id: row.id,
                name: row.name,
                lastname: row.lastname,
                email: row.email,
                password_hash: row.password_hash,
                created_at: row.created_at,
            },
        })
        .collect();

    Ok(ApiResponse::success(
        "Top sellers",
        TopSellerList { items },
        Some(Meta::empty()),
    ))
}
