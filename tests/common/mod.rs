use axum_sales_api::{
    db::{create_orm_conn, create_pool, run_migrations},
    entity::{
        clients::ActiveModel as ClientActive, products::ActiveModel as ProductActive,
        users::ActiveModel as UserActive,
    },
    middleware::auth::AuthUser,
    state::AppState,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ConnectionTrait, Set, Statement};
use uuid::Uuid;

/// Connects to the test database, or None when no URL is configured so the
/// caller can skip.
pub async fn setup_state() -> anyhow::Result<Option<AppState>> {
    let database_url =
        match std::env::var("TEST_DATABASE_URL").or_else(|_| std::env::var("DATABASE_URL")) {
            Ok(url) => url,
            Err(_) => {
                eprintln!(
                    "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration tests."
                );
                return Ok(None);
            }
        };

    let pool = create_pool(&database_url).await?;
    let orm = create_orm_conn(&database_url).await?;
    run_migrations(&orm).await?;

    // Clean tables between runs
    let backend = orm.get_database_backend();
    orm.execute(Statement::from_string(
        backend,
        "TRUNCATE TABLE order_lines, orders, clients, audit_logs, products, users RESTART IDENTITY CASCADE",
    ))
    .await?;

    Ok(Some(AppState { pool, orm }))
}

pub async fn create_seller(state: &AppState, email: &str) -> anyhow::Result<AuthUser> {
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        name: Set("Test".into()),
        lastname: Set("Seller".into()),
        email: Set(email.to_string()),
        password_hash: Set("dummy".into()),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(AuthUser {
        user_id: user.id,
        email: user.email,
        name: user.name,
        lastname: user.lastname,
    })
}

pub async fn create_client_row(
    state: &AppState,
    seller_id: Uuid,
    email: &str,
) -> anyhow::Result<Uuid> {
    let client = ClientActive {
        id: Set(Uuid::new_v4()),
        name: Set("Client".into()),
        lastname: Set("Test".into()),
        email: Set(email.to_string()),
        company: Set("ACME".into()),
        phone: Set(None),
        seller_id: Set(seller_id),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(client.id)
}

pub async fn create_product_row(
    state: &AppState,
    name: &str,
    stock: i32,
    price: f64,
) -> anyhow::Result<Uuid> {
    let product = ProductActive {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        stock: Set(stock),
        price: Set(price),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(product.id)
}
