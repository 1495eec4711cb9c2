use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use sea_orm::ActiveValue::NotSet;
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::products::{CreateProductRequest, ProductList, UpdateProductRequest},
    entity::products::{ActiveModel, Column, Entity as Products, Model as ProductModel},
    error::{AppError, AppResult},
    models::Product,
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    state::AppState,
};

/// At most this many hits come back from a catalog text search.
const SEARCH_LIMIT: u64 = 10;

pub async fn list_products(
    state: &AppState,
    pagination: Pagination,
) -> AppResult<ApiResponse<ProductList>> {
    let (page, limit, offset) = pagination.normalize();

    let finder = Products::find().order_by_desc(Column::CreatedAt);

    // Listing is best-effort: a backend failure degrades to an empty page.
    let result: Result<(Vec<ProductModel>, u64), sea_orm::DbErr> = async {
        let total = finder.clone().count(&state.orm).await?;
        let models = finder
            .limit(limit as u64)
            .offset(offset as u64)
            .all(&state.orm)
            .await?;
        Ok((models, total))
    }
    .await;

    let (items, meta) = match result {
        Ok((models, total)) => (
            models.into_iter().map(product_from_entity).collect(),
            Meta::new(page, limit, total as i64),
        ),
        Err(err) => {
            tracing::warn!(error = %err, "product listing failed");
            (Vec::new(), Meta::empty())
        }
    };

    Ok(ApiResponse::success(
        "Products",
        ProductList { items },
        Some(meta),
    ))
}

pub async fn get_product(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Product>> {
    let result = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .map(product_from_entity);
    let result = match result {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };
    Ok(ApiResponse::success("Product", result, None))
}

pub async fn search_products(state: &AppState, text: &str) -> AppResult<ApiResponse<ProductList>> {
    let pattern = format!("%{}%", text);
    let items = Products::find()
        .filter(Expr::col(Column::Name).ilike(pattern))
        .limit(SEARCH_LIMIT)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(product_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Products",
        ProductList { items },
        Some(Meta::empty()),
    ))
}

pub async fn create_product(
    state: &AppState,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    if payload.stock < 0 {
        return Err(AppError::BadRequest("stock cannot be negative".into()));
    }
    if payload.price < 0.0 {
        return Err(AppError::BadRequest("price cannot be negative".into()));
    }

    let active = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name),
        stock: Set(payload.stock),
        price: Set(payload.price),
        created_at: NotSet,
    };
    let product = active.insert(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        None,
        "product_create",
        Some("products"),
        Some(serde_json::json!({ "product_id": product.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Product created",
        product_from_entity(product),
        Some(Meta::empty()),
    ))
}

pub async fn update_product(
    state: &AppState,
    id: Uuid,
    payload: UpdateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    let existing = Products::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };

    let mut active: ActiveModel = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(stock) = payload.stock {
        if stock < 0 {
            return Err(AppError::BadRequest("stock cannot be negative".into()));
        }
        active.stock = Set(stock);
    }
    if let Some(price) = payload.price {
        if price < 0.0 {
            return Err(AppError::BadRequest("price cannot be negative".into()));
        }
        active.price = Set(price);
    }

    let product = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        None,
        "product_update",
        Some("products"),
        Some(serde_json::json!({ "product_id": product.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Updated",
        product_from_entity(product),
        Some(Meta::empty()),
    ))
}

pub async fn delete_product(state: &AppState, id: Uuid) -> AppResult<ApiResponse<String>> {
    let result = Products::delete_by_id(id).exec(&state.orm).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    if let Err(err) = log_audit(
        &state.pool,
        None,
        "product_delete",
        Some("products"),
        Some(serde_json::json!({ "product_id": id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Deleted",
        "Product deleted".to_string(),
        Some(Meta::empty()),
    ))
}

/// Atomically applies `stock -= qty`, guarded so the committed stock can
/// never go negative. Returns false when the guard rejects the decrement.
pub async fn try_reserve_stock<C: ConnectionTrait>(
    conn: &C,
    product_id: Uuid,
    qty: i32,
) -> AppResult<bool> {
    let result = Products::update_many()
        .col_expr(Column::Stock, Expr::col(Column::Stock).sub(qty))
        .filter(Column::Id.eq(product_id))
        .filter(Column::Stock.gte(qty))
        .exec(conn)
        .await?;

    Ok(result.rows_affected > 0)
}

/// Gives a previously reserved quantity back. Unconditional, additive.
pub async fn release_stock<C: ConnectionTrait>(
    conn: &C,
    product_id: Uuid,
    qty: i32,
) -> AppResult<()> {
    Products::update_many()
        .col_expr(Column::Stock, Expr::col(Column::Stock).add(qty))
        .filter(Column::Id.eq(product_id))
        .exec(conn)
        .await?;

    Ok(())
}

pub fn product_from_entity(model: ProductModel) -> Product {
    Product {
        id: model.id,
        name: model.name,
        stock: model.stock,
        price: model.price,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
