use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::orders::{
        CreateOrderRequest, OrderDetailList, OrderLineInput, OrderList, OrderWithLines,
        UpdateOrderRequest,
    },
    entity::{
        clients::Entity as Clients,
        order_lines::{
            ActiveModel as LineActive, Column as LineCol, Entity as OrderLines,
            Model as LineModel,
        },
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel},
        products::Entity as Products,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_owner},
    models::{Order, OrderLine, OrderStatus},
    response::{ApiResponse, Meta},
    services::product_service::{release_stock, try_reserve_stock},
    state::AppState,
};

/// A line whose stock has been reserved, carrying the product snapshot
/// that gets persisted with the order.
struct ReservedLine {
    product_id: Uuid,
    qty: i32,
    name: String,
    price: f64,
}

pub async fn create_order(
    state: &AppState,
    user: &AuthUser,
    payload: CreateOrderRequest,
) -> AppResult<ApiResponse<OrderWithLines>> {
    let client = Clients::find_by_id(payload.client_id)
        .one(&state.orm)
        .await?;
    let client = match client {
        Some(c) => c,
        None => return Err(AppError::NotFound),
    };
    ensure_owner(user, client.seller_id)?;

    let reserved = reserve_lines(state, &payload.lines).await?;

    let persisted = async {
        let order = OrderActive {
            id: Set(Uuid::new_v4()),
            seller_id: Set(user.user_id),
            client_id: Set(client.id),
            status: Set(payload.status.unwrap_or_default()),
            total: Set(payload.total),
            created_at: NotSet,
        }
        .insert(&state.orm)
        .await?;
        let lines = insert_lines(state, order.id, &reserved).await?;
        Ok::<_, AppError>((order, lines))
    }
    .await;

    let (order, lines) = match persisted {
        Ok(ok) => ok,
        Err(err) => {
            // The reservation already committed; hand it back before failing.
            release_reserved(state, &reserved).await;
            return Err(err);
        }
    };

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "order_create",
        Some("orders"),
        Some(serde_json::json!({ "order_id": order.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Order created",
        OrderWithLines {
            order: order_from_entity(order),
            lines,
        },
        Some(Meta::empty()),
    ))
}

pub async fn update_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateOrderRequest,
) -> AppResult<ApiResponse<OrderWithLines>> {
    let existing = Orders::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    let client = Clients::find_by_id(payload.client_id)
        .one(&state.orm)
        .await?;
    let client = match client {
        Some(c) => c,
        None => return Err(AppError::NotFound),
    };
    // Ownership is checked against the (possibly new) client's seller,
    // not the order's original seller. The delete path differs; see DESIGN.md.
    ensure_owner(user, client.seller_id)?;

    if let Some(next) = payload.status
        && !existing.status.can_transition(next)
    {
        return Err(AppError::BadRequest(format!(
            "order cannot move from {:?} to {:?}",
            existing.status, next
        )));
    }

    // A revised line list re-runs the full reserve loop. Quantities carried
    // over from the original order are charged against stock again; only
    // failures inside this request are compensated.
    let replacement = match payload.lines {
        Some(ref lines) => Some(reserve_lines(state, lines).await?),
        None => None,
    };

    let order_id = existing.id;
    let persisted = async {
        if replacement.is_some() {
            OrderLines::delete_many()
                .filter(LineCol::OrderId.eq(order_id))
                .exec(&state.orm)
                .await?;
        }

        let mut active: OrderActive = existing.into();
        active.client_id = Set(client.id);
        if let Some(total) = payload.total {
            active.total = Set(total);
        }
        if let Some(status) = payload.status {
            active.status = Set(status);
        }
        let order = active.update(&state.orm).await?;

        let lines = match replacement.as_deref() {
            Some(reserved) => insert_lines(state, order_id, reserved).await?,
            None => load_lines(state, order_id).await?,
        };
        Ok::<_, AppError>((order, lines))
    }
    .await;

    let (order, lines) = match persisted {
        Ok(ok) => ok,
        Err(err) => {
            if let Some(reserved) = replacement.as_deref() {
                release_reserved(state, reserved).await;
            }
            return Err(err);
        }
    };

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "order_update",
        Some("orders"),
        Some(serde_json::json!({ "order_id": order.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Order updated",
        OrderWithLines {
            order: order_from_entity(order),
            lines,
        },
        Some(Meta::empty()),
    ))
}

pub async fn delete_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<String>> {
    let order = Orders::find_by_id(id).one(&state.orm).await?;
    let order = match order {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };
    // Unlike update, delete authorizes against the order's own seller.
    ensure_owner(user, order.seller_id)?;

    order.delete(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "order_delete",
        Some("orders"),
        Some(serde_json::json!({ "order_id": id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Deleted",
        "Order deleted".to_string(),
        Some(Meta::empty()),
    ))
}

pub async fn get_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderWithLines>> {
    let order = Orders::find_by_id(id).one(&state.orm).await?;
    let order = match order {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };
    ensure_owner(user, order.seller_id)?;

    let lines = load_lines(state, order.id).await?;

    Ok(ApiResponse::success(
        "Order",
        OrderWithLines {
            order: order_from_entity(order),
            lines,
        },
        Some(Meta::empty()),
    ))
}

/// Administrative listing over every seller's orders.
pub async fn list_orders(state: &AppState) -> AppResult<ApiResponse<OrderList>> {
    let items = match Orders::find()
        .order_by_desc(OrderCol::CreatedAt)
        .all(&state.orm)
        .await
    {
        Ok(models) => models.into_iter().map(order_from_entity).collect(),
        Err(err) => {
            tracing::warn!(error = %err, "order listing failed");
            Vec::new()
        }
    };

    Ok(ApiResponse::success(
        "Orders",
        OrderList { items },
        Some(Meta::empty()),
    ))
}

pub async fn list_orders_by_seller(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<OrderDetailList>> {
    // Each order comes back with its line snapshots.
    let result = async {
        let orders = Orders::find()
            .filter(OrderCol::SellerId.eq(user.user_id))
            .order_by_desc(OrderCol::CreatedAt)
            .all(&state.orm)
            .await?;

        let mut items = Vec::with_capacity(orders.len());
        for order in orders {
            let lines = load_lines(state, order.id).await?;
            items.push(OrderWithLines {
                order: order_from_entity(order),
                lines,
            });
        }
        Ok::<_, AppError>(items)
    }
    .await;

    let items = match result {
        Ok(items) => items,
        Err(err) => {
            tracing::warn!(error = %err, "order listing failed");
            Vec::new()
        }
    };

    Ok(ApiResponse::success(
        "Orders",
        OrderDetailList { items },
        Some(Meta::empty()),
    ))
}

pub async fn list_orders_by_status(
    state: &AppState,
    user: &AuthUser,
    status: OrderStatus,
) -> AppResult<ApiResponse<OrderList>> {
    let items = Orders::find()
        .filter(OrderCol::SellerId.eq(user.user_id))
        .filter(OrderCol::Status.eq(status))
        .order_by_desc(OrderCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Orders",
        OrderList { items },
        Some(Meta::empty()),
    ))
}

/// Walks the line items in input order, reserving stock with a conditional
/// atomic decrement per product. On any failure every decrement already
/// applied by this request is released before the error surfaces, so a
/// rejected order leaves stock as it found it.
async fn reserve_lines(
    state: &AppState,
    lines: &[OrderLineInput],
) -> AppResult<Vec<ReservedLine>> {
    let mut reserved: Vec<ReservedLine> = Vec::with_capacity(lines.len());

    for line in lines {
        if line.qty <= 0 {
            release_reserved(state, &reserved).await;
            return Err(AppError::BadRequest("qty must be positive".into()));
        }

        let product = match Products::find_by_id(line.product_id).one(&state.orm).await {
            Ok(Some(p)) => p,
            Ok(None) => {
                release_reserved(state, &reserved).await;
                return Err(AppError::NotFound);
            }
            Err(err) => {
                release_reserved(state, &reserved).await;
                return Err(err.into());
            }
        };

        match try_reserve_stock(&state.orm, product.id, line.qty).await {
            Ok(true) => reserved.push(ReservedLine {
                product_id: product.id,
                qty: line.qty,
                name: product.name,
                price: product.price,
            }),
            Ok(false) => {
                release_reserved(state, &reserved).await;
                return Err(AppError::InsufficientStock {
                    available: product.stock,
                });
            }
            Err(err) => {
                release_reserved(state, &reserved).await;
                return Err(err);
            }
        }
    }

    Ok(reserved)
}

/// Compensation path: hand every reserved quantity back. Failures here are
/// logged rather than surfaced so the original error reaches the caller.
async fn release_reserved(state: &AppState, reserved: &[ReservedLine]) {
    for line in reserved {
        if let Err(err) = release_stock(&state.orm, line.product_id, line.qty).await {
            tracing::warn!(
                error = %err,
                product_id = %line.product_id,
                qty = line.qty,
                "stock release failed; product left under-stocked"
            );
        }
    }
}

async fn insert_lines(
    state: &AppState,
    order_id: Uuid,
    reserved: &[ReservedLine],
) -> AppResult<Vec<OrderLine>> {
    let mut lines = Vec::with_capacity(reserved.len());
    for line in reserved {
        let model = LineActive {
            id: Set(Uuid::new_v4()),
            order_id: Set(order_id),
            product_id: Set(line.product_id),
            qty: Set(line.qty),
            name: Set(line.name.clone()),
            price: Set(line.price),
        }
        .insert(&state.orm)
        .await?;
        lines.push(line_from_entity(model));
    }
    Ok(lines)
}

async fn load_lines(state: &AppState, order_id: Uuid) -> AppResult<Vec<OrderLine>> {
    let lines = OrderLines::find()
        .filter(LineCol::OrderId.eq(order_id))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(line_from_entity)
        .collect();
    Ok(lines)
}

fn order_from_entity(model: OrderModel) -> Order {
    Order {
        id: model.id,
        seller_id: model.seller_id,
        client_id: model.client_id,
        status: model.status,
        total: model.total,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

fn line_from_entity(model: LineModel) -> OrderLine {
    OrderLine {
        id: model.id,
        order_id: model.order_id,
        product_id: model.product_id,
        qty: model.qty,
        name: model.name,
        price: model.price,
    }
}
