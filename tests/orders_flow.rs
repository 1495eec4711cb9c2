mod common;

use axum_sales_api::{
    dto::orders::{CreateOrderRequest, OrderLineInput, UpdateOrderRequest},
    entity::products::Entity as Products,
    error::AppError,
    models::OrderStatus,
    services::order_service,
    state::AppState,
};
use sea_orm::{ConnectionTrait, EntityTrait};
use uuid::Uuid;

async fn stock_of(state: &AppState, product_id: Uuid) -> i32 {
    Products::find_by_id(product_id)
        .one(&state.orm)
        .await
        .expect("query")
        .expect("product")
        .stock
}

fn order_request(client_id: Uuid, lines: Vec<OrderLineInput>, total: f64) -> CreateOrderRequest {
    CreateOrderRequest {
        client_id,
        lines,
        total,
        status: None,
    }
}

// Placing an order decrements stock exactly; a follow-up order over the
// remaining stock is rejected and reports what is available.
#[tokio::test]
async fn order_decrements_stock_and_rejects_oversell() -> anyhow::Result<()> {
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    let seller = common::create_seller(&state, "seller-a@example.com").await?;
    let client_id = common::create_client_row(&state, seller.user_id, "c1@example.com").await?;
    let product_id = common::create_product_row(&state, "Widget", 5, 100.0).await?;

    let resp = order_service::create_order(
        &state,
        &seller,
        order_request(
            client_id,
            vec![OrderLineInput {
                product_id,
                qty: 5,
            }],
            500.0,
        ),
    )
    .await?;

    let created = resp.data.expect("order data");
    assert_eq!(created.order.status, OrderStatus::Pending);
    assert_eq!(created.lines.len(), 1);
    assert_eq!(created.lines[0].qty, 5);
    assert_eq!(created.lines[0].name, "Widget");
    assert_eq!(stock_of(&state, product_id).await, 0);

    let err = order_service::create_order(
        &state,
        &seller,
        order_request(
            client_id,
            vec![OrderLineInput {
                product_id,
                qty: 1,
            }],
            100.0,
        ),
    )
    .await
    .expect_err("oversell must fail");

    match err {
        AppError::InsufficientStock { available } => assert_eq!(available, 0),
        other => panic!("expected InsufficientStock, got {other:?}"),
    }
    assert_eq!(stock_of(&state, product_id).await, 0);

    Ok(())
}

// When a later line fails, decrements applied for earlier lines of the same
// request are released again.
#[tokio::test]
async fn failed_order_releases_earlier_line_decrements() -> anyhow::Result<()> {
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    let seller = common::create_seller(&state, "seller-a@example.com").await?;
    let client_id = common::create_client_row(&state, seller.user_id, "c1@example.com").await?;
    let plenty = common::create_product_row(&state, "Plenty", 10, 10.0).await?;
    let scarce = common::create_product_row(&state, "Scarce", 1, 50.0).await?;

    let err = order_service::create_order(
        &state,
        &seller,
        order_request(
            client_id,
            vec![
                OrderLineInput {
                    product_id: plenty,
                    qty: 2,
                },
                OrderLineInput {
                    product_id: scarce,
                    qty: 5,
                },
            ],
            270.0,
        ),
    )
    .await
    .expect_err("second line must fail");

    match err {
        AppError::InsufficientStock { available } => assert_eq!(available, 1),
        other => panic!("expected InsufficientStock, got {other:?}"),
    }

    // Both products end where they started.
    assert_eq!(stock_of(&state, plenty).await, 10);
    assert_eq!(stock_of(&state, scarce).await, 1);

    Ok(())
}

// A store failure after the stock was already reserved must hand the
// reservation back, not leave the product under-stocked with no order.
#[tokio::test]
async fn store_failure_after_reservation_releases_stock() -> anyhow::Result<()> {
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    let seller = common::create_seller(&state, "seller-a@example.com").await?;
    let client_id = common::create_client_row(&state, seller.user_id, "c1@example.com").await?;
    let product_id = common::create_product_row(&state, "Widget", 5, 100.0).await?;

    // Force the order insert itself to fail once reservation succeeded:
    // a negative total trips this constraint.
    state
        .orm
        .execute_unprepared(
            "ALTER TABLE orders ADD CONSTRAINT orders_total_nonnegative CHECK (total >= 0)",
        )
        .await?;

    let result = order_service::create_order(
        &state,
        &seller,
        order_request(
            client_id,
            vec![OrderLineInput {
                product_id,
                qty: 2,
            }],
            -1.0,
        ),
    )
    .await;

    state
        .orm
        .execute_unprepared("ALTER TABLE orders DROP CONSTRAINT orders_total_nonnegative")
        .await?;

    let err = result.expect_err("order insert must fail");
    assert!(matches!(err, AppError::OrmError(_)));
    assert_eq!(stock_of(&state, product_id).await, 5);

    Ok(())
}

// The by-seller listing carries each order's line snapshots.
#[tokio::test]
async fn seller_listing_includes_line_snapshots() -> anyhow::Result<()> {
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    let seller = common::create_seller(&state, "seller-a@example.com").await?;
    let client_id = common::create_client_row(&state, seller.user_id, "c1@example.com").await?;
    let product_id = common::create_product_row(&state, "Widget", 5, 100.0).await?;

    order_service::create_order(
        &state,
        &seller,
        order_request(
            client_id,
            vec![OrderLineInput {
                product_id,
                qty: 2,
            }],
            200.0,
        ),
    )
    .await?;

    let listed = order_service::list_orders_by_seller(&state, &seller)
        .await?
        .data
        .expect("listing");
    assert_eq!(listed.items.len(), 1);
    assert_eq!(listed.items[0].lines.len(), 1);
    assert_eq!(listed.items[0].lines[0].product_id, product_id);
    assert_eq!(listed.items[0].lines[0].name, "Widget");
    assert_eq!(listed.items[0].lines[0].qty, 2);

    Ok(())
}

#[tokio::test]
async fn order_for_foreign_client_is_forbidden() -> anyhow::Result<()> {
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    let seller_a = common::create_seller(&state, "seller-a@example.com").await?;
    let seller_b = common::create_seller(&state, "seller-b@example.com").await?;
    let client_of_a = common::create_client_row(&state, seller_a.user_id, "c1@example.com").await?;
    let product_id = common::create_product_row(&state, "Widget", 5, 100.0).await?;

    let err = order_service::create_order(
        &state,
        &seller_b,
        order_request(
            client_of_a,
            vec![OrderLineInput {
                product_id,
                qty: 1,
            }],
            100.0,
        ),
    )
    .await
    .expect_err("foreign client must be rejected");
    assert!(matches!(err, AppError::Forbidden));

    // Nothing was reserved.
    assert_eq!(stock_of(&state, product_id).await, 5);

    Ok(())
}

#[tokio::test]
async fn update_revises_lines_and_enforces_status_transitions() -> anyhow::Result<()> {
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    let seller = common::create_seller(&state, "seller-a@example.com").await?;
    let client_id = common::create_client_row(&state, seller.user_id, "c1@example.com").await?;
    let product_id = common::create_product_row(&state, "Widget", 10, 100.0).await?;

    let created = order_service::create_order(
        &state,
        &seller,
        order_request(
            client_id,
            vec![OrderLineInput {
                product_id,
                qty: 3,
            }],
            300.0,
        ),
    )
    .await?
    .data
    .expect("order data");
    assert_eq!(stock_of(&state, product_id).await, 7);

    // Revised line list is charged against stock again (7 - 2 = 5).
    let updated = order_service::update_order(
        &state,
        &seller,
        created.order.id,
        UpdateOrderRequest {
            client_id,
            lines: Some(vec![OrderLineInput {
                product_id,
                qty: 2,
            }]),
            total: Some(200.0),
            status: Some(OrderStatus::Completed),
        },
    )
    .await?
    .data
    .expect("order data");
    assert_eq!(updated.order.status, OrderStatus::Completed);
    assert_eq!(updated.lines.len(), 1);
    assert_eq!(updated.lines[0].qty, 2);
    assert_eq!(stock_of(&state, product_id).await, 5);

    // COMPLETED is terminal.
    let err = order_service::update_order(
        &state,
        &seller,
        created.order.id,
        UpdateOrderRequest {
            client_id,
            lines: None,
            total: None,
            status: Some(OrderStatus::Canceled),
        },
    )
    .await
    .expect_err("terminal order must not move");
    assert!(matches!(err, AppError::BadRequest(_)));

    Ok(())
}

#[tokio::test]
async fn delete_checks_the_orders_own_seller() -> anyhow::Result<()> {
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    let seller_a = common::create_seller(&state, "seller-a@example.com").await?;
    let seller_b = common::create_seller(&state, "seller-b@example.com").await?;
    let client_id = common::create_client_row(&state, seller_a.user_id, "c1@example.com").await?;
    let product_id = common::create_product_row(&state, "Widget", 5, 100.0).await?;

    let created = order_service::create_order(
        &state,
        &seller_a,
        order_request(
            client_id,
            vec![OrderLineInput {
                product_id,
                qty: 1,
            }],
            100.0,
        ),
    )
    .await?
    .data
    .expect("order data");

    let err = order_service::delete_order(&state, &seller_b, created.order.id)
        .await
        .expect_err("non-owner delete must fail");
    assert!(matches!(err, AppError::Forbidden));

    let resp = order_service::delete_order(&state, &seller_a, created.order.id).await?;
    assert_eq!(resp.data.as_deref(), Some("Order deleted"));

    let err = order_service::get_order(&state, &seller_a, created.order.id)
        .await
        .expect_err("order is gone");
    assert!(matches!(err, AppError::NotFound));

    Ok(())
}
