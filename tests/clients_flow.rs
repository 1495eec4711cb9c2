mod common;

use axum_sales_api::{
    dto::clients::{CreateClientRequest, UpdateClientRequest},
    error::AppError,
    services::client_service,
};

fn client_request(email: &str) -> CreateClientRequest {
    CreateClientRequest {
        name: "Grace".into(),
        lastname: "Hopper".into(),
        email: email.into(),
        company: "ACME".into(),
        phone: Some("555-0100".into()),
    }
}

#[tokio::test]
async fn duplicate_client_email_conflicts() -> anyhow::Result<()> {
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    let seller = common::create_seller(&state, "seller-a@example.com").await?;

    client_service::create_client(&state, &seller, client_request("dup@example.com")).await?;

    let err = client_service::create_client(&state, &seller, client_request("dup@example.com"))
        .await
        .expect_err("duplicate email must fail");
    assert!(matches!(err, AppError::Conflict(_)));

    // No duplicate was persisted.
    let listed = client_service::list_clients(&state).await?.data.expect("list");
    assert_eq!(listed.items.len(), 1);

    Ok(())
}

#[tokio::test]
async fn only_the_owning_seller_may_edit_or_delete() -> anyhow::Result<()> {
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    let seller_a = common::create_seller(&state, "seller-a@example.com").await?;
    let seller_b = common::create_seller(&state, "seller-b@example.com").await?;

    let created = client_service::create_client(&state, &seller_a, client_request("c1@example.com"))
        .await?
        .data
        .expect("client");

    let patch = UpdateClientRequest {
        name: Some("Renamed".into()),
        lastname: None,
        email: None,
        company: None,
        phone: None,
    };

    let err = client_service::update_client(&state, &seller_b, created.id, patch)
        .await
        .expect_err("non-owner update must fail");
    assert!(matches!(err, AppError::Forbidden));

    let err = client_service::delete_client(&state, &seller_b, created.id)
        .await
        .expect_err("non-owner delete must fail");
    assert!(matches!(err, AppError::Forbidden));

    let err = client_service::get_client(&state, &seller_b, created.id)
        .await
        .expect_err("non-owner read must fail");
    assert!(matches!(err, AppError::Forbidden));

    // The owner can do all of it.
    let updated = client_service::update_client(
        &state,
        &seller_a,
        created.id,
        UpdateClientRequest {
            name: Some("Renamed".into()),
            lastname: None,
            email: None,
            company: None,
            phone: None,
        },
    )
    .await?
    .data
    .expect("client");
    assert_eq!(updated.name, "Renamed");

    let resp = client_service::delete_client(&state, &seller_a, created.id).await?;
    assert_eq!(resp.data.as_deref(), Some("Client deleted"));

    Ok(())
}

#[tokio::test]
async fn seller_scoped_listing_only_returns_own_clients() -> anyhow::Result<()> {
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    let seller_a = common::create_seller(&state, "seller-a@example.com").await?;
    let seller_b = common::create_seller(&state, "seller-b@example.com").await?;

    common::create_client_row(&state, seller_a.user_id, "a1@example.com").await?;
    common::create_client_row(&state, seller_a.user_id, "a2@example.com").await?;
    common::create_client_row(&state, seller_b.user_id, "b1@example.com").await?;

    let mine = client_service::list_clients_by_seller(&state, &seller_a)
        .await?
        .data
        .expect("list");
    assert_eq!(mine.items.len(), 2);
    assert!(mine.items.iter().all(|c| c.seller_id == seller_a.user_id));

    Ok(())
}
