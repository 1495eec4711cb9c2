mod common;

use axum_sales_api::services::product_service;

// Search matches names regardless of case and never returns more than 10 hits.
#[tokio::test]
async fn search_is_case_insensitive_and_capped_at_ten() -> anyhow::Result<()> {
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    for i in 0..12 {
        common::create_product_row(&state, &format!("Gadget {i}"), 5, 10.0).await?;
    }
    common::create_product_row(&state, "Widget", 5, 10.0).await?;

    let hits = product_service::search_products(&state, "gadget")
        .await?
        .data
        .expect("hits");
    assert_eq!(hits.items.len(), 10, "12 matches capped at 10");
    assert!(hits.items.iter().all(|p| p.name.starts_with("Gadget")));

    let hits = product_service::search_products(&state, "WIDGET")
        .await?
        .data
        .expect("hits");
    assert_eq!(hits.items.len(), 1);
    assert_eq!(hits.items[0].name, "Widget");

    let hits = product_service::search_products(&state, "no-such-product")
        .await?
        .data
        .expect("hits");
    assert!(hits.items.is_empty());

    Ok(())
}
