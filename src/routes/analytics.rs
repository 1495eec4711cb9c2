use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::analytics::{TopClientList, TopSellerList},
    error::AppResult,
    response::ApiResponse,
    services::analytics_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/top-clients", get(top_clients))
        .route("/top-sellers", get(top_sellers))
}

#[utoipa::path(
    get,
    path = "/api/analytics/top-clients",
    responses(
        (status = 200, description = "Top 10 clients by completed order total", body = ApiResponse<TopClientList>)
    ),
    tag = "Analytics"
)]
pub async fn top_clients(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<TopClientList>>> {
    let resp = analytics_service::top_clients(&state.pool).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/analytics/top-sellers",
    responses(
        (status = 200, description = "Top 3 sellers by completed order total", body = ApiResponse<TopSellerList>)
    ),
    tag = "Analytics"
)]
pub async fn top_sellers(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<TopSellerList>>> {
    let resp = analytics_service::top_sellers(&state.pool).await?;
    Ok(Json(resp))
}
