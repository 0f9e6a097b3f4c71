//! HTTP handlers for orders.

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use bookstore_http::{ApiResponse, AppError};
use serde_json::Value;

use super::models::{Model as Order, Revenue};
use super::service::OrderService;

pub fn router(service: OrderService) -> Router {
    Router::new()
        .route("/", post(create_order))
        .route("/revenue", get(calculate_revenue))
        .with_state(service)
}

async fn create_order(
    State(service): State<OrderService>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<ApiResponse<Order>, AppError> {
    let Json(payload) = payload?;
    let order = service.create_order(payload).await?;
    Ok(ApiResponse::ok("Order created successfully", order))
}

async fn calculate_revenue(
    State(service): State<OrderService>,
) -> Result<ApiResponse<Revenue>, AppError> {
    let total_revenue = service.calculate_revenue().await?;
    Ok(ApiResponse::ok(
        "Revenue calculated successfully",
        Revenue { total_revenue },
    ))
}
