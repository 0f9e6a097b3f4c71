//! HTTP handlers for the catalog.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    routing::get,
    Json, Router,
};
use bookstore_http::{ApiResponse, AppError};
use serde_json::{json, Value};

use super::models::{BookQuery, Model as Book};
use super::service::ProductService;

pub fn router(service: ProductService) -> Router {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route(
            "/{product_id}",
            get(get_book).put(update_book).delete(delete_book),
        )
        .with_state(service)
}

async fn create_book(
    State(service): State<ProductService>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<ApiResponse<Book>, AppError> {
    let Json(payload) = payload?;
    let book = service.create(payload).await?;
    Ok(ApiResponse::ok("Book created successfully", book))
}

async fn list_books(
    State(service): State<ProductService>,
    query: Result<Query<BookQuery>, QueryRejection>,
) -> Result<ApiResponse<Vec<Book>>, AppError> {
    let Query(query) = query?;
    let books = service.list(query.search_term.as_deref()).await?;
    Ok(ApiResponse::ok("Books retrieved successfully", books))
}

async fn get_book(
    State(service): State<ProductService>,
    Path(product_id): Path<String>,
) -> Result<ApiResponse<Book>, AppError> {
    let book = service.get_by_id(&product_id).await?;
    Ok(ApiResponse::ok("Book retrieved successfully", book))
}

async fn update_book(
    State(service): State<ProductService>,
    Path(product_id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<ApiResponse<Book>, AppError> {
    let Json(patch) = payload?;
    let book = service.update(&product_id, patch).await?;
    Ok(ApiResponse::ok("Book updated successfully", book))
}

async fn delete_book(
    State(service): State<ProductService>,
    Path(product_id): Path<String>,
) -> Result<ApiResponse<Value>, AppError> {
    service.delete(&product_id).await?;
    Ok(ApiResponse::ok("Book deleted successfully", json!({})))
}
