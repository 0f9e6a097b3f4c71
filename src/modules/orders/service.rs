//! Order placement and revenue.

use bookstore_http::AppError;
use bookstore_kernel::validation::ValidationErrors;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, FromQueryResult,
    QueryFilter, QuerySelect, Set, TransactionTrait,
};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use super::models::{ActiveModel, Column, Entity as OrderEntity, Model as Order, OrderInput};
use super::validation::order_schema;
use crate::modules::products::models::{Column as BookColumn, Entity as BookEntity};

#[derive(Debug, Error)]
pub enum OrderError {
    #[error("invalid order: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("order payload could not be decoded: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("book {0} not found")]
    BookNotFound(String),

    #[error("insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { requested: i64, available: i64 },

    #[error("order storage failed: {0}")]
    Database(#[from] DbErr),
}

impl From<OrderError> for AppError {
    fn from(error: OrderError) -> Self {
        match error {
            OrderError::Validation(errors) => errors.into(),
            OrderError::Payload(e) => AppError::bad_request(e.to_string()),
            OrderError::BookNotFound(_) => AppError::business_rule("book_not_found", "Book not found"),
            OrderError::InsufficientStock { .. } => {
                AppError::business_rule("insufficient_stock", "Insufficient stock")
            }
            OrderError::Database(e) => {
                AppError::Internal(anyhow::Error::new(e).context("order storage failed"))
            }
        }
    }
}

#[derive(Debug, FromQueryResult)]
struct RevenueRow {
    total_revenue: Option<f64>,
}

/// Order operations over an injected database handle.
#[derive(Clone)]
pub struct OrderService {
    db: DatabaseConnection,
}

impl OrderService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Place an order, taking the ordered units out of the book's stock.
    ///
    /// The conditional decrement is the first statement of the transaction,
    /// so the write lock is taken before anything is read and concurrent
    /// orders queue on the database's busy timeout. When no row matches,
    /// a follow-up read tells a missing book from a short one.
    pub async fn create_order(&self, payload: Value) -> Result<Order, OrderError> {
        order_schema().validate(&payload)?;
        let input: OrderInput = serde_json::from_value(payload)?;

        let now = Utc::now();
        let txn = self.db.begin().await?;

        // Every SET expression reads the pre-update row, so `in_stock`
        // compares the old quantity against the amount being removed.
        let decrement = BookEntity::update_many()
            .col_expr(
                BookColumn::Quantity,
                Expr::col(BookColumn::Quantity).sub(input.quantity),
            )
            .col_expr(
                BookColumn::InStock,
                Expr::col(BookColumn::Quantity).gt(input.quantity),
            )
            .col_expr(BookColumn::UpdatedAt, Expr::value(now))
            .filter(BookColumn::Id.eq(input.product.as_str()))
            .filter(BookColumn::Quantity.gte(input.quantity))
            .exec(&txn)
            .await?;

        let book = BookEntity::find_by_id(input.product.clone()).one(&txn).await?;

        if decrement.rows_affected == 0 {
            txn.rollback().await?;
            return Err(match book {
                None => OrderError::BookNotFound(input.product),
                Some(book) => {
                    tracing::debug!(
                        book_id = %book.id,
                        requested = input.quantity,
                        available = book.quantity,
                        "order refused for stock"
                    );
                    OrderError::InsufficientStock {
                        requested: input.quantity,
                        available: book.quantity,
                    }
                }
            });
        }

        let Some(book) = book else {
            txn.rollback().await?;
            return Err(OrderError::BookNotFound(input.product));
        };

        let order = ActiveModel {
            id: Set(Uuid::now_v7().to_string()),
            email: Set(input.email),
            product: Set(book.id.clone()),
            quantity: Set(input.quantity),
            total_price: Set(book.price * input.quantity as f64),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        tracing::info!(
            order_id = %order.id,
            book_id = %book.id,
            quantity = order.quantity,
            total_price = order.total_price,
            remaining = book.quantity,
            "order created"
        );
        Ok(order)
    }

    /// Sum of `total_price` over all orders; zero when there are none.
    pub async fn calculate_revenue(&self) -> Result<f64, OrderError> {
        let row = OrderEntity::find()
            .select_only()
            .column_as(Column::TotalPrice.sum(), "total_revenue")
            .into_model::<RevenueRow>()
            .one(&self.db)
            .await?;

        Ok(row.and_then(|row| row.total_revenue).unwrap_or(0.0))
    }
}
