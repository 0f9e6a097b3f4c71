//! Catalog data access.
//!
//! Concurrent updates to the same book are not coordinated; the last write
//! wins.

use bookstore_http::AppError;
use bookstore_kernel::validation::ValidationErrors;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, QueryOrder, Set,
};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use super::models::{ActiveModel, BookInput, Column, Entity as BookEntity, Model as Book};
use super::validation::book_schema;

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("invalid book: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("book payload could not be decoded: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("book {0} not found")]
    NotFound(String),

    #[error("book storage failed: {0}")]
    Database(#[from] DbErr),
}

impl From<ProductError> for AppError {
    fn from(error: ProductError) -> Self {
        match error {
            ProductError::Validation(errors) => errors.into(),
            ProductError::Payload(e) => AppError::bad_request(e.to_string()),
            ProductError::NotFound(_) => AppError::not_found("Book not found"),
            ProductError::Database(e) => {
                AppError::Internal(anyhow::Error::new(e).context("book storage failed"))
            }
        }
    }
}

/// Book catalog operations over an injected database handle.
#[derive(Clone)]
pub struct ProductService {
    db: DatabaseConnection,
}

impl ProductService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Validate and store a new book.
    pub async fn create(&self, payload: Value) -> Result<Book, ProductError> {
        book_schema().validate(&payload)?;
        let input: BookInput = serde_json::from_value(payload)?;

        let now = Utc::now();
        let book = ActiveModel {
            id: Set(Uuid::now_v7().to_string()),
            title: Set(input.title),
            author: Set(input.author),
            price: Set(input.price),
            category: Set(input.category),
            description: Set(input.description),
            quantity: Set(input.quantity),
            in_stock: Set(input.quantity > 0),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        tracing::info!(book_id = %book.id, title = %book.title, "book created");
        Ok(book)
    }

    /// All books, optionally narrowed to those whose title, author, or
    /// category contains `search_term`.
    ///
    /// The match is a literal substring under Unicode lowercasing. SQLite's
    /// `LIKE` and `lower()` only fold ASCII and treat `%`/`_` as wildcards,
    /// so the term is matched here rather than in SQL.
    pub async fn list(&self, search_term: Option<&str>) -> Result<Vec<Book>, ProductError> {
        let mut books = BookEntity::find()
            .order_by_asc(Column::CreatedAt)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?;

        if let Some(term) = search_term.map(str::trim).filter(|term| !term.is_empty()) {
            let needle = term.to_lowercase();
            books.retain(|book| book.matches(&needle));
        }

        Ok(books)
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Book, ProductError> {
        BookEntity::find_by_id(id.to_owned())
            .one(&self.db)
            .await?
            .ok_or_else(|| ProductError::NotFound(id.to_owned()))
    }

    /// Merge `patch` over the stored book and persist the result.
    ///
    /// The whole merged book is re-validated, so a patch that leaves the
    /// record invalid is refused and nothing is written.
    pub async fn update(&self, id: &str, patch: Value) -> Result<Book, ProductError> {
        let existing = self.get_by_id(id).await?;

        let Value::Object(changes) = patch else {
            return Err(ValidationErrors::not_object().into());
        };

        let mut merged = existing.writable_fields();
        merged.extend(changes);
        let merged = Value::Object(merged);

        book_schema().validate(&merged)?;
        let input: BookInput = serde_json::from_value(merged)?;

        let mut book: ActiveModel = existing.into();
        book.title = Set(input.title);
        book.author = Set(input.author);
        book.price = Set(input.price);
        book.category = Set(input.category);
        book.description = Set(input.description);
        book.quantity = Set(input.quantity);
        book.in_stock = Set(input.quantity > 0);
        book.updated_at = Set(Utc::now());

        let book = book.update(&self.db).await.map_err(|e| match e {
            DbErr::RecordNotUpdated => ProductError::NotFound(id.to_owned()),
            other => ProductError::Database(other),
        })?;

        tracing::info!(book_id = %book.id, "book updated");
        Ok(book)
    }

    /// Remove a book and hand back what was removed.
    ///
    /// Orders that reference the book are left in place.
    pub async fn delete(&self, id: &str) -> Result<Book, ProductError> {
        let existing = self.get_by_id(id).await?;

        let result = BookEntity::delete_by_id(id.to_owned())
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(ProductError::NotFound(id.to_owned()));
        }

        tracing::info!(book_id = %existing.id, "book deleted");
        Ok(existing)
    }
}
