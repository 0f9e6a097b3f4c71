//! Payload rules for books.

use bookstore_kernel::validation::{FieldKind, FieldRule, Schema};
use once_cell::sync::Lazy;

use super::models::CATEGORIES;

static BOOK_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    Schema::new(vec![
        FieldRule::required("title", FieldKind::String),
        FieldRule::required("author", FieldKind::String),
        FieldRule::required("price", FieldKind::Number { min: Some(0.0) }),
        FieldRule::required("category", FieldKind::OneOf(CATEGORIES)),
        FieldRule::required("description", FieldKind::String),
        FieldRule::required("quantity", FieldKind::Integer { min: Some(0) }),
        FieldRule::optional("inStock", FieldKind::Boolean),
    ])
});

/// Rules every stored book must satisfy, on create and after an update merge.
pub fn book_schema() -> &'static Schema {
    &BOOK_SCHEMA
}
