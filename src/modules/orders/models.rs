use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A purchase of `quantity` units of one book.
///
/// `total_price` is fixed when the order is placed and never recomputed.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "orders")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub email: String,
    /// Identifier of the ordered book
    pub product: String,
    pub quantity: i64,
    pub total_price: f64,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// A validated order payload
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OrderInput {
    pub email: String,
    pub product: String,
    pub quantity: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Revenue {
    pub total_revenue: f64,
}
