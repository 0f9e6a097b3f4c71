use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Catalog categories, in the spelling clients send and the store keeps.
pub const CATEGORIES: &[&str] = &["Fiction", "Science", "SelfDevelopment", "Poetry", "Religious"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(None)")]
pub enum Category {
    #[sea_orm(string_value = "Fiction")]
    Fiction,
    #[sea_orm(string_value = "Science")]
    Science,
    #[sea_orm(string_value = "SelfDevelopment")]
    SelfDevelopment,
    #[sea_orm(string_value = "Poetry")]
    Poetry,
    #[sea_orm(string_value = "Religious")]
    Religious,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Fiction => "Fiction",
            Category::Science => "Science",
            Category::SelfDevelopment => "SelfDevelopment",
            Category::Poetry => "Poetry",
            Category::Religious => "Religious",
        }
    }
}

/// A sellable title with its price and stock count.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "books")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub title: String,
    pub author: String,
    pub price: f64,
    pub category: Category,
    pub description: String,
    pub quantity: i64,
    /// Always `quantity > 0`
    pub in_stock: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// The client-writable view of the record, keyed the way payloads are.
    ///
    /// Identifier and timestamps are left out so they can never be merged
    /// over by an update.
    pub fn writable_fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("title".to_string(), json!(self.title));
        fields.insert("author".to_string(), json!(self.author));
        fields.insert("price".to_string(), json!(self.price));
        fields.insert("category".to_string(), json!(self.category));
        fields.insert("description".to_string(), json!(self.description));
        fields.insert("quantity".to_string(), json!(self.quantity));
        fields.insert("inStock".to_string(), json!(self.in_stock));
        fields
    }

    /// Whether title, author, or category contains `needle`, which must
    /// already be lowercase.
    pub fn matches(&self, needle: &str) -> bool {
        [
            self.title.as_str(),
            self.author.as_str(),
            self.category.as_str(),
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
    }
}

/// A validated book payload.
///
/// `in_stock` is accepted for compatibility but never stored as sent; the
/// stored flag is derived from `quantity`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookInput {
    pub title: String,
    pub author: String,
    pub price: f64,
    pub category: Category,
    pub description: String,
    pub quantity: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_stock: Option<bool>,
}

/// Query string accepted by the list endpoint
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookQuery {
    pub search_term: Option<String>,
}
