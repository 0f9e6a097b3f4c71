pub mod models;
pub mod routes;
pub mod service;
pub mod validation;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use bookstore_kernel::{InitCtx, Migration, Module};
use sea_orm::DatabaseConnection;
use serde_json::json;

use models::CATEGORIES;
use service::ProductService;

/// Book catalog: create, list, fetch, update, and delete books
pub struct ProductsModule {
    service: ProductService,
}

impl ProductsModule {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            service: ProductService::new(db),
        }
    }
}

#[async_trait]
impl Module for ProductsModule {
    fn name(&self) -> &'static str {
        "products"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "products module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.service.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let book_id = json!({
            "name": "productId",
            "in": "path",
            "required": true,
            "schema": { "type": "string" }
        });
        let error = json!({
            "application/json": { "schema": { "$ref": "#/components/schemas/ErrorEnvelope" } }
        });
        let book_body = json!({
            "required": true,
            "content": {
                "application/json": { "schema": { "$ref": "#/components/schemas/BookInput" } }
            }
        });

        Some(json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List books",
                        "tags": ["Products"],
                        "parameters": [{
                            "name": "searchTerm",
                            "in": "query",
                            "required": false,
                            "description": "Case-insensitive match on title, author, or category",
                            "schema": { "type": "string" }
                        }],
                        "responses": {
                            "200": { "description": "Books retrieved successfully" },
                            "500": { "description": "Internal server error", "content": error }
                        }
                    },
                    "post": {
                        "summary": "Create a book",
                        "tags": ["Products"],
                        "requestBody": book_body,
                        "responses": {
                            "200": { "description": "Book created successfully" },
                            "400": { "description": "Validation failed", "content": error }
                        }
                    }
                },
                "/{productId}": {
                    "get": {
                        "summary": "Get a book",
                        "tags": ["Products"],
                        "parameters": [book_id],
                        "responses": {
                            "200": { "description": "Book retrieved successfully" },
                            "404": { "description": "Book not found", "content": error }
                        }
                    },
                    "put": {
                        "summary": "Merge-update a book",
                        "tags": ["Products"],
                        "parameters": [book_id],
                        "requestBody": {
                            "required": true,
                            "content": { "application/json": { "schema": { "type": "object" } } }
                        },
                        "responses": {
                            "200": { "description": "Book updated successfully" },
                            "400": { "description": "Merged book failed validation", "content": error },
                            "404": { "description": "Book not found", "content": error }
                        }
                    },
                    "delete": {
                        "summary": "Delete a book",
                        "tags": ["Products"],
                        "parameters": [book_id],
                        "responses": {
                            "200": { "description": "Book deleted successfully" },
                            "404": { "description": "Book not found", "content": error }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "BookInput": {
                        "type": "object",
                        "properties": {
                            "title": { "type": "string" },
                            "author": { "type": "string" },
                            "price": { "type": "number", "minimum": 0 },
                            "category": { "type": "string", "enum": CATEGORIES },
                            "description": { "type": "string" },
                            "quantity": { "type": "integer", "minimum": 0 },
                            "inStock": { "type": "boolean" }
                        },
                        "required": ["title", "author", "price", "category", "description", "quantity"]
                    },
                    "Book": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "string" },
                            "title": { "type": "string" },
                            "author": { "type": "string" },
                            "price": { "type": "number" },
                            "category": { "type": "string", "enum": CATEGORIES },
                            "description": { "type": "string" },
                            "quantity": { "type": "integer" },
                            "inStock": { "type": "boolean" },
                            "createdAt": { "type": "string", "format": "date-time" },
                            "updatedAt": { "type": "string", "format": "date-time" }
                        },
                        "required": ["id", "title", "author", "price", "category", "description", "quantity", "inStock", "createdAt", "updatedAt"]
                    }
                }
            }
        }))
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration {
            id: "001_init",
            up: r#"
                CREATE TABLE IF NOT EXISTS books (
                    id          TEXT PRIMARY KEY NOT NULL,
                    title       TEXT NOT NULL,
                    author      TEXT NOT NULL,
                    price       REAL NOT NULL CHECK (price >= 0),
                    category    TEXT NOT NULL,
                    description TEXT NOT NULL,
                    quantity    INTEGER NOT NULL CHECK (quantity >= 0),
                    in_stock    BOOLEAN NOT NULL,
                    created_at  TEXT NOT NULL,
                    updated_at  TEXT NOT NULL
                )
                "#,
        }]
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "products module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "products module stopped");
        Ok(())
    }
}

/// Create a new instance of the products module
pub fn create_module(db: DatabaseConnection) -> Arc<dyn Module> {
    Arc::new(ProductsModule::new(db))
}
