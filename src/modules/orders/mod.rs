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

use service::OrderService;

/// Orders against the catalog, and revenue over all orders
pub struct OrdersModule {
    service: OrderService,
}

impl OrdersModule {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            service: OrderService::new(db),
        }
    }
}

#[async_trait]
impl Module for OrdersModule {
    fn name(&self) -> &'static str {
        "orders"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "orders module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.service.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let error = json!({
            "application/json": { "schema": { "$ref": "#/components/schemas/ErrorEnvelope" } }
        });

        Some(json!({
            "paths": {
                "/": {
                    "post": {
                        "summary": "Place an order",
                        "tags": ["Orders"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": { "schema": { "$ref": "#/components/schemas/OrderInput" } }
                            }
                        },
                        "responses": {
                            "200": { "description": "Order created successfully" },
                            "400": {
                                "description": "Validation failed, book not found, or insufficient stock",
                                "content": error
                            }
                        }
                    }
                },
                "/revenue": {
                    "get": {
                        "summary": "Total revenue over all orders",
                        "tags": ["Orders"],
                        "responses": {
                            "200": { "description": "Revenue calculated successfully" },
                            "500": { "description": "Internal server error", "content": error }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "OrderInput": {
                        "type": "object",
                        "properties": {
                            "email": { "type": "string", "format": "email" },
                            "product": { "type": "string", "description": "Book identifier" },
                            "quantity": { "type": "integer", "minimum": 1 }
                        },
                        "required": ["email", "product", "quantity"]
                    },
                    "Order": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "string" },
                            "email": { "type": "string", "format": "email" },
                            "product": { "type": "string" },
                            "quantity": { "type": "integer" },
                            "totalPrice": { "type": "number" },
                            "createdAt": { "type": "string", "format": "date-time" },
                            "updatedAt": { "type": "string", "format": "date-time" }
                        },
                        "required": ["id", "email", "product", "quantity", "totalPrice", "createdAt", "updatedAt"]
                    }
                }
            }
        }))
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![
            Migration {
                id: "001_init",
                up: r#"
                    CREATE TABLE IF NOT EXISTS orders (
                        id          TEXT PRIMARY KEY NOT NULL,
                        email       TEXT NOT NULL,
                        product     TEXT NOT NULL,
                        quantity    INTEGER NOT NULL CHECK (quantity >= 1),
                        total_price REAL NOT NULL,
                        created_at  TEXT NOT NULL,
                        updated_at  TEXT NOT NULL
                    )
                    "#,
            },
            Migration {
                id: "002_product_index",
                up: "CREATE INDEX IF NOT EXISTS orders_product_idx ON orders (product)",
            },
        ]
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "orders module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "orders module stopped");
        Ok(())
    }
}

/// Create a new instance of the orders module
pub fn create_module(db: DatabaseConnection) -> Arc<dyn Module> {
    Arc::new(OrdersModule::new(db))
}
