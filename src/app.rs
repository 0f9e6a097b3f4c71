//! Application assembly: database, modules, and the HTTP router.

use anyhow::Context;
use axum::{routing::get, Json, Router};
use bookstore_kernel::settings::Settings;
use bookstore_kernel::{InitCtx, ModuleRegistry};
use sea_orm::DatabaseConnection;
use serde_json::{json, Value};

use crate::modules;

/// Connect to the database, register every module, and bring them up.
///
/// Modules are initialized before migrations run and started after.
pub async fn prepare(settings: &Settings) -> anyhow::Result<(DatabaseConnection, ModuleRegistry)> {
    let db = bookstore_db::connect(&settings.database).await?;

    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, &db);
    tracing::info!(modules = registry.module_count(), "modules registered");

    let ctx = InitCtx {
        settings,
        db: &db,
    };

    registry.init_modules(&ctx).await?;

    let applied = bookstore_db::migrate(&db, &registry.collect_migrations())
        .await
        .context("failed to apply migrations")?;
    tracing::info!(applied, "migrations complete");

    registry.start_modules(&ctx).await?;

    Ok((db, registry))
}

/// The full application router, middleware included.
pub fn build_app(registry: &ModuleRegistry, settings: &Settings) -> Router {
    let app_routes = Router::new().route("/", get(welcome));
    bookstore_http::build_router(registry, settings, app_routes)
}

async fn welcome() -> Json<Value> {
    Json(json!({ "message": "Welcome to book store" }))
}
