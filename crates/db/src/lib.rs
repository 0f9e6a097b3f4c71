//! Database connection factory and migration runner.
//!
//! Migrations are contributed by modules through `Module::migrations()` and
//! recorded in a `_migrations` table so that each one runs exactly once.

use std::collections::HashSet;

use anyhow::Context;
use bookstore_kernel::settings::DatabaseSettings;
use bookstore_kernel::Migration;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement, TransactionTrait,
};

const MIGRATIONS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS _migrations (
        module     TEXT NOT NULL,
        id         TEXT NOT NULL,
        applied_at TEXT NOT NULL,
        PRIMARY KEY (module, id)
    )
"#;

/// Open a connection pool for the configured database.
pub async fn connect(settings: &DatabaseSettings) -> anyhow::Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(settings.url.clone());
    options
        .max_connections(settings.max_connections)
        .sqlx_logging(settings.sql_logging);

    // An in-memory database lives only as long as its connection.
    if settings.url.contains(":memory:") {
        options.min_connections(1);
    }

    let db = Database::connect(options)
        .await
        .with_context(|| format!("failed to connect to database at {}", settings.url))?;

    tracing::info!(target: "bookstore-db", url = %settings.url, "database connected");
    Ok(db)
}

/// Apply every migration that has not been recorded yet, in the given order.
///
/// Returns the number of migrations applied by this call.
pub async fn migrate(
    db: &DatabaseConnection,
    migrations: &[(String, Migration)],
) -> anyhow::Result<usize> {
    db.execute_unprepared(MIGRATIONS_TABLE)
        .await
        .context("failed to create migrations table")?;

    let applied = applied_migrations(db).await?;
    let mut count = 0;

    for (module, migration) in migrations {
        if applied.contains(&(module.clone(), migration.id.to_string())) {
            tracing::debug!(target: "bookstore-db", %module, id = migration.id, "migration already applied");
            continue;
        }

        let txn = db.begin().await.context("failed to open migration transaction")?;
        txn.execute_unprepared(migration.up)
            .await
            .with_context(|| format!("migration {}/{} failed", module, migration.id))?;
        txn.execute(Statement::from_sql_and_values(
            db.get_database_backend(),
            "INSERT INTO _migrations (module, id, applied_at) VALUES (?, ?, CURRENT_TIMESTAMP)",
            [module.clone().into(), migration.id.into()],
        ))
        .await
        .with_context(|| format!("failed to record migration {}/{}", module, migration.id))?;
        txn.commit()
            .await
            .with_context(|| format!("failed to commit migration {}/{}", module, migration.id))?;

        tracing::info!(target: "bookstore-db", %module, id = migration.id, "migration applied");
        count += 1;
    }

    Ok(count)
}

async fn applied_migrations(db: &DatabaseConnection) -> anyhow::Result<HashSet<(String, String)>> {
    let rows = db
        .query_all(Statement::from_string(
            db.get_database_backend(),
            "SELECT module, id FROM _migrations".to_owned(),
        ))
        .await
        .context("failed to read applied migrations")?;

    rows.iter()
        .map(|row| {
            let module: String = row.try_get("", "module")?;
            let id: String = row.try_get("", "id")?;
            Ok((module, id))
        })
        .collect::<Result<_, sea_orm::DbErr>>()
        .context("malformed migrations table")
}
