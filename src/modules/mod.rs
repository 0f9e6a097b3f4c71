pub mod orders;
pub mod products;

use bookstore_kernel::ModuleRegistry;
use sea_orm::DatabaseConnection;

/// Register all application modules with the registry.
///
/// Products come first: orders read from the books table.
pub fn register_all(registry: &mut ModuleRegistry, db: &DatabaseConnection) {
    registry.register(products::create_module(db.clone()));
    registry.register(orders::create_module(db.clone()));
}

#[cfg(test)]
pub(crate) mod testing {
    use std::path::Path;

    use bookstore_kernel::settings::DatabaseSettings;
    use bookstore_kernel::ModuleRegistry;
    use sea_orm::DatabaseConnection;

    /// Fresh in-memory database with every module's schema applied.
    pub async fn setup_db() -> DatabaseConnection {
        migrated(&DatabaseSettings::in_memory()).await
    }

    /// File database in `dir` behind a multi-connection pool, for tests
    /// where transactions have to overlap.
    pub async fn setup_file_db(dir: &Path) -> DatabaseConnection {
        let settings = DatabaseSettings {
            url: format!("sqlite://{}?mode=rwc", dir.join("bookstore.db").display()),
            max_connections: 5,
            sql_logging: false,
        };
        migrated(&settings).await
    }

    async fn migrated(settings: &DatabaseSettings) -> DatabaseConnection {
        let db = bookstore_db::connect(settings).await.unwrap();

        let mut registry = ModuleRegistry::new();
        super::register_all(&mut registry, &db);
        bookstore_db::migrate(&db, &registry.collect_migrations())
            .await
            .unwrap();

        db
    }
}
