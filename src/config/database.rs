//! Database configuration module for `StockWatch`.
//!
//! Handles the `SQLite` connection and table creation using `SeaORM`.
//! Table creation uses `Schema::create_table_from_entity` so the database
//! schema is generated from the entity definitions without hand-written SQL.

use crate::entities::StockRecord;
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Gets the database URL from the environment or returns the default
/// local `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://data/stockwatch.sqlite".to_string())
}

/// Establishes a connection to the database at `database_url`.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    Database::connect(database_url).await.map_err(Into::into)
}

/// Creates all necessary database tables from the entity definitions.
/// Idempotent, so it can run at every startup.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut stock_record_table = schema.create_table_from_entity(StockRecord);
    stock_record_table.if_not_exists();
    db.execute(builder.build(&stock_record_table)).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::stock_record::Model as StockRecordModel;
    use sea_orm::{EntityTrait, QuerySelect};

    #[tokio::test]
    async fn test_create_connection_and_tables() -> Result<()> {
        // In-memory database avoids schema conflicts with any existing file
        let db = create_connection("sqlite::memory:").await?;
        create_tables(&db).await?;

        // A query against the created table verifies the schema exists
        let _: Vec<StockRecordModel> = StockRecord::find().limit(1).all(&db).await?;
        Ok(())
    }

    #[test]
    fn test_default_database_url() {
        // Only meaningful when DATABASE_URL is unset in the test environment
        if std::env::var("DATABASE_URL").is_err() {
            assert_eq!(get_database_url(), "sqlite://data/stockwatch.sqlite");
        }
    }
}
