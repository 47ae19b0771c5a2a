#![cfg(test)]
use sea_orm::DatabaseConnection;
use migration::MigratorTrait;

/// Fresh, fully migrated in-memory database for the current test.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    let db = models::db::connect_in_memory().await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}
