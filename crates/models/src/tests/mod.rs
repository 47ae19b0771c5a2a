use sea_orm::DatabaseConnection;
use migration::MigratorTrait;

/// Decision upsert, listing, matching and mark-viewed queries
pub mod decision_tests;


/// Fresh in-memory database with the full schema applied.
pub(crate) async fn setup_test_db() -> anyhow::Result<DatabaseConnection> {
    let db = crate::db::connect_in_memory().await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

pub(crate) fn skip_db_tests() -> bool {
    std::env::var("SKIP_DB_TESTS").is_ok()
}
