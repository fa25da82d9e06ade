/// CRUD operations through the generic repository
pub mod crud_tests;


use sea_orm::DatabaseConnection;

/// Fresh in-memory database with migrations applied.
pub(crate) async fn setup_test_db() -> anyhow::Result<DatabaseConnection> {
    crate::db::connect_in_memory().await
}
