#![cfg(test)]
use sea_orm::DatabaseConnection;

use crate::seed::seed_demo_data;

/// Private, migrated in-memory database per test.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    models::db::connect_in_memory().await
}

/// [`get_db`] plus the demo data: wizards 1..=3, six artifacts, three users.
pub async fn seeded_db() -> Result<DatabaseConnection, anyhow::Error> {
    let db = get_db().await?;
    seed_demo_data(&db).await?;
    Ok(db)
}
