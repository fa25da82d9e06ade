use crate::{artifact, hogwarts_user, repository, wizard};
use anyhow::Result;
use sea_orm::{ActiveModelTrait, Set};

use super::setup_test_db;

/// Test wizard CRUD operations
#[tokio::test]
async fn test_wizard_crud() -> Result<()> {
    let db = setup_test_db().await?;

    // Create
    let created = wizard::create(&db, "Albus Dumbledore").await?;
    assert!(created.id > 0);
    assert_eq!(created.name, "Albus Dumbledore");

    // Read
    let found = repository::get::<wizard::Entity, _>(&db, created.id).await?;
    assert_eq!(found.as_ref().map(|w| w.name.as_str()), Some("Albus Dumbledore"));

    // Update
    let mut am: wizard::ActiveModel = created.clone().into();
    am.name = Set("Albus Dumbledore - update".into());
    let updated = repository::update(&db, am).await?;
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.name, "Albus Dumbledore - update");

    // Delete
    assert!(repository::delete::<wizard::Entity, _>(&db, created.id).await?);
    assert!(repository::get::<wizard::Entity, _>(&db, created.id).await?.is_none());
    // Deleting twice reports nothing removed
    assert!(!repository::delete::<wizard::Entity, _>(&db, created.id).await?);
    Ok(())
}

#[tokio::test]
async fn test_wizard_validation() -> Result<()> {
    let db = setup_test_db().await?;
    let err = wizard::create(&db, "   ").await.unwrap_err();
    assert!(matches!(err, crate::errors::ModelError::Validation(_)));
    Ok(())
}

/// Test artifact CRUD operations with caller supplied ids
#[tokio::test]
async fn test_artifact_crud() -> Result<()> {
    let db = setup_test_db().await?;

    let created = artifact::create(
        &db,
        "1250808601744904191",
        "Deluminator",
        "A Deluminator is a device invented by Albus Dumbledore.",
        "ImageUrl",
        None,
    )
    .await?;
    assert_eq!(created.id, "1250808601744904191");
    assert!(created.owner_id.is_none());

    let found = repository::get::<artifact::Entity, _>(&db, "1250808601744904191".to_string()).await?;
    assert!(found.is_some());

    let missing = repository::get::<artifact::Entity, _>(&db, "nope".to_string()).await?;
    assert!(missing.is_none());

    assert!(repository::delete::<artifact::Entity, _>(&db, created.id.clone()).await?);
    Ok(())
}

#[tokio::test]
async fn test_artifact_validation() -> Result<()> {
    let db = setup_test_db().await?;
    let err = artifact::create(&db, "1", "Cloak", "", "ImageUrl", None).await.unwrap_err();
    assert_eq!(err.to_string(), "validation error: description is required.");
    Ok(())
}

#[tokio::test]
async fn test_list_is_ordered_by_primary_key() -> Result<()> {
    let db = setup_test_db().await?;
    for id in ["30", "10", "20"] {
        artifact::create(&db, id, "n", "d", "i", None).await?;
    }
    let ids: Vec<String> = repository::list::<artifact::Entity, _>(&db).await?.into_iter().map(|a| a.id).collect();
    assert_eq!(ids, vec!["10", "20", "30"]);
    Ok(())
}

/// Test user CRUD operations
#[tokio::test]
async fn test_user_crud() -> Result<()> {
    let db = setup_test_db().await?;

    let created = hogwarts_user::create(&db, "john", "$argon2id$fake", true, "admin user").await?;
    assert_eq!(created.username, "john");

    let by_name = hogwarts_user::find_by_username(&db, "john").await?;
    assert_eq!(by_name.map(|u| u.id), Some(created.id));

    // Username is unique
    let dup = hogwarts_user::create(&db, "john", "$argon2id$other", true, "user").await;
    assert!(matches!(dup, Err(crate::errors::ModelError::Db(_))));

    let mut am: hogwarts_user::ActiveModel = created.into();
    am.enabled = Set(false);
    let updated = am.update(&db).await?;
    assert!(!updated.enabled);
    assert_eq!(updated.password, "$argon2id$fake");
    Ok(())
}

/// Raw inserts go through the same primitive the entity helpers use
#[tokio::test]
async fn test_repository_insert() -> Result<()> {
    let db = setup_test_db().await?;

    let am = wizard::ActiveModel { name: Set("Neville Longbottom".into()), ..Default::default() };
    let inserted = repository::insert(&db, am).await?;
    assert!(inserted.id > 0);

    let listed = repository::list::<wizard::Entity, _>(&db).await?;
    assert_eq!(listed, vec![inserted]);
    Ok(())
}
