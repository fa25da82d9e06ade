//! Demo data for a fresh store.

use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait, TransactionTrait};
use tracing::{info, instrument};

use models::{artifact, hogwarts_user, wizard};
use crate::{auth::password::hash_password, errors::ServiceError};

struct SeedArtifact {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    /// index into `WIZARDS`
    owner: Option<usize>,
}

const WIZARDS: [&str; 3] = ["Albus Dumbledore", "Harry Potter", "Neville Longbottom"];

const ARTIFACTS: [SeedArtifact; 6] = [
    SeedArtifact {
        id: "1250808601744904191",
        name: "Deluminator",
        description: "A Deluminator is a device invented by Albus Dumbledore that resembles a cigarette lighter. It is used to remove or absorb (as well as return) the light from any light source to provide cover to the user.",
        owner: Some(0),
    },
    SeedArtifact {
        id: "1250808601744904192",
        name: "Invisibility Cloak",
        description: "An invisibility cloak is used to make the wearer invisible.",
        owner: Some(1),
    },
    SeedArtifact {
        id: "1250808601744904193",
        name: "Elder Wand",
        description: "The Elder Wand, known throughout history as the Deathstick or the Wand of Destiny, is an extremely powerful wand made of elder wood with a core of Thestral tail hair.",
        owner: Some(0),
    },
    SeedArtifact {
        id: "1250808601744904194",
        name: "The Marauder's Map",
        description: "A magical map of Hogwarts created by Remus Lupin, Peter Pettigrew, Sirius Black, and James Potter while they were students at Hogwarts.",
        owner: Some(1),
    },
    SeedArtifact {
        id: "1250808601744904195",
        name: "The Sword Of Gryffindor",
        description: "A goblin-made sword adorned with large rubies on the pommel. It was once owned by Godric Gryffindor, one of the medieval founders of Hogwarts.",
        owner: Some(2),
    },
    SeedArtifact {
        id: "1250808601744904196",
        name: "Resurrection Stone",
        description: "The Resurrection Stone allows the holder to bring back deceased loved ones, in a semi-physical form, and communicate with them.",
        owner: None,
    },
];

// (username, password, enabled, roles)
const USERS: [(&str, &str, bool, &str); 3] = [
    ("john", "123456", true, "admin user"),
    ("eric", "654321", true, "user"),
    ("tom", "qwerty", false, "user"),
];

/// Insert the demo wizards, artifacts and users unless any wizard exists.
/// Returns `true` when data was written.
#[instrument(skip(db))]
pub async fn seed_demo_data(db: &DatabaseConnection) -> Result<bool, ServiceError> {
    let txn = db.begin().await?;
    if wizard::Entity::find().count(&txn).await? > 0 {
        info!("store already populated, skipping seed");
        return Ok(false);
    }

    let mut wizard_ids = Vec::with_capacity(WIZARDS.len());
    for name in WIZARDS {
        wizard_ids.push(wizard::create(&txn, name).await?.id);
    }
    for a in &ARTIFACTS {
        let owner = a.owner.map(|idx| wizard_ids[idx]);
        artifact::create(&txn, a.id, a.name, a.description, "ImageUrl", owner).await?;
    }
    for (username, password, enabled, roles) in USERS {
        let hash = hash_password(password).map_err(|e| ServiceError::Hash(e.to_string()))?;
        hogwarts_user::create(&txn, username, &hash, enabled, roles).await?;
    }
    txn.commit().await?;
    info!(wizards = WIZARDS.len(), artifacts = ARTIFACTS.len(), users = USERS.len(), "demo data seeded");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;
    use models::repository;

    #[tokio::test]
    async fn seeds_once() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        assert!(seed_demo_data(&db).await?);
        assert!(!seed_demo_data(&db).await?);

        assert_eq!(repository::list::<wizard::Entity, _>(&db).await?.len(), 3);
        assert_eq!(repository::list::<artifact::Entity, _>(&db).await?.len(), 6);
        assert_eq!(repository::list::<hogwarts_user::Entity, _>(&db).await?.len(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn ownership_layout() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        seed_demo_data(&db).await?;
        assert_eq!(artifact::count_owned_by(&db, 1).await?, 2);
        assert_eq!(artifact::count_owned_by(&db, 2).await?, 2);
        assert_eq!(artifact::count_owned_by(&db, 3).await?, 1);
        let stone = repository::get::<artifact::Entity, _>(&db, "1250808601744904196".to_string()).await?.unwrap();
        assert_eq!(stone.owner_id, None);
        Ok(())
    }
}
