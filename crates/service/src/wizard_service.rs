use std::collections::HashMap;

use sea_orm::{ActiveModelTrait, ConnectionTrait, DatabaseConnection, Set, TransactionTrait};
use tracing::{debug, info, instrument};

use models::{artifact, repository, wizard};
use crate::{
    domain::{NewWizard, Wizard, WizardPatch},
    errors::ServiceError,
};

/// Wizard lifecycle and artifact ownership transfer.
///
/// Every method runs in its own transaction; an error drops the transaction
/// and nothing it wrote becomes visible.
#[derive(Clone)]
pub struct WizardService {
    db: DatabaseConnection,
}

impl WizardService {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }

    /// Get a wizard by id with its artifacts.
    #[instrument(skip(self))]
    pub async fn find_by_id(&self, wizard_id: i32) -> Result<Wizard, ServiceError> {
        let txn = self.db.begin().await?;
        let model = require_wizard(&txn, wizard_id).await?;
        let found = with_artifacts(&txn, model).await?;
        txn.commit().await?;
        Ok(found)
    }

    /// All wizards ordered by id.
    #[instrument(skip(self))]
    pub async fn find_all(&self) -> Result<Vec<Wizard>, ServiceError> {
        let txn = self.db.begin().await?;
        let wizards = repository::list::<wizard::Entity, _>(&txn).await?;
        let mut by_owner: HashMap<i32, Vec<artifact::Model>> = HashMap::new();
        for a in artifact::all_owned(&txn).await? {
            if let Some(owner) = a.owner_id {
                by_owner.entry(owner).or_default().push(a);
            }
        }
        txn.commit().await?;
        Ok(wizards
            .into_iter()
            .map(|w| {
                let owned = by_owner.remove(&w.id).unwrap_or_default();
                Wizard::from_parts(w, owned)
            })
            .collect())
    }

    /// Create a wizard; the id is assigned by the store.
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn save(&self, input: NewWizard) -> Result<Wizard, ServiceError> {
        let txn = self.db.begin().await?;
        let created = wizard::create(&txn, &input.name).await?;
        txn.commit().await?;
        info!(wizard_id = created.id, "wizard_created");
        Ok(Wizard::from_parts(created, Vec::new()))
    }

    /// Overwrite the fields present in `patch`. Only the name is mutable.
    #[instrument(skip(self, patch))]
    pub async fn update(&self, wizard_id: i32, patch: WizardPatch) -> Result<Wizard, ServiceError> {
        let txn = self.db.begin().await?;
        let existing = require_wizard(&txn, wizard_id).await?;
        let mut am: wizard::ActiveModel = existing.clone().into();
        if let Some(name) = patch.name {
            wizard::validate_name(&name)?;
            am.name = Set(name);
        }
        let saved = if am.is_changed() { repository::update(&txn, am).await? } else { existing };
        let updated = with_artifacts(&txn, saved).await?;
        txn.commit().await?;
        info!(wizard_id, "wizard_updated");
        Ok(updated)
    }

    /// Detach every owned artifact, then remove the wizard.
    #[instrument(skip(self))]
    pub async fn delete(&self, wizard_id: i32) -> Result<(), ServiceError> {
        let txn = self.db.begin().await?;
        require_wizard(&txn, wizard_id).await?;
        let detached = artifact::detach_all(&txn, wizard_id).await?;
        repository::delete::<wizard::Entity, _>(&txn, wizard_id).await?;
        txn.commit().await?;
        info!(wizard_id, detached, "wizard_deleted");
        Ok(())
    }

    /// Move `artifact_id` to `wizard_id`.
    ///
    /// The artifact is looked up before the wizard, so when both ids are
    /// unknown the error names the artifact. A current owner (the target
    /// included) loses the artifact before the target gains it.
    #[instrument(skip(self))]
    pub async fn assign_artifact(&self, wizard_id: i32, artifact_id: &str) -> Result<(), ServiceError> {
        let txn = self.db.begin().await?;
        let found = repository::get::<artifact::Entity, _>(&txn, artifact_id.to_string())
            .await?
            .ok_or_else(|| ServiceError::not_found("artifact", artifact_id))?;
        let target = require_wizard(&txn, wizard_id).await?;

        let detached = match found.owner_id {
            Some(previous_owner) => {
                debug!(previous_owner, "removing artifact from previous owner");
                artifact::set_owner(&txn, found, None).await?
            }
            None => found,
        };
        artifact::set_owner(&txn, detached, Some(target.id)).await?;
        txn.commit().await?;
        info!(wizard_id, artifact_id, "artifact_assigned");
        Ok(())
    }
}

async fn require_wizard<C: ConnectionTrait>(db: &C, wizard_id: i32) -> Result<wizard::Model, ServiceError> {
    repository::get::<wizard::Entity, _>(db, wizard_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("wizard", wizard_id))
}

async fn with_artifacts<C: ConnectionTrait>(db: &C, model: wizard::Model) -> Result<Wizard, ServiceError> {
    let owned = artifact::owned_by(db, model.id).await?;
    Ok(Wizard::from_parts(model, owned))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{get_db, seeded_db};

    const CLOAK: &str = "1250808601744904192";

    async fn artifact_owner(db: &DatabaseConnection, id: &str) -> Option<i32> {
        repository::get::<artifact::Entity, _>(db, id.to_string()).await.unwrap().unwrap().owner_id
    }

    #[tokio::test]
    async fn find_by_id_success() -> Result<(), anyhow::Error> {
        let db = seeded_db().await?;
        let svc = WizardService::new(db);

        let w = svc.find_by_id(1).await?;
        assert_eq!(w.id, 1);
        assert_eq!(w.name, "Albus Dumbledore");
        assert_eq!(w.number_of_artifacts(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn find_by_id_not_found() -> Result<(), anyhow::Error> {
        let svc = WizardService::new(get_db().await?);
        let err = svc.find_by_id(1).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { entity: "wizard", .. }));
        assert_eq!(err.to_string(), "Could not find wizard with Id 1 :(");
        Ok(())
    }

    #[tokio::test]
    async fn find_all_success() -> Result<(), anyhow::Error> {
        let svc = WizardService::new(seeded_db().await?);
        let all = svc.find_all().await?;
        let names: Vec<&str> = all.iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names, vec!["Albus Dumbledore", "Harry Potter", "Neville Longbottom"]);
        let counts: Vec<usize> = all.iter().map(Wizard::number_of_artifacts).collect();
        assert_eq!(counts, vec![2, 2, 1]);
        Ok(())
    }

    #[tokio::test]
    async fn save_success() -> Result<(), anyhow::Error> {
        let svc = WizardService::new(get_db().await?);
        let saved = svc.save(NewWizard { name: "Hermione Granger".into() }).await?;
        assert!(saved.id > 0);
        assert_eq!(saved.name, "Hermione Granger");
        assert!(saved.artifacts.is_empty());
        assert_eq!(svc.find_by_id(saved.id).await?.name, "Hermione Granger");
        Ok(())
    }

    #[tokio::test]
    async fn save_rejects_blank_name() -> Result<(), anyhow::Error> {
        let svc = WizardService::new(get_db().await?);
        let err = svc.save(NewWizard { name: "".into() }).await.unwrap_err();
        assert!(matches!(err, ServiceError::Model(models::errors::ModelError::Validation(_))));
        Ok(())
    }

    #[tokio::test]
    async fn update_success_changes_only_name() -> Result<(), anyhow::Error> {
        let svc = WizardService::new(seeded_db().await?);
        let before = svc.find_by_id(1).await?;

        let updated = svc.update(1, WizardPatch { name: Some("Albus Dumbledore - update".into()) }).await?;
        assert_eq!(updated.id, 1);
        assert_eq!(updated.name, "Albus Dumbledore - update");
        assert_eq!(updated.artifacts, before.artifacts);
        Ok(())
    }

    #[tokio::test]
    async fn update_with_empty_patch_keeps_everything() -> Result<(), anyhow::Error> {
        let svc = WizardService::new(seeded_db().await?);
        let before = svc.find_by_id(2).await?;
        let after = svc.update(2, WizardPatch::default()).await?;
        assert_eq!(after, before);
        Ok(())
    }

    #[tokio::test]
    async fn update_not_found() -> Result<(), anyhow::Error> {
        let svc = WizardService::new(get_db().await?);
        let err = svc.update(1, WizardPatch { name: Some("x".into()) }).await.unwrap_err();
        assert_eq!(err.to_string(), "Could not find wizard with Id 1 :(");
        Ok(())
    }

    #[tokio::test]
    async fn delete_success_detaches_artifacts() -> Result<(), anyhow::Error> {
        let db = seeded_db().await?;
        let svc = WizardService::new(db.clone());
        let owned: Vec<String> = svc.find_by_id(1).await?.artifacts.into_iter().map(|a| a.id).collect();
        assert!(!owned.is_empty());

        svc.delete(1).await?;

        assert!(matches!(svc.find_by_id(1).await, Err(ServiceError::NotFound { .. })));
        for id in &owned {
            assert_eq!(artifact_owner(&db, id).await, None, "artifact {id} still owned");
            // the artifact itself survives
            assert!(repository::get::<artifact::Entity, _>(&db, id.clone()).await?.is_some());
        }
        Ok(())
    }

    #[tokio::test]
    async fn delete_not_found() -> Result<(), anyhow::Error> {
        let svc = WizardService::new(get_db().await?);
        let err = svc.delete(1).await.unwrap_err();
        assert_eq!(err.to_string(), "Could not find wizard with Id 1 :(");
        Ok(())
    }

    #[tokio::test]
    async fn assign_artifact_success() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        wizard::create(&db, "Albus Dumbledore").await?;
        let w2 = wizard::create(&db, "Harry Potter").await?;
        let w3 = wizard::create(&db, "Neville Longbottom").await?;
        artifact::create(&db, CLOAK, "Invisibility Cloak", "An invisibility cloak is used to make the wearer invisible.", "ImageUrl", Some(w2.id)).await?;
        let svc = WizardService::new(db.clone());

        assert_eq!((w2.id, w3.id), (2, 3));
        assert_eq!(svc.find_by_id(3).await?.number_of_artifacts(), 0);

        svc.assign_artifact(3, CLOAK).await?;

        assert_eq!(artifact_owner(&db, CLOAK).await, Some(w3.id));
        assert!(svc.find_by_id(w3.id).await?.owns(CLOAK));
        assert!(!svc.find_by_id(w2.id).await?.owns(CLOAK));
        Ok(())
    }

    #[tokio::test]
    async fn assign_unowned_artifact() -> Result<(), anyhow::Error> {
        let db = seeded_db().await?;
        let svc = WizardService::new(db.clone());
        // Resurrection Stone starts without an owner
        svc.assign_artifact(3, "1250808601744904196").await?;
        assert_eq!(artifact_owner(&db, "1250808601744904196").await, Some(3));
        assert_eq!(svc.find_by_id(3).await?.number_of_artifacts(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn reassign_to_same_wizard_is_harmless() -> Result<(), anyhow::Error> {
        let db = seeded_db().await?;
        let svc = WizardService::new(db.clone());
        svc.assign_artifact(2, CLOAK).await?;
        let w2 = svc.find_by_id(2).await?;
        assert_eq!(w2.artifacts.iter().filter(|a| a.id == CLOAK).count(), 1);
        assert_eq!(w2.number_of_artifacts(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn assign_artifact_error_with_non_existent_wizard_id() -> Result<(), anyhow::Error> {
        let db = seeded_db().await?;
        let svc = WizardService::new(db.clone());

        let err = svc.assign_artifact(99, CLOAK).await.unwrap_err();
        assert_eq!(err.to_string(), "Could not find wizard with Id 99 :(");
        assert_eq!(artifact_owner(&db, CLOAK).await, Some(2));
        Ok(())
    }

    #[tokio::test]
    async fn assign_artifact_error_with_non_existent_artifact_id() -> Result<(), anyhow::Error> {
        let db = seeded_db().await?;
        let svc = WizardService::new(db.clone());
        let before = svc.find_all().await?;

        let err = svc.assign_artifact(3, "1250808601744904199").await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { entity: "artifact", .. }));
        assert_eq!(err.to_string(), "Could not find artifact with Id 1250808601744904199 :(");
        assert_eq!(svc.find_all().await?, before);
        Ok(())
    }

    #[tokio::test]
    async fn artifact_is_checked_before_wizard() -> Result<(), anyhow::Error> {
        let svc = WizardService::new(get_db().await?);
        let err = svc.assign_artifact(42, "missing").await.unwrap_err();
        assert_eq!(err.to_string(), "Could not find artifact with Id missing :(");
        Ok(())
    }
}
