use std::collections::HashMap;
use std::sync::Arc;

use sea_orm::{ActiveModelTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryOrder, Set, TransactionTrait};
use tracing::{info, instrument};

use models::{artifact, repository, wizard};
use crate::{
    domain::{Artifact, ArtifactPatch, NewArtifact, OwnerSummary},
    errors::ServiceError,
    id_worker::IdWorker,
};

/// Artifact CRUD. New artifacts get their id from the shared [`IdWorker`].
#[derive(Clone)]
pub struct ArtifactService {
    db: DatabaseConnection,
    id_worker: Arc<IdWorker>,
}

impl ArtifactService {
    pub fn new(db: DatabaseConnection, id_worker: Arc<IdWorker>) -> Self { Self { db, id_worker } }

    #[instrument(skip(self))]
    pub async fn find_by_id(&self, artifact_id: &str) -> Result<Artifact, ServiceError> {
        let txn = self.db.begin().await?;
        let (model, owner) = artifact::Entity::find_by_id(artifact_id.to_string())
            .find_also_related(wizard::Entity)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("artifact", artifact_id))?;
        let owner = match owner {
            Some(w) => {
                let count = artifact::count_owned_by(&txn, w.id).await?;
                Some(OwnerSummary { id: w.id, name: w.name, number_of_artifacts: count })
            }
            None => None,
        };
        txn.commit().await?;
        Ok(Artifact::from_parts(model, owner))
    }

    /// All artifacts ordered by id, each with its owner summary.
    #[instrument(skip(self))]
    pub async fn find_all(&self) -> Result<Vec<Artifact>, ServiceError> {
        let txn = self.db.begin().await?;
        let rows = artifact::Entity::find()
            .find_also_related(wizard::Entity)
            .order_by_asc(artifact::Column::Id)
            .all(&txn)
            .await?;
        let counts = owner_counts(&txn).await?;
        txn.commit().await?;
        Ok(rows
            .into_iter()
            .map(|(model, owner)| {
                let owner = owner.map(|w| OwnerSummary {
                    number_of_artifacts: counts.get(&w.id).copied().unwrap_or(0),
                    id: w.id,
                    name: w.name,
                });
                Artifact::from_parts(model, owner)
            })
            .collect())
    }

    /// Create an unowned artifact under a freshly generated id.
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn save(&self, input: NewArtifact) -> Result<Artifact, ServiceError> {
        let id = self.id_worker.next_id_string()?;
        let txn = self.db.begin().await?;
        let created = artifact::create(&txn, &id, &input.name, &input.description, &input.image_url, None).await?;
        txn.commit().await?;
        info!(artifact_id = %created.id, "artifact_created");
        Ok(Artifact::from_parts(created, None))
    }

    /// Overwrite the descriptive fields present in `patch`; id and owner stay as they are.
    #[instrument(skip(self, patch))]
    pub async fn update(&self, artifact_id: &str, patch: ArtifactPatch) -> Result<Artifact, ServiceError> {
        let txn = self.db.begin().await?;
        let existing = require_artifact(&txn, artifact_id).await?;
        let name = patch.name.unwrap_or_else(|| existing.name.clone());
        let description = patch.description.unwrap_or_else(|| existing.description.clone());
        let image_url = patch.image_url.unwrap_or_else(|| existing.image_url.clone());
        artifact::validate(&name, &description, &image_url)?;

        let mut am: artifact::ActiveModel = existing.clone().into();
        am.name = Set(name);
        am.description = Set(description);
        am.image_url = Set(image_url);
        let saved = if am.is_changed() { repository::update(&txn, am).await? } else { existing };
        let owner = match saved.owner_id {
            Some(owner_id) => owner_summary(&txn, owner_id).await?,
            None => None,
        };
        txn.commit().await?;
        info!(artifact_id, "artifact_updated");
        Ok(Artifact::from_parts(saved, owner))
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, artifact_id: &str) -> Result<(), ServiceError> {
        let txn = self.db.begin().await?;
        require_artifact(&txn, artifact_id).await?;
        repository::delete::<artifact::Entity, _>(&txn, artifact_id.to_string()).await?;
        txn.commit().await?;
        info!(artifact_id, "artifact_deleted");
        Ok(())
    }
}

async fn require_artifact<C: ConnectionTrait>(db: &C, artifact_id: &str) -> Result<artifact::Model, ServiceError> {
    repository::get::<artifact::Entity, _>(db, artifact_id.to_string())
        .await?
        .ok_or_else(|| ServiceError::not_found("artifact", artifact_id))
}

async fn owner_summary<C: ConnectionTrait>(db: &C, owner_id: i32) -> Result<Option<OwnerSummary>, ServiceError> {
    let Some(w) = repository::get::<wizard::Entity, _>(db, owner_id).await? else { return Ok(None) };
    let count = artifact::count_owned_by(db, w.id).await?;
    Ok(Some(OwnerSummary { id: w.id, name: w.name, number_of_artifacts: count }))
}

async fn owner_counts<C: ConnectionTrait>(db: &C) -> Result<HashMap<i32, u64>, ServiceError> {
    let mut counts = HashMap::new();
    for a in artifact::all_owned(db).await? {
        if let Some(owner) = a.owner_id {
            *counts.entry(owner).or_insert(0u64) += 1;
        }
    }
    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{get_db, seeded_db};

    fn svc(db: DatabaseConnection) -> ArtifactService { ArtifactService::new(db, Arc::new(IdWorker::default())) }

    #[tokio::test]
    async fn find_by_id_success() -> Result<(), anyhow::Error> {
        let s = svc(seeded_db().await?);
        let a = s.find_by_id("1250808601744904192").await?;
        assert_eq!(a.name, "Invisibility Cloak");
        assert_eq!(a.description, "An invisibility cloak is used to make the wearer invisible.");
        let owner = a.owner.expect("cloak has an owner");
        assert_eq!(owner.id, 2);
        assert_eq!(owner.name, "Harry Potter");
        assert_eq!(owner.number_of_artifacts, 2);
        Ok(())
    }

    #[tokio::test]
    async fn find_by_id_unowned_has_no_owner() -> Result<(), anyhow::Error> {
        let s = svc(seeded_db().await?);
        let a = s.find_by_id("1250808601744904196").await?;
        assert_eq!(a.name, "Resurrection Stone");
        assert!(a.owner.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn find_by_id_not_found() -> Result<(), anyhow::Error> {
        let s = svc(get_db().await?);
        let err = s.find_by_id("1250808601744904192").await.unwrap_err();
        assert_eq!(err.to_string(), "Could not find artifact with Id 1250808601744904192 :(");
        Ok(())
    }

    #[tokio::test]
    async fn find_all_success() -> Result<(), anyhow::Error> {
        let s = svc(seeded_db().await?);
        let all = s.find_all().await?;
        assert_eq!(all.len(), 6);
        assert_eq!(all[0].id, "1250808601744904191");
        assert_eq!(all[5].id, "1250808601744904196");
        let albus = all[0].owner.as_ref().unwrap();
        assert_eq!((albus.id, albus.number_of_artifacts), (1, 2));
        Ok(())
    }

    #[tokio::test]
    async fn save_generates_id_and_has_no_owner() -> Result<(), anyhow::Error> {
        let s = svc(get_db().await?);
        let saved = s
            .save(NewArtifact { name: "Artifact 3".into(), description: "Description...".into(), image_url: "ImageUrl...".into() })
            .await?;
        assert!(!saved.id.is_empty());
        assert!(saved.id.chars().all(|c| c.is_ascii_digit()));
        assert!(saved.owner.is_none());
        assert_eq!(s.find_by_id(&saved.id).await?.name, "Artifact 3");

        let second = s
            .save(NewArtifact { name: "Artifact 4".into(), description: "d".into(), image_url: "u".into() })
            .await?;
        assert_ne!(second.id, saved.id);
        Ok(())
    }

    #[tokio::test]
    async fn save_requires_all_fields() -> Result<(), anyhow::Error> {
        let s = svc(get_db().await?);
        let err = s
            .save(NewArtifact { name: "x".into(), description: "".into(), image_url: "u".into() })
            .await
            .unwrap_err();
        assert!(err.to_string().contains("description is required."));
        Ok(())
    }

    #[tokio::test]
    async fn update_keeps_id_and_owner() -> Result<(), anyhow::Error> {
        let s = svc(seeded_db().await?);
        let updated = s
            .update(
                "1250808601744904192",
                ArtifactPatch { description: Some("A new description.".into()), ..Default::default() },
            )
            .await?;
        assert_eq!(updated.id, "1250808601744904192");
        assert_eq!(updated.name, "Invisibility Cloak");
        assert_eq!(updated.description, "A new description.");
        assert_eq!(updated.owner.map(|o| o.id), Some(2));
        Ok(())
    }

    #[tokio::test]
    async fn update_not_found() -> Result<(), anyhow::Error> {
        let s = svc(get_db().await?);
        let err = s.update("nope", ArtifactPatch::default()).await.unwrap_err();
        assert_eq!(err.to_string(), "Could not find artifact with Id nope :(");
        Ok(())
    }

    #[tokio::test]
    async fn delete_success_and_not_found() -> Result<(), anyhow::Error> {
        let db = seeded_db().await?;
        let s = svc(db.clone());
        s.delete("1250808601744904191").await?;
        assert!(matches!(s.find_by_id("1250808601744904191").await, Err(ServiceError::NotFound { .. })));
        // the former owner simply has one artifact less
        assert_eq!(artifact::count_owned_by(&db, 1).await?, 1);

        let err = s.delete("1250808601744904191").await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { entity: "artifact", .. }));
        Ok(())
    }
}
