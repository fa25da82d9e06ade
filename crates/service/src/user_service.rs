use sea_orm::{ActiveModelTrait, ConnectionTrait, DatabaseConnection, Set, TransactionTrait};
use tracing::{info, instrument};

use models::{hogwarts_user, repository};
use crate::{
    auth::password::hash_password,
    domain::{NewUser, User, UserPatch},
    errors::ServiceError,
};

/// Account management. Passwords are hashed on the way in and never returned.
#[derive(Clone)]
pub struct UserService {
    db: DatabaseConnection,
}

impl UserService {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }

    #[instrument(skip(self))]
    pub async fn find_by_id(&self, user_id: i32) -> Result<User, ServiceError> {
        let txn = self.db.begin().await?;
        let found = require_user(&txn, user_id).await?;
        txn.commit().await?;
        Ok(found.into())
    }

    /// All users ordered by id.
    #[instrument(skip(self))]
    pub async fn find_all(&self) -> Result<Vec<User>, ServiceError> {
        let txn = self.db.begin().await?;
        let rows = repository::list::<hogwarts_user::Entity, _>(&txn).await?;
        txn.commit().await?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    /// Create an account; `username` must not be taken.
    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn save(&self, input: NewUser) -> Result<User, ServiceError> {
        if input.password.is_empty() {
            return Err(ServiceError::Validation("password is required.".into()));
        }
        hogwarts_user::validate_username(&input.username)?;
        hogwarts_user::validate_roles(&input.roles)?;
        let hash = hash_password(&input.password).map_err(|e| ServiceError::Hash(e.to_string()))?;

        let txn = self.db.begin().await?;
        ensure_username_free(&txn, &input.username, None).await?;
        let created = hogwarts_user::create(&txn, &input.username, &hash, input.enabled, &input.roles).await?;
        txn.commit().await?;
        info!(user_id = created.id, "user_created");
        Ok(created.into())
    }

    /// Overwrite username, enabled flag and roles where present. The stored password is untouched.
    #[instrument(skip(self, patch))]
    pub async fn update(&self, user_id: i32, patch: UserPatch) -> Result<User, ServiceError> {
        let txn = self.db.begin().await?;
        let existing = require_user(&txn, user_id).await?;
        let mut am: hogwarts_user::ActiveModel = existing.clone().into();
        if let Some(username) = patch.username {
            hogwarts_user::validate_username(&username)?;
            if username != existing.username {
                ensure_username_free(&txn, &username, Some(user_id)).await?;
            }
            am.username = Set(username);
        }
        if let Some(enabled) = patch.enabled {
            am.enabled = Set(enabled);
        }
        if let Some(roles) = patch.roles {
            hogwarts_user::validate_roles(&roles)?;
            am.roles = Set(roles);
        }
        let saved = if am.is_changed() { repository::update(&txn, am).await? } else { existing };
        txn.commit().await?;
        info!(user_id, "user_updated");
        Ok(saved.into())
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, user_id: i32) -> Result<(), ServiceError> {
        let txn = self.db.begin().await?;
        require_user(&txn, user_id).await?;
        repository::delete::<hogwarts_user::Entity, _>(&txn, user_id).await?;
        txn.commit().await?;
        info!(user_id, "user_deleted");
        Ok(())
    }
}

async fn require_user<C: ConnectionTrait>(db: &C, user_id: i32) -> Result<hogwarts_user::Model, ServiceError> {
    repository::get::<hogwarts_user::Entity, _>(db, user_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("user", user_id))
}

async fn ensure_username_free<C: ConnectionTrait>(db: &C, username: &str, except: Option<i32>) -> Result<(), ServiceError> {
    match hogwarts_user::find_by_username(db, username).await? {
        Some(other) if Some(other.id) != except => {
            Err(ServiceError::Conflict(format!("username {username} is already taken.")))
        }
        _ => Ok(()),
    }
}
