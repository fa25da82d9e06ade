use sea_orm::DatabaseConnection;

use models::hogwarts_user;
use crate::auth::domain::Credentials;
use crate::auth::errors::AuthError;
use crate::auth::repository::AuthRepository;

pub struct SeaOrmAuthRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmAuthRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

#[async_trait::async_trait]
impl AuthRepository for SeaOrmAuthRepository {
    async fn find_credentials(&self, username: &str) -> Result<Option<Credentials>, AuthError> {
        let res = hogwarts_user::find_by_username(&self.db, username)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(res.map(|u| {
            let password_hash = u.password.clone();
            Credentials { user: u.into(), password_hash }
        }))
    }
}
