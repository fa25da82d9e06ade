use async_trait::async_trait;

use super::domain::Credentials;
use super::errors::AuthError;

/// Repository abstraction for auth-related persistence.
#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn find_credentials(&self, username: &str) -> Result<Option<Credentials>, AuthError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use crate::{auth::password::hash_password, domain::User};

    #[derive(Default)]
    pub struct MockAuthRepository {
        users: Mutex<HashMap<String, Credentials>>, // key: username
    }

    impl MockAuthRepository {
        /// Store an account, hashing `password` the same way the real store does.
        pub fn insert(&self, username: &str, password: &str, enabled: bool, roles: &str) -> Result<User, AuthError> {
            let mut users = self.users.lock().map_err(|e| AuthError::Repository(e.to_string()))?;
            let user = User {
                id: users.len() as i32 + 1,
                username: username.to_string(),
                enabled,
                roles: roles.to_string(),
            };
            let password_hash = hash_password(password)?;
            users.insert(username.to_string(), Credentials { user: user.clone(), password_hash });
            Ok(user)
        }
    }

    #[async_trait]
    impl AuthRepository for MockAuthRepository {
        async fn find_credentials(&self, username: &str) -> Result<Option<Credentials>, AuthError> {
            let users = self.users.lock().map_err(|e| AuthError::Repository(e.to_string()))?;
            Ok(users.get(username).cloned())
        }
    }
}
