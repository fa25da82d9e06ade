use std::sync::Arc;

use sea_orm::DatabaseConnection;
use service::{
    auth::{repo::SeaOrmAuthRepository, service::AuthConfig, AuthService},
    id_worker::IdWorker,
    ArtifactService, UserService, WizardService,
};

/// Shared handler state; cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub wizards: WizardService,
    pub artifacts: ArtifactService,
    pub users: UserService,
    pub auth: Arc<AuthService<SeaOrmAuthRepository>>,
    /// Require a bearer token outside the public routes.
    pub enforce_auth: bool,
    pub base_url: String,
}

impl AppState {
    pub fn new(db: DatabaseConnection, api: &configs::ApiConfig, auth: &configs::AuthConfig) -> Self {
        let auth_service = AuthService::new(
            Arc::new(SeaOrmAuthRepository::new(db.clone())),
            AuthConfig { jwt_secret: auth.jwt_secret.clone(), token_ttl_hours: auth.token_ttl_hours },
        );
        Self {
            wizards: WizardService::new(db.clone()),
            artifacts: ArtifactService::new(db.clone(), Arc::new(IdWorker::default())),
            users: UserService::new(db),
            auth: Arc::new(auth_service),
            enforce_auth: auth.enforce,
            base_url: api.base_url.clone(),
        }
    }
}
