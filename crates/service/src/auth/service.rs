use std::sync::Arc;

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header as JwtHeader, Validation};
use tracing::{debug, info, instrument, warn};

use super::domain::{AuthSession, Claims, LoginInput};
use super::errors::AuthError;
use super::password::verify_password;
use super::repository::AuthRepository;

/// Auth service configuration
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
}

impl Default for AuthConfig {
    fn default() -> Self { Self { jwt_secret: "dev-secret-change-me".into(), token_ttl_hours: 2 } }
}

/// Auth business service independent of web framework
pub struct AuthService<R: AuthRepository> {
    repo: Arc<R>,
    cfg: AuthConfig,
}

impl<R: AuthRepository> AuthService<R> {
    pub fn new(repo: Arc<R>, cfg: AuthConfig) -> Self { Self { repo, cfg } }

    /// Authenticate a user and issue a token.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository};
    /// use service::auth::domain::LoginInput;
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// repo.insert("john", "123456", true, "admin user").unwrap();
    /// let svc = AuthService::new(repo, AuthConfig { jwt_secret: "secret".into(), token_ttl_hours: 2 });
    /// let session = tokio_test::block_on(svc.login(LoginInput { username: "john".into(), password: "123456".into() })).unwrap();
    /// assert_eq!(session.user.username, "john");
    /// assert!(!session.token.is_empty());
    /// ```
    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let cred = self.repo
            .find_credentials(&input.username)
            .await?
            .ok_or(AuthError::BadCredentials)?;

        if !verify_password(&input.password, &cred.password_hash)? {
            debug!("password mismatch");
            return Err(AuthError::BadCredentials);
        }
        if !cred.user.enabled {
            warn!(user_id = cred.user.id, "login attempt on disabled account");
            return Err(AuthError::Disabled);
        }

        let now = chrono::Utc::now();
        let claims = Claims {
            sub: cred.user.username.clone(),
            uid: cred.user.id,
            roles: cred.user.roles.clone(),
            iat: now.timestamp(),
            exp: (now + chrono::Duration::hours(self.cfg.token_ttl_hours)).timestamp(),
        };
        let token = encode(&JwtHeader::default(), &claims, &EncodingKey::from_secret(self.cfg.jwt_secret.as_bytes()))
            .map_err(|e| AuthError::TokenError(e.to_string()))?;

        info!(user_id = cred.user.id, "user_logged_in");
        Ok(AuthSession { user: cred.user, token })
    }

    /// Check signature and expiry of a bearer token and return its claims.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository};
    /// use service::auth::domain::LoginInput;
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// repo.insert("eric", "654321", true, "user").unwrap();
    /// let svc = AuthService::new(repo, AuthConfig::default());
    /// let session = tokio_test::block_on(svc.login(LoginInput { username: "eric".into(), password: "654321".into() })).unwrap();
    /// let claims = svc.verify(&session.token).unwrap();
    /// assert_eq!(claims.sub, "eric");
    /// assert!(svc.verify("not.a.token").is_err());
    /// ```
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.cfg.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| {
            debug!(error = %e, "token rejected");
            AuthError::InvalidToken
        })?;
        Ok(data.claims)
    }
}
