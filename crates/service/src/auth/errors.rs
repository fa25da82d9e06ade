use thiserror::Error;

/// Business errors for auth workflows
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("username or password is incorrect.")]
    BadCredentials,
    #[error("User account is abnormal.")]
    Disabled,
    #[error("The access token provided is expired, revoked, malformed, or invalid for other reasons.")]
    InvalidToken,
    #[error("hashing error: {0}")]
    HashError(String),
    #[error("token error: {0}")]
    TokenError(String),
    #[error("repository error: {0}")]
    Repository(String),
}

impl AuthError {
    /// Envelope code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            AuthError::BadCredentials | AuthError::Disabled | AuthError::InvalidToken => 401,
            AuthError::HashError(_) | AuthError::TokenError(_) | AuthError::Repository(_) => 500,
        }
    }
}
