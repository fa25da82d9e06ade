use std::fmt::Display;

use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// A lookup by primary key returned nothing.
    #[error("Could not find {entity} with Id {id} :(")]
    NotFound { entity: &'static str, id: String },
    #[error("validation error: {0}")]
    Validation(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("database error: {0}")]
    Db(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
    #[error("hashing error: {0}")]
    Hash(String),
    #[error("id generation error: {0}")]
    IdGeneration(String),
}

impl ServiceError {
    pub fn not_found(entity: &'static str, id: impl Display) -> Self {
        Self::NotFound { entity, id: id.to_string() }
    }
}

impl From<DbErr> for ServiceError {
    fn from(e: DbErr) -> Self { ServiceError::Db(e.to_string()) }
}

#[cfg(test)]
mod tests {
    use super::ServiceError;

    #[test]
    fn not_found_message_names_entity_and_id() {
        assert_eq!(ServiceError::not_found("wizard", 1).to_string(), "Could not find wizard with Id 1 :(");
        assert_eq!(
            ServiceError::not_found("artifact", "1250808601744904192").to_string(),
            "Could not find artifact with Id 1250808601744904192 :("
        );
    }
}
