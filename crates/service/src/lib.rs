//! Service layer providing the business operations on top of models.
//! - Each public operation is one transaction.
//! - Reuses validation and entity definitions in `models` crate.
//! - Lookup failures surface as [`errors::ServiceError::NotFound`] naming the entity and id.

pub mod errors;
pub mod domain;
pub mod id_worker;
pub mod wizard_service;
pub mod artifact_service;
pub mod user_service;
pub mod auth;
pub mod seed;
#[cfg(test)]
pub mod test_support;

pub use artifact_service::ArtifactService;
pub use user_service::UserService;
pub use wizard_service::WizardService;
