//! Business views returned by the services and the inputs they accept.

use serde::{Deserialize, Serialize};

use models::{artifact, hogwarts_user, wizard};

/// A wizard together with the artifacts it currently owns, ordered by artifact id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wizard {
    pub id: i32,
    pub name: String,
    pub artifacts: Vec<artifact::Model>,
}

impl Wizard {
    pub fn from_parts(model: wizard::Model, artifacts: Vec<artifact::Model>) -> Self {
        Self { id: model.id, name: model.name, artifacts }
    }

    pub fn number_of_artifacts(&self) -> usize { self.artifacts.len() }

    pub fn owns(&self, artifact_id: &str) -> bool {
        self.artifacts.iter().any(|a| a.id == artifact_id)
    }
}

/// The owning wizard as seen from one of its artifacts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnerSummary {
    pub id: i32,
    pub name: String,
    pub number_of_artifacts: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub owner: Option<OwnerSummary>,
}

impl Artifact {
    pub fn from_parts(model: artifact::Model, owner: Option<OwnerSummary>) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            image_url: model.image_url,
            owner,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewWizard {
    pub name: String,
}

/// Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WizardPatch {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewArtifact {
    pub name: String,
    pub description: String,
    pub image_url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArtifactPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub enabled: bool,
    pub roles: String,
}

/// There is no password field: passwords cannot change through an update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserPatch {
    pub username: Option<String>,
    pub enabled: Option<bool>,
    pub roles: Option<String>,
}

/// An account as exposed outside the store. The password hash never leaves the service layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub enabled: bool,
    pub roles: String,
}

impl From<hogwarts_user::Model> for User {
    fn from(m: hogwarts_user::Model) -> Self {
        Self { id: m.id, username: m.username, enabled: m.enabled, roles: m.roles }
    }
}
