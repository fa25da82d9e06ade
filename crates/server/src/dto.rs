//! Wire shapes of the REST API (camelCase JSON) and their conversions from service views.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use service::domain::{
    Artifact, ArtifactPatch, NewArtifact, NewUser, NewWizard, OwnerSummary, User, UserPatch, Wizard, WizardPatch,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WizardDto {
    pub id: i32,
    pub name: String,
    pub number_of_artifacts: u64,
}

impl From<&Wizard> for WizardDto {
    fn from(w: &Wizard) -> Self {
        Self { id: w.id, name: w.name.clone(), number_of_artifacts: w.number_of_artifacts() as u64 }
    }
}

impl From<OwnerSummary> for WizardDto {
    fn from(o: OwnerSummary) -> Self { Self { id: o.id, name: o.name, number_of_artifacts: o.number_of_artifacts } }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactDto {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub owner: Option<WizardDto>,
}

impl From<Artifact> for ArtifactDto {
    fn from(a: Artifact) -> Self {
        Self {
            id: a.id,
            name: a.name,
            description: a.description,
            image_url: a.image_url,
            owner: a.owner.map(WizardDto::from),
        }
    }
}

/// Never carries the password.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    pub id: i32,
    pub username: String,
    pub enabled: bool,
    pub roles: String,
}

impl From<User> for UserDto {
    fn from(u: User) -> Self { Self { id: u.id, username: u.username, enabled: u.enabled, roles: u.roles } }
}

/// Rejects empty and whitespace-only text.
fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Body of `POST`/`PUT` on wizards. `id` and `numberOfArtifacts` are accepted and ignored.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WizardRequest {
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "name is required."))]
    pub name: String,
}

impl From<WizardRequest> for NewWizard {
    fn from(r: WizardRequest) -> Self { NewWizard { name: r.name } }
}

impl From<WizardRequest> for WizardPatch {
    fn from(r: WizardRequest) -> Self { WizardPatch { name: Some(r.name) } }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactRequest {
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "name is required."))]
    pub name: String,
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "description is required."))]
    pub description: String,
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "imageUrl is required."))]
    pub image_url: String,
}

impl From<ArtifactRequest> for NewArtifact {
    fn from(r: ArtifactRequest) -> Self {
        NewArtifact { name: r.name, description: r.description, image_url: r.image_url }
    }
}

impl From<ArtifactRequest> for ArtifactPatch {
    fn from(r: ArtifactRequest) -> Self {
        ArtifactPatch { name: Some(r.name), description: Some(r.description), image_url: Some(r.image_url) }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct NewUserRequest {
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "username is required."))]
    pub username: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "password is required."))]
    pub password: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "roles are required."))]
    pub roles: String,
}

impl From<NewUserRequest> for NewUser {
    fn from(r: NewUserRequest) -> Self {
        NewUser { username: r.username, password: r.password, enabled: r.enabled, roles: r.roles }
    }
}

/// A `password` field in the body is ignored.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "username is required."))]
    pub username: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "roles are required."))]
    pub roles: String,
}

impl From<UpdateUserRequest> for UserPatch {
    fn from(r: UpdateUserRequest) -> Self {
        UserPatch { username: Some(r.username), enabled: Some(r.enabled), roles: Some(r.roles) }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "username is required."))]
    pub username: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "password is required."))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user_info: UserDto,
    pub token: String,
}
