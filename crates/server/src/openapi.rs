use axum::Json;
use utoipa::OpenApi;
use utoipa::ToSchema;

use crate::dto::{
    ArtifactDto, ArtifactRequest, LoginRequest, LoginResponse, NewUserRequest, UpdateUserRequest, UserDto, WizardDto,
    WizardRequest,
};

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

/// Response envelope wrapping every `/api/v1` payload.
#[derive(ToSchema)]
pub struct EnvelopeDoc {
    pub flag: bool,
    pub code: u16,
    pub message: String,
    #[schema(value_type = Object, nullable)]
    pub data: Option<serde_json::Value>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::wizards::find_all,
        crate::routes::wizards::find_by_id,
        crate::routes::wizards::save,
        crate::routes::wizards::update,
        crate::routes::wizards::delete,
        crate::routes::wizards::assign_artifact,
        crate::routes::artifacts::find_all,
        crate::routes::artifacts::find_by_id,
        crate::routes::artifacts::save,
        crate::routes::artifacts::update,
        crate::routes::artifacts::delete,
        crate::routes::users::find_all,
        crate::routes::users::find_by_id,
        crate::routes::users::save,
        crate::routes::users::update,
        crate::routes::users::delete,
        crate::routes::auth::login,
    ),
    components(
        schemas(
            HealthResponse,
            EnvelopeDoc,
            WizardDto,
            WizardRequest,
            ArtifactDto,
            ArtifactRequest,
            UserDto,
            NewUserRequest,
            UpdateUserRequest,
            LoginRequest,
            LoginResponse,
        )
    ),
    tags(
        (name = "health"),
        (name = "wizards"),
        (name = "artifacts"),
        (name = "users"),
        (name = "auth")
    )
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
