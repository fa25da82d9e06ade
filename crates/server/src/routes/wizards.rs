use axum::{extract::State, Json};
use common::types::Envelope;

use crate::dto::{WizardDto, WizardRequest};
use crate::errors::ApiError;
use crate::extract::{ApiPath, ValidJson};
use crate::routes::ApiResult;
use crate::state::AppState;

/// 列出所有巫师
#[utoipa::path(get, path = "/api/v1/wizards", tag = "wizards", responses((status = 200, description = "Find All Success", body = [WizardDto])))]
pub async fn find_all(State(state): State<AppState>) -> ApiResult<Vec<WizardDto>> {
    let wizards = state.wizards.find_all().await?;
    Ok(Json(Envelope::success("Find All Success", wizards.iter().map(WizardDto::from).collect())))
}

#[utoipa::path(
    get,
    path = "/api/v1/wizards/{wizard_id}",
    tag = "wizards",
    params(("wizard_id" = i32, Path, description = "Wizard id")),
    responses((status = 200, description = "Find One Success", body = WizardDto), (status = 404, description = "Not Found"))
)]
pub async fn find_by_id(State(state): State<AppState>, ApiPath(wizard_id): ApiPath<i32>) -> ApiResult<WizardDto> {
    let wizard = state.wizards.find_by_id(wizard_id).await?;
    Ok(Json(Envelope::success("Find One Success", WizardDto::from(&wizard))))
}

#[utoipa::path(post, path = "/api/v1/wizards", tag = "wizards", request_body = WizardRequest, responses((status = 200, description = "Add Success", body = WizardDto), (status = 400, description = "Bad Request")))]
pub async fn save(State(state): State<AppState>, ValidJson(req): ValidJson<WizardRequest>) -> ApiResult<WizardDto> {
    let saved = state.wizards.save(req.into()).await?;
    Ok(Json(Envelope::success("Add Success", WizardDto::from(&saved))))
}

#[utoipa::path(
    put,
    path = "/api/v1/wizards/{wizard_id}",
    tag = "wizards",
    request_body = WizardRequest,
    params(("wizard_id" = i32, Path, description = "Wizard id")),
    responses((status = 200, description = "Update Success", body = WizardDto), (status = 400, description = "Bad Request"), (status = 404, description = "Not Found"))
)]
pub async fn update(
    State(state): State<AppState>,
    ApiPath(wizard_id): ApiPath<i32>,
    ValidJson(req): ValidJson<WizardRequest>,
) -> ApiResult<WizardDto> {
    let updated = state.wizards.update(wizard_id, req.into()).await?;
    Ok(Json(Envelope::success("Update Success", WizardDto::from(&updated))))
}

/// 删除巫师，名下神器变为无主
#[utoipa::path(
    delete,
    path = "/api/v1/wizards/{wizard_id}",
    tag = "wizards",
    params(("wizard_id" = i32, Path, description = "Wizard id")),
    responses((status = 200, description = "Delete Success"), (status = 404, description = "Not Found"))
)]
pub async fn delete(State(state): State<AppState>, ApiPath(wizard_id): ApiPath<i32>) -> Result<Json<Envelope<()>>, ApiError> {
    state.wizards.delete(wizard_id).await?;
    Ok(Json(Envelope::ok("Delete Success")))
}

#[utoipa::path(
    put,
    path = "/api/v1/wizards/{wizard_id}/artifacts/{artifact_id}",
    tag = "wizards",
    params(("wizard_id" = i32, Path, description = "Target wizard"), ("artifact_id" = String, Path, description = "Artifact to move")),
    responses((status = 200, description = "Artifact Assignment Success"), (status = 404, description = "Not Found"))
)]
pub async fn assign_artifact(
    State(state): State<AppState>,
    ApiPath((wizard_id, artifact_id)): ApiPath<(i32, String)>,
) -> Result<Json<Envelope<()>>, ApiError> {
    state.wizards.assign_artifact(wizard_id, &artifact_id).await?;
    Ok(Json(Envelope::ok("Artifact Assignment Success")))
}
