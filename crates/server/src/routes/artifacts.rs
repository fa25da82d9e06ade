use axum::{extract::State, Json};
use common::types::Envelope;

use crate::dto::{ArtifactDto, ArtifactRequest};
use crate::errors::ApiError;
use crate::extract::{ApiPath, ValidJson};
use crate::routes::ApiResult;
use crate::state::AppState;

#[utoipa::path(get, path = "/api/v1/artifacts", tag = "artifacts", responses((status = 200, description = "Find All Success", body = [ArtifactDto])))]
pub async fn find_all(State(state): State<AppState>) -> ApiResult<Vec<ArtifactDto>> {
    let artifacts = state.artifacts.find_all().await?;
    Ok(Json(Envelope::success("Find All Success", artifacts.into_iter().map(ArtifactDto::from).collect())))
}

#[utoipa::path(
    get,
    path = "/api/v1/artifacts/{artifact_id}",
    tag = "artifacts",
    params(("artifact_id" = String, Path, description = "Artifact id")),
    responses((status = 200, description = "Find One Success", body = ArtifactDto), (status = 404, description = "Not Found"))
)]
pub async fn find_by_id(State(state): State<AppState>, ApiPath(artifact_id): ApiPath<String>) -> ApiResult<ArtifactDto> {
    let artifact = state.artifacts.find_by_id(&artifact_id).await?;
    Ok(Json(Envelope::success("Find One Success", artifact.into())))
}

/// 新建神器，id 由 IdWorker 生成
#[utoipa::path(post, path = "/api/v1/artifacts", tag = "artifacts", request_body = ArtifactRequest, responses((status = 200, description = "Add Success", body = ArtifactDto), (status = 400, description = "Bad Request")))]
pub async fn save(State(state): State<AppState>, ValidJson(req): ValidJson<ArtifactRequest>) -> ApiResult<ArtifactDto> {
    let saved = state.artifacts.save(req.into()).await?;
    Ok(Json(Envelope::success("Add Success", saved.into())))
}

#[utoipa::path(
    put,
    path = "/api/v1/artifacts/{artifact_id}",
    tag = "artifacts",
    request_body = ArtifactRequest,
    params(("artifact_id" = String, Path, description = "Artifact id")),
    responses((status = 200, description = "Update Success", body = ArtifactDto), (status = 400, description = "Bad Request"), (status = 404, description = "Not Found"))
)]
pub async fn update(
    State(state): State<AppState>,
    ApiPath(artifact_id): ApiPath<String>,
    ValidJson(req): ValidJson<ArtifactRequest>,
) -> ApiResult<ArtifactDto> {
    let updated = state.artifacts.update(&artifact_id, req.into()).await?;
    Ok(Json(Envelope::success("Update Success", updated.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/artifacts/{artifact_id}",
    tag = "artifacts",
    params(("artifact_id" = String, Path, description = "Artifact id")),
    responses((status = 200, description = "Delete Success"), (status = 404, description = "Not Found"))
)]
pub async fn delete(State(state): State<AppState>, ApiPath(artifact_id): ApiPath<String>) -> Result<Json<Envelope<()>>, ApiError> {
    state.artifacts.delete(&artifact_id).await?;
    Ok(Json(Envelope::ok("Delete Success")))
}
