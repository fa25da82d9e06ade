use axum::{extract::State, Json};
use common::types::Envelope;

use crate::dto::{NewUserRequest, UpdateUserRequest, UserDto};
use crate::errors::ApiError;
use crate::extract::{ApiPath, ValidJson};
use crate::routes::ApiResult;
use crate::state::AppState;

#[utoipa::path(get, path = "/api/v1/users", tag = "users", responses((status = 200, description = "Find All Success", body = [UserDto])))]
pub async fn find_all(State(state): State<AppState>) -> ApiResult<Vec<UserDto>> {
    let users = state.users.find_all().await?;
    Ok(Json(Envelope::success("Find All Success", users.into_iter().map(UserDto::from).collect())))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}",
    tag = "users",
    params(("user_id" = i32, Path, description = "User id")),
    responses((status = 200, description = "Find One Success", body = UserDto), (status = 404, description = "Not Found"))
)]
pub async fn find_by_id(State(state): State<AppState>, ApiPath(user_id): ApiPath<i32>) -> ApiResult<UserDto> {
    let user = state.users.find_by_id(user_id).await?;
    Ok(Json(Envelope::success("Find One Success", user.into())))
}

/// 新建用户，密码仅在此处写入
#[utoipa::path(post, path = "/api/v1/users", tag = "users", request_body = NewUserRequest, responses((status = 200, description = "Add Success", body = UserDto), (status = 400, description = "Bad Request"), (status = 409, description = "Conflict")))]
pub async fn save(State(state): State<AppState>, ValidJson(req): ValidJson<NewUserRequest>) -> ApiResult<UserDto> {
    let saved = state.users.save(req.into()).await?;
    Ok(Json(Envelope::success("Add Success", saved.into())))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/{user_id}",
    tag = "users",
    request_body = UpdateUserRequest,
    params(("user_id" = i32, Path, description = "User id")),
    responses((status = 200, description = "Update Success", body = UserDto), (status = 400, description = "Bad Request"), (status = 404, description = "Not Found"), (status = 409, description = "Conflict"))
)]
pub async fn update(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<i32>,
    ValidJson(req): ValidJson<UpdateUserRequest>,
) -> ApiResult<UserDto> {
    let updated = state.users.update(user_id, req.into()).await?;
    Ok(Json(Envelope::success("Update Success", updated.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{user_id}",
    tag = "users",
    params(("user_id" = i32, Path, description = "User id")),
    responses((status = 200, description = "Delete Success"), (status = 404, description = "Not Found"))
)]
pub async fn delete(State(state): State<AppState>, ApiPath(user_id): ApiPath<i32>) -> Result<Json<Envelope<()>>, ApiError> {
    state.users.delete(user_id).await?;
    Ok(Json(Envelope::ok("Delete Success")))
}
