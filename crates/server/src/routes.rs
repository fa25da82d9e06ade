pub mod artifacts;
pub mod auth;
pub mod users;
pub mod wizards;

use axum::{
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::{Envelope, Health};

use crate::errors::{ApiError, ENDPOINT_NOT_FOUND};
use crate::openapi;
use crate::state::AppState;

/// Success envelope or an [`ApiError`] rendered as one.
pub type ApiResult<T> = Result<Json<Envelope<T>>, ApiError>;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "Service is up", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn endpoint_not_found() -> ApiError {
    ApiError::NotFound(ENDPOINT_NOT_FOUND.into())
}

/// Build the full application router: resource routes under `state.base_url`, plus health and API docs.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let base = state.base_url.clone();

    // Resource routes; the bearer check is a no-op unless auth.enforce is set
    let api = Router::new()
        .route(&format!("{base}/wizards"), get(wizards::find_all).post(wizards::save))
        .route(
            &format!("{base}/wizards/:wizard_id"),
            get(wizards::find_by_id).put(wizards::update).delete(wizards::delete),
        )
        .route(&format!("{base}/wizards/:wizard_id/artifacts/:artifact_id"), put(wizards::assign_artifact))
        .route(&format!("{base}/artifacts"), get(artifacts::find_all).post(artifacts::save))
        .route(
            &format!("{base}/artifacts/:artifact_id"),
            get(artifacts::find_by_id).put(artifacts::update).delete(artifacts::delete),
        )
        .route(&format!("{base}/users"), get(users::find_all).post(users::save))
        .route(&format!("{base}/users/login"), post(auth::login))
        .route(
            &format!("{base}/users/:user_id"),
            get(users::find_by_id).put(users::update).delete(users::delete),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_bearer_token));

    // Public routes (health + docs)
    let public = Router::new()
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi::openapi_json));

    public
        .merge(api)
        .fallback(endpoint_not_found)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // 每次请求创建 span，包含方法和路径等，日志级别为 INFO
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                // 响应返回时打点，包含状态码与耗时
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 失败（5xx 等）时以 ERROR 记录
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
