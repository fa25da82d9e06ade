use axum::{
    extract::{Request, State},
    http::Method,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use common::types::Envelope;
use service::auth::domain::LoginInput;

use crate::dto::{LoginRequest, LoginResponse};
use crate::errors::{ApiError, MISSING_CREDENTIALS};
use crate::extract::ValidJson;
use crate::routes::ApiResult;
use crate::state::AppState;

#[utoipa::path(post, path = "/api/v1/users/login", tag = "auth", request_body = LoginRequest, responses((status = 200, description = "User Info and JSON Web Token", body = LoginResponse), (status = 401, description = "Unauthorized")))]
pub async fn login(State(state): State<AppState>, ValidJson(req): ValidJson<LoginRequest>) -> ApiResult<LoginResponse> {
    let session = state.auth.login(LoginInput { username: req.username, password: req.password }).await?;
    let body = LoginResponse { user_info: session.user.into(), token: session.token };
    Ok(Json(Envelope::success("User Info and JSON Web Token", body)))
}

/// Routes reachable without a token: login, artifact reads and CORS preflight.
fn is_public(base_url: &str, method: &Method, path: &str) -> bool {
    if method == Method::OPTIONS {
        return true;
    }
    let Some(rest) = path.strip_prefix(base_url) else { return false };
    match (method, rest) {
        (&Method::POST, "/users/login") => true,
        (&Method::GET, "/artifacts") => true,
        (&Method::GET, r) => r.strip_prefix("/artifacts/").is_some_and(|id| !id.is_empty() && !id.contains('/')),
        _ => false,
    }
}

/// 全局中间件：开启 auth.enforce 后，除公开路由外校验 Authorization: Bearer <token>
/// 缺失或非法 token 均返回 401 信封；校验通过后 claims 写入请求扩展
pub async fn require_bearer_token(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    if !state.enforce_auth || is_public(&state.base_url, req.method(), req.uri().path()) {
        return next.run(req).await;
    }

    let header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    let token = match header.and_then(|h| h.strip_prefix("Bearer ")) {
        Some(t) if !t.trim().is_empty() => t.trim().to_string(),
        _ => {
            tracing::warn!(path = %req.uri().path(), "missing bearer token");
            return ApiError::Unauthorized(MISSING_CREDENTIALS.into()).into_response();
        }
    };

    match state.auth.verify(&token) {
        Ok(claims) => {
            req.extensions_mut().insert(claims);
            next.run(req).await
        }
        Err(e) => {
            tracing::warn!(path = %req.uri().path(), err = %e, "token validation failed");
            ApiError::from(e).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_routes() {
        let base = "/api/v1";
        assert!(is_public(base, &Method::POST, "/api/v1/users/login"));
        assert!(is_public(base, &Method::GET, "/api/v1/artifacts"));
        assert!(is_public(base, &Method::GET, "/api/v1/artifacts/1250808601744904192"));
        assert!(is_public(base, &Method::OPTIONS, "/api/v1/wizards"));

        assert!(!is_public(base, &Method::POST, "/api/v1/artifacts"));
        assert!(!is_public(base, &Method::DELETE, "/api/v1/artifacts/1"));
        assert!(!is_public(base, &Method::GET, "/api/v1/wizards"));
        assert!(!is_public(base, &Method::GET, "/api/v1/users"));
    }
}
