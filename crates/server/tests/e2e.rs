use std::net::SocketAddr;

use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use server::{routes, state::AppState};

struct TestApp {
    base_url: String,
}

async fn start_server(enforce: bool) -> anyhow::Result<TestApp> {
    let db = models::db::connect_in_memory().await?;
    service::seed::seed_demo_data(&db).await?;
    let api = configs::ApiConfig::default();
    let auth = configs::AuthConfig { jwt_secret: "test-secret".into(), token_ttl_hours: 2, enforce };
    let app = routes::build_router(AppState::new(db, &api, &auth), CorsLayer::very_permissive());

    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });

    Ok(TestApp { base_url })
}

#[tokio::test]
async fn e2e_public_health() -> anyhow::Result<()> {
    let app = start_server(false).await?;
    let res = reqwest::get(format!("{}/health", app.base_url)).await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn e2e_wizard_lifecycle() -> anyhow::Result<()> {
    let app = start_server(false).await?;
    let c = reqwest::Client::new();

    let res = c.post(format!("{}/api/v1/wizards", app.base_url)).json(&json!({"name": "Luna Lovegood"})).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<Value>().await?;
    let id = body["data"]["id"].as_i64().unwrap();

    let res = c
        .put(format!("{}/api/v1/wizards/{}/artifacts/1250808601744904196", app.base_url, id))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    let body = c.get(format!("{}/api/v1/wizards/{}", app.base_url, id)).send().await?.json::<Value>().await?;
    assert_eq!(body["data"]["numberOfArtifacts"], 1);

    let res = c.delete(format!("{}/api/v1/wizards/{}", app.base_url, id)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    let body = c
        .get(format!("{}/api/v1/artifacts/1250808601744904196", app.base_url))
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert!(body["data"]["owner"].is_null());
    Ok(())
}

#[tokio::test]
async fn e2e_protected_without_token_denied() -> anyhow::Result<()> {
    let app = start_server(true).await?;
    let res = reqwest::Client::new().get(format!("{}/api/v1/users", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::UNAUTHORIZED);
    let body = res.json::<Value>().await?;
    assert_eq!(body["flag"], false);
    Ok(())
}

#[tokio::test]
async fn e2e_protected_with_expired_token_unauthorized() -> anyhow::Result<()> {
    let app = start_server(true).await?;

    // Create an expired JWT token signed with test-secret
    use jsonwebtoken::{encode, EncodingKey, Header};
    #[derive(serde::Serialize)]
    struct Claims { sub: String, uid: i32, roles: String, exp: i64, iat: i64 }
    let now = chrono::Utc::now().timestamp();
    let claims = Claims { sub: "john".into(), uid: 1, roles: "admin user".into(), exp: now - 3600, iat: now - 7200 };
    let token = encode(&Header::default(), &claims, &EncodingKey::from_secret("test-secret".as_bytes()))?;

    let res = reqwest::Client::new()
        .get(format!("{}/api/v1/users", app.base_url))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::UNAUTHORIZED);
    let body = res.json::<Value>().await?;
    assert_eq!(
        body["message"],
        "The access token provided is expired, revoked, malformed, or invalid for other reasons."
    );
    Ok(())
}

#[tokio::test]
async fn e2e_login_then_access_users() -> anyhow::Result<()> {
    let app = start_server(true).await?;
    let c = reqwest::Client::new();

    let body = c
        .post(format!("{}/api/v1/users/login", app.base_url))
        .json(&json!({"username": "john", "password": "123456"}))
        .send()
        .await?
        .json::<Value>()
        .await?;
    let token = body["data"]["token"].as_str().unwrap_or_default().to_string();
    assert!(!token.is_empty());

    let res = c.get(format!("{}/api/v1/users", app.base_url)).bearer_auth(&token).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(3));
    Ok(())
}
