use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use conduit::config::Config;
use http_body_util::BodyExt;
use tower::ServiceExt;

async fn spawn_app() -> Router {
    let mut config = Config::default();
    config.general.database_url = "sqlite::memory:".to_string();

    let state = conduit::api::create_app_state_from_config(config, None)
        .await
        .expect("Failed to create app state");
    conduit::api::router(state)
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Token {token}"));
    }

    let request = match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(serde_json::to_string(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };

    (status, json)
}

async fn register(app: &Router, username: &str, email: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/users",
        None,
        Some(serde_json::json!({
            "user": { "username": username, "email": email, "password": "correct-horse" }
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
    body["user"]["token"].as_str().expect("token").to_string()
}

#[tokio::test]
async fn register_login_and_current_user() {
    let app = spawn_app().await;

    let token = register(&app, "mario", "mario@super.io").await;

    let (status, _) = send(&app, "GET", "/api/user", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "GET", "/api/user", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&app, "GET", "/api/user", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["username"], "mario");
    assert_eq!(body["user"]["email"], "mario@super.io");
    assert!(body["user"].get("password_hash").is_none());

    let (status, body) = send(
        &app,
        "POST",
        "/api/users/login",
        None,
        Some(serde_json::json!({
            "user": { "email": "mario@super.io", "password": "correct-horse" }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["user"]["token"].as_str().is_some());

    let (status, _) = send(
        &app,
        "POST",
        "/api/users/login",
        None,
        Some(serde_json::json!({
            "user": { "email": "mario@super.io", "password": "wrong" }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn duplicate_registration_is_a_conflict() {
    let app = spawn_app().await;

    register(&app, "mario", "mario@super.io").await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/users",
        None,
        Some(serde_json::json!({
            "user": { "username": "mario", "email": "other@super.io", "password": "pw-123456" }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(
        &app,
        "POST",
        "/api/users",
        None,
        Some(serde_json::json!({
            "user": { "username": "other", "email": "mario@super.io", "password": "pw-123456" }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn update_user_merges_fields() {
    let app = spawn_app().await;

    let token = register(&app, "mario", "mario@super.io").await;

    let (status, body) = send(
        &app,
        "PUT",
        "/api/user",
        Some(&token),
        Some(serde_json::json!({
            "user": { "bio": "It's-a me", "image": "mario.jpg" }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["bio"], "It's-a me");
    assert_eq!(body["user"]["username"], "mario");

    let (_, body) = send(&app, "GET", "/api/user", Some(&token), None).await;
    assert_eq!(body["user"]["image"], "mario.jpg");
}

#[tokio::test]
async fn invalid_registration_payload_is_unprocessable() {
    let app = spawn_app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/users",
        None,
        Some(serde_json::json!({
            "user": { "username": "mario", "email": "not-an-email", "password": "pw-123456" }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["errors"]["body"][0].as_str().is_some());

    let (status, _) = send(
        &app,
        "POST",
        "/api/users",
        None,
        Some(serde_json::json!({
            "user": { "username": "  ", "email": "ok@super.io", "password": "pw-123456" }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn profile_follow_roundtrip() {
    let app = spawn_app().await;

    register(&app, "mario", "mario@super.io").await;
    let luigi = register(&app, "luigi", "luigi@super.io").await;

    // Anonymous view: no following flag set.
    let (status, body) = send(&app, "GET", "/api/profiles/mario", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["profile"]["following"], false);

    let (status, body) = send(
        &app,
        "POST",
        "/api/profiles/mario/follow",
        Some(&luigi),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["profile"]["following"], true);

    // Idempotent re-follow.
    let (status, body) = send(
        &app,
        "POST",
        "/api/profiles/mario/follow",
        Some(&luigi),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["profile"]["following"], true);

    let (_, body) = send(&app, "GET", "/api/profiles/mario", Some(&luigi), None).await;
    assert_eq!(body["profile"]["following"], true);

    let (status, body) = send(
        &app,
        "DELETE",
        "/api/profiles/mario/follow",
        Some(&luigi),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["profile"]["following"], false);

    // Following is directional: mario never followed luigi.
    let mario_token = {
        let (_, body) = send(
            &app,
            "POST",
            "/api/users/login",
            None,
            Some(serde_json::json!({
                "user": { "email": "mario@super.io", "password": "correct-horse" }
            })),
        )
        .await;
        body["user"]["token"].as_str().unwrap().to_string()
    };
    let (_, body) = send(&app, "GET", "/api/profiles/luigi", Some(&mario_token), None).await;
    assert_eq!(body["profile"]["following"], false);
}

#[tokio::test]
async fn unknown_profile_is_not_found() {
    let app = spawn_app().await;

    let (status, body) = send(&app, "GET", "/api/profiles/waluigi", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["errors"]["body"][0].as_str().is_some());

    let token = register(&app, "mario", "mario@super.io").await;
    let (status, _) = send(
        &app,
        "POST",
        "/api/profiles/waluigi/follow",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn protected_routes_reject_anonymous_requests() {
    let app = spawn_app().await;

    for (method, uri) in [
        ("POST", "/api/articles"),
        ("GET", "/api/user"),
        ("POST", "/api/profiles/mario/follow"),
        ("POST", "/api/articles/some-slug/favorite"),
    ] {
        let (status, _) = send(
            &app,
            method,
            uri,
            None,
            Some(serde_json::json!({ "article": {}, "user": {} })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {uri}");
    }
}
