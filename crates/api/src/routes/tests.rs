//! Router tests against the in-memory store.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header::AUTHORIZATION},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::{AppState, create_router};
use reseller_core::store::memory::{MemoryStore, StoreOp};
use reseller_core::{Argon2Verifier, CredentialVerifier};
use reseller_shared::{JwtConfig, JwtService};

struct TestApp {
    store: Arc<MemoryStore>,
    router: Router,
}

impl TestApp {
    fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let verifier = Argon2Verifier::with_cost(8, 1, 1).unwrap();
        store.add_admin("root", &verifier.hash("rootpw").unwrap());
        let state = AppState::new(
            Arc::clone(&store),
            verifier,
            JwtService::new(JwtConfig::default()),
        );
        Self {
            store,
            router: create_router(state),
        }
    }

    async fn send(&self, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(format!("/api/v1{uri}"))
            .header("Content-Type", "application/json");
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = body.map_or_else(Body::empty, |b| Body::from(b.to_string()));

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn login(&self, role: &str, username: &str, password: &str) -> String {
        let (status, body) = self
            .send(
                "POST",
                "/auth/login",
                None,
                Some(json!({ "username": username, "password": password, "role": role })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["access_token"].as_str().unwrap().to_string()
    }

    async fn admin(&self) -> String {
        self.login("admin", "root", "rootpw").await
    }

    /// Creates a seller through the API and logs in as it.
    async fn seller(&self, admin: &str, username: &str, credits: i64) -> (String, String) {
        let (status, body) = self
            .send(
                "POST",
                "/sellers",
                Some(admin),
                Some(json!({ "username": username, "password": "pw", "credits": credits })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        let id = body["id"].as_str().unwrap().to_string();
        (id, self.login("seller", username, "pw").await)
    }
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let (status, body) = app.send("GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_login_rejects_wrong_table() {
    let app = TestApp::new();
    let admin = app.admin().await;
    app.seller(&admin, "s1", 0).await;

    let (status, body) = app
        .send(
            "POST",
            "/auth/login",
            None,
            Some(json!({ "username": "s1", "password": "pw", "role": "admin" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "INVALID_CREDENTIALS");

    let (status, _) = app
        .send(
            "POST",
            "/auth/login",
            None,
            Some(json!({ "username": "root", "password": "rootpw", "role": "owner" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_routes_need_token() {
    let app = TestApp::new();
    let (status, body) = app.send("GET", "/sellers", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "UNAUTHORIZED");

    let (status, _) = app.send("GET", "/me", Some("not-a-token"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_refreshes_seller_balance() {
    let app = TestApp::new();
    let admin = app.admin().await;
    let (id, seller) = app.seller(&admin, "s1", 4).await;

    let (status, _) = app
        .send("PATCH", &format!("/sellers/{id}"), Some(&admin), Some(json!({ "credits": 9 })))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.send("GET", "/me", Some(&seller), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "seller");
    assert_eq!(body["credits"], 9);

    let (_, body) = app.send("GET", "/me", Some(&admin), None).await;
    assert_eq!(body["role"], "admin");
    assert!(body.get("credits").is_none());
}

#[tokio::test]
async fn test_provision_flow() {
    let app = TestApp::new();
    let admin = app.admin().await;
    let (_, seller) = app.seller(&admin, "s1", 1).await;

    let (status, body) = app
        .send(
            "POST",
            "/end-users",
            Some(&seller),
            Some(json!({ "username": "bob", "password": "pw" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["end_user"]["username"], "bob");
    assert_eq!(body["seller"]["credits"], 0);
    assert!(body["end_user"].get("password_hash").is_none());

    let (status, body) = app
        .send(
            "POST",
            "/end-users",
            Some(&seller),
            Some(json!({ "username": "carol", "password": "pw" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "INSUFFICIENT_CREDITS");

    let (_, body) = app.send("GET", "/end-users", Some(&seller), None).await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (_, body) = app.send("GET", "/end-users", Some(&admin), None).await;
    assert_eq!(body[0]["seller_username"], "s1");
}

#[tokio::test]
async fn test_debit_failure_surfaces_as_server_error() {
    let app = TestApp::new();
    let admin = app.admin().await;
    let (_, seller) = app.seller(&admin, "s1", 2).await;
    app.store.fail(StoreOp::DebitSellerCredits);

    let (status, body) = app
        .send(
            "POST",
            "/end-users",
            Some(&seller),
            Some(json!({ "username": "bob", "password": "pw" })),
        )
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "CREDIT_DEBIT_FAILED");
    assert!(app.store.end_users().is_empty());
}

#[tokio::test]
async fn test_role_gates() {
    let app = TestApp::new();
    let admin = app.admin().await;
    let (_, seller) = app.seller(&admin, "s1", 1).await;

    let (status, body) = app.send("GET", "/sellers", Some(&seller), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "FORBIDDEN");

    let (status, _) = app
        .send(
            "POST",
            "/end-users",
            Some(&admin),
            Some(json!({ "username": "bob", "password": "pw" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_update_and_delete_end_user() {
    let app = TestApp::new();
    let admin = app.admin().await;
    let (_, owner) = app.seller(&admin, "owner", 2).await;
    let (_, other) = app.seller(&admin, "other", 0).await;

    let (_, body) = app
        .send(
            "POST",
            "/end-users",
            Some(&owner),
            Some(json!({ "username": "bob", "password": "pw" })),
        )
        .await;
    let id = body["end_user"]["id"].as_str().unwrap().to_string();

    let (status, _) = app
        .send(
            "PATCH",
            &format!("/end-users/{id}"),
            Some(&other),
            Some(json!({ "username": "stolen" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app
        .send(
            "PATCH",
            &format!("/end-users/{id}"),
            Some(&owner),
            Some(json!({ "username": "bobby", "password": "" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "bobby");

    let (status, body) = app
        .send("DELETE", &format!("/end-users/{id}"), Some(&owner), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["end_users"], json!([]));
}

#[tokio::test]
async fn test_delete_seller_cascades() {
    let app = TestApp::new();
    let admin = app.admin().await;
    let (id, seller) = app.seller(&admin, "s1", 3).await;
    for name in ["a", "b", "c"] {
        app.send(
            "POST",
            "/end-users",
            Some(&seller),
            Some(json!({ "username": name, "password": "pw" })),
        )
        .await;
    }

    let (status, body) = app.send("DELETE", &format!("/sellers/{id}"), Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deletion"]["end_users_removed"], 3);
    assert_eq!(body["sellers"], json!([]));
    assert!(app.store.end_users().is_empty());

    let (status, _) = app.send("GET", "/me", Some(&seller), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_duplicate_seller_conflicts() {
    let app = TestApp::new();
    let admin = app.admin().await;
    app.seller(&admin, "s1", 0).await;

    let (status, body) = app
        .send(
            "POST",
            "/sellers",
            Some(&admin),
            Some(json!({ "username": "s1", "password": "pw" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "CONFLICT");
}

#[tokio::test]
async fn test_logout() {
    let app = TestApp::new();
    let admin = app.admin().await;
    let (status, body) = app.send("POST", "/auth/logout", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Logged out");
}

#[tokio::test]
async fn test_incomplete_body_is_json_validation_error() {
    let app = TestApp::new();
    let admin = app.admin().await;

    let (status, body) = app
        .send("POST", "/sellers", Some(&admin), Some(json!({ "username": "x" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
    assert!(body["message"].as_str().unwrap().contains("password"), "{body}");

    let (status, body) = app
        .send("POST", "/auth/login", None, Some(json!({ "username": "root" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_unparseable_body_is_json_validation_error() {
    let app = TestApp::new();
    let admin = app.admin().await;

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/sellers")
                .header("Content-Type", "application/json")
                .header(AUTHORIZATION, format!("Bearer {admin}"))
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_dashboard_overview() {
    let app = TestApp::new();
    let admin = app.admin().await;
    let (_, seller) = app.seller(&admin, "s1", 3).await;
    app.seller(&admin, "s2", 5).await;
    app.send(
        "POST",
        "/end-users",
        Some(&seller),
        Some(json!({ "username": "bob", "password": "pw" })),
    )
    .await;

    let (status, body) = app.send("GET", "/dashboard", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["seller_count"], 2);
    assert_eq!(body["end_user_count"], 1);
    assert_eq!(body["total_credits"], 7);

    let (status, body) = app.send("GET", "/dashboard", Some(&seller), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "FORBIDDEN");
}

#[tokio::test]
async fn test_seller_delete_survives_list_refresh_failure() {
    let app = TestApp::new();
    let admin = app.admin().await;
    let (id, _) = app.seller(&admin, "s1", 0).await;
    app.store.fail(StoreOp::ListSellers);

    let (status, body) = app.send("DELETE", &format!("/sellers/{id}"), Some(&admin), None).await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["deletion"]["end_users_removed"], 0);
    assert!(body.get("sellers").is_none());
}

#[tokio::test]
async fn test_end_user_delete_survives_list_refresh_failure() {
    let app = TestApp::new();
    let admin = app.admin().await;
    let (_, seller) = app.seller(&admin, "s1", 1).await;
    let (_, body) = app
        .send(
            "POST",
            "/end-users",
            Some(&seller),
            Some(json!({ "username": "bob", "password": "pw" })),
        )
        .await;
    let id = body["end_user"]["id"].as_str().unwrap().to_string();
    app.store.fail(StoreOp::ListEndUsers);

    let (status, body) = app
        .send("DELETE", &format!("/end-users/{id}"), Some(&seller), None)
        .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["end_user_id"], id);
    assert!(body.get("end_users").is_none());
    assert!(app.store.end_users().is_empty());
}
