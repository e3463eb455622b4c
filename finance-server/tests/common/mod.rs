//! Shared helpers for router-level tests

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use finance_server::auth::{JwtConfig, JwtService};
use finance_server::db::{MemoryStore, Repositories};
use finance_server::{AppState, api};
use http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

pub const ADMIN: i64 = 1;
pub const MANAGER: i64 = 2;
pub const ALICE: i64 = 3;
pub const BOB: i64 = 4;

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub jwt: JwtService,
}

pub fn jwt_service() -> JwtService {
    JwtService::with_config(JwtConfig {
        secret: "integration-test-secret-with-enough-length".into(),
        expiration_minutes: 60,
        issuer: "finance-server".into(),
        audience: "finance-clients".into(),
    })
}

/// Router over a fresh in-process store with admin and manager users
pub fn app() -> TestApp {
    let store = Arc::new(MemoryStore::new());
    store.grant_builtin_role(ADMIN, "admin");
    store.grant_builtin_role(MANAGER, "broker-manager");

    let jwt = jwt_service();
    let state = AppState::from_repositories(jwt.clone(), Repositories::memory(store.clone()));

    TestApp {
        router: api::router(state),
        store,
        jwt,
    }
}

impl TestApp {
    pub fn token(&self, user_id: i64) -> String {
        self.jwt
            .generate_token(user_id, &format!("user-{user_id}"))
            .unwrap()
    }

    /// Send a request as `user` (`None` = anonymous) and decode the JSON body
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        user: Option<i64>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user_id) = user {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", self.token(user_id)));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    pub async fn create_broker(&self, name: &str) -> i64 {
        let (status, body) = self
            .send(
                "POST",
                "/api/brokers",
                Some(ADMIN),
                Some(serde_json::json!({ "name": name })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["id"].as_i64().unwrap()
    }
}

pub fn kind(body: &Value) -> &str {
    body["kind"].as_str().unwrap_or_default()
}
