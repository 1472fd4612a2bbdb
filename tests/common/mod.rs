// tests/common/mod.rs
//
// App completo sobre o MemoryStore: catálogo demo, super admin, um staff e um cliente.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use sweetbite::{
    build_router,
    config::{AppState, Config},
    db::{seed, DynStore, MemoryStore, UserRepository},
    models::auth::{NewUser, Role, UserStatus},
    services::auth::hash_password,
};

pub const ADMIN: (&str, &str) = ("admin", "admin-pass-123");
pub const STAFF: (&str, &str) = ("staff", "staff-pass-123");
pub const CUSTOMER: (&str, &str) = ("customer", "customer-pass-123");

// Custo mínimo do bcrypt para os testes não ficarem lentos
const TEST_BCRYPT_COST: u32 = 4;

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

pub fn test_config() -> Config {
    Config {
        database_url: None,
        session_secret: "test-secret-for-integration".to_string(),
        session_ttl_hours: 1,
        cookie_secure: false,
        bind_addr: "127.0.0.1:0".to_string(),
        bcrypt_cost: TEST_BCRYPT_COST,
        db_max_connections: 1,
        seed_demo_data: true,
        seed_admin: None,
        cors_origin: None,
    }
}

async fn add_user(store: &DynStore, username: &str, password: &str, role: Role) {
    let user = NewUser {
        username: username.to_string(),
        email: format!("{username}@sweetbite.test"),
        password_hash: hash_password(password, TEST_BCRYPT_COST)
            .await
            .expect("hash"),
        full_name: None,
        role,
        status: UserStatus::Active,
        is_admin: role == Role::Admin,
        is_super_admin: false,
    };
    store.create_user(&user).await.expect("create user");
}

pub async fn spawn_app() -> TestApp {
    let store: DynStore = Arc::new(MemoryStore::new());

    seed::seed_demo_catalog(store.as_ref())
        .await
        .expect("seed catalog");
    let admin_hash = hash_password(ADMIN.1, TEST_BCRYPT_COST)
        .await
        .expect("hash");
    seed::seed_admin(store.as_ref(), ADMIN.0, "admin@sweetbite.test", admin_hash)
        .await
        .expect("seed admin");

    add_user(&store, STAFF.0, STAFF.1, Role::Staff).await;
    add_user(&store, CUSTOMER.0, CUSTOMER.1, Role::Customer).await;

    let state = AppState::with_store(store, test_config());
    TestApp {
        router: build_router(state.clone()),
        state,
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestApp {
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");

        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.request(Method::GET, uri, token, None).await
    }

    pub async fn login(&self, (username, password): (&str, &str)) -> String {
        let response = self
            .request(
                Method::POST,
                "/api/auth/login",
                None,
                Some(serde_json::json!({ "username": username, "password": password })),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "login de {username}");
        response.body["token"]
            .as_str()
            .expect("token")
            .to_string()
    }

    pub async fn product_id(&self, slug: &str) -> String {
        let response = self.get(&format!("/api/products/{slug}"), None).await;
        assert_eq!(response.status, StatusCode::OK);
        response.body["id"].as_str().expect("id").to_string()
    }
}

pub fn as_f64(value: &Value) -> f64 {
    value.as_f64().expect("número")
}
