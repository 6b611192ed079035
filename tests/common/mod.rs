use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use recipebox::{
    auth::JwtKeys,
    build_app,
    config::{AppConfig, JwtConfig},
    db, AppState,
};
use serde_json::{json, Value};
use sqlx::{postgres::PgPoolOptions, PgPool};
use tower::ServiceExt;

pub const DATABASE_ENV: &str = "RECIPEBOX_TEST_DATABASE_URL";

pub struct TestApp {
    pub router: Router,
    pub db: PgPool,
    pub keys: JwtKeys,
}

/// Full router over a real database, or `None` when no test database is
/// configured.
pub async fn spawn_app() -> Option<TestApp> {
    let Ok(url) = std::env::var(DATABASE_ENV) else {
        eprintln!("{DATABASE_ENV} not set; skipping database test");
        return None;
    };

    let db = PgPoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await
        .expect("connect to test database");
    db::migrate(&db).await.expect("migrate test database");

    let config = Arc::new(AppConfig {
        database_url: url,
        database_max_connections: 5,
        jwt: JwtConfig {
            secret: "integration-secret".into(),
            issuer: "recipebox".into(),
            audience: "recipebox-users".into(),
            ttl_minutes: 15,
        },
        host: "127.0.0.1".into(),
        port: 0,
    });

    let keys = JwtKeys::new(&config.jwt);
    let router = build_app(AppState::from_parts(db.clone(), config));
    Some(TestApp { router, db, keys })
}

/// Username that no other test run will have used.
pub fn unique(prefix: &str) -> String {
    format!("{prefix}_{:08x}", rand::random::<u32>())
}

pub fn soup(category: &str) -> Value {
    json!({
        "title": "Soup",
        "description": "A warm starter",
        "ingredients": "water, carrots, salt",
        "preparation_steps": "chop; boil; season",
        "cooking_time": 30,
        "serving_size": 2,
        "category": category
    })
}

impl TestApp {
    pub async fn call(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let req = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let res = self.router.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    pub async fn signup(&self, username: &str, email: &str, password: &str) -> (StatusCode, Value) {
        self.call(
            Method::POST,
            "/signup",
            None,
            Some(json!({ "username": username, "email": email, "password": password })),
        )
        .await
    }

    pub async fn login(&self, username: &str, password: &str) -> (StatusCode, Value) {
        self.call(
            Method::POST,
            "/login",
            None,
            Some(json!({ "username": username, "password": password })),
        )
        .await
    }

    /// Signs a fresh user up and returns a bearer token for them.
    pub async fn new_user(&self, prefix: &str) -> String {
        let username = unique(prefix);
        let (status, _) = self
            .signup(&username, &format!("{username}@example.com"), "pw1")
            .await;
        assert_eq!(status, StatusCode::CREATED);
        let (status, body) = self.login(&username, "pw1").await;
        assert_eq!(status, StatusCode::OK);
        body["access_token"].as_str().unwrap().to_string()
    }

    /// Creates a recipe and returns its id, read back from the owner's list.
    pub async fn create_recipe(&self, token: &str, fields: Value) -> i64 {
        let (status, body) = self
            .call(Method::POST, "/recipes", Some(token), Some(fields))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "Recipe created successfully");

        let (_, list) = self.call(Method::GET, "/recipes", Some(token), None).await;
        list.as_array()
            .and_then(|items| items.last())
            .and_then(|r| r["id"].as_i64())
            .expect("created recipe is listed")
    }
}
