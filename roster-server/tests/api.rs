//! End-to-end API tests: the router is driven in-process over the memory store.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use http_body_util::BodyExt;
use roster_server::api::build_app;
use roster_server::auth::password::hash_password;
use roster_server::{Config, MemoryStore, ScheduleStore, ServerState};
use serde_json::{Value, json};
use tower::ServiceExt;

const SECRET: &str = "api-test-secret-that-is-long-enough-for-hs256";

struct TestApp {
    router: Router,
    admin_token: String,
}

impl TestApp {
    async fn new() -> Self {
        let store = MemoryStore::new();
        store
            .ensure_admin("admin", &hash_password("admin-pass").unwrap())
            .await
            .unwrap();
        let state = ServerState::with_store(Config::for_tests(SECRET), Arc::new(store));
        let router = build_app(&state).with_state(state);

        let mut app = Self {
            router,
            admin_token: String::new(),
        };
        app.admin_token = app.login("admin", "admin-pass").await;
        app
    }

    async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
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

    async fn admin(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        self.send(method, uri, Some(&self.admin_token), body).await
    }

    async fn login(&self, username: &str, password: &str) -> String {
        let (status, body) = self
            .send(
                "POST",
                "/api/auth/login",
                None,
                Some(json!({ "username": username, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["token"].as_str().unwrap().to_string()
    }

    async fn create_restaurant(&self, name: &str) -> i64 {
        let (status, body) = self
            .admin("POST", "/api/restaurants", Some(json!({ "name": name })))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["id"].as_i64().unwrap()
    }

    /// Jane: server only, works at both restaurants, has an account
    async fn create_jane(&self, a: i64, b: i64) -> i64 {
        let (status, body) = self
            .admin(
                "POST",
                "/api/employees",
                Some(json!({
                    "name": "Jane",
                    "email": "jane@example.com",
                    "roles": ["server"],
                    "username": "jane",
                    "password": "jane-pass",
                    "restaurant_ids": [a, b],
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        assert!(body.get("hash_pass").is_none());
        body["id"].as_i64().unwrap()
    }
}

fn shift_body(restaurant_id: i64, employee_id: i64, date: &str, role: &str) -> Value {
    json!({
        "restaurant_id": restaurant_id,
        "employee_id": employee_id,
        "shift_date": date,
        "role": role,
        "period": "AM",
    })
}

#[tokio::test]
async fn health_is_public_and_api_requires_auth() {
    let app = TestApp::new().await;

    let (status, body) = app.send("GET", "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = app.send("GET", "/api/restaurants", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1001);

    let (status, _) = app
        .send("GET", "/api/restaurants", Some("not-a-token"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app
        .send(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "username": "admin", "password": "wrong" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1002);
}

#[tokio::test]
async fn jane_scheduling_flow() {
    let app = TestApp::new().await;
    let a = app.create_restaurant("A").await;
    let b = app.create_restaurant("B").await;
    let jane = app.create_jane(a, b).await;

    // Door is not one of Jane's roles
    let (status, body) = app
        .admin("POST", "/api/shifts", Some(shift_body(a, jane, "2025-01-10", "door")))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], 5002);

    let (status, body) = app
        .admin("POST", "/api/shifts", Some(shift_body(a, jane, "2025-01-10", "server")))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["status"], "created");
    assert_eq!(body["shift"]["start_time"], "09:00");

    // Second shift at A on the same day
    let (status, body) = app
        .admin("POST", "/api/shifts", Some(shift_body(a, jane, "2025-01-10", "server")))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 5004);

    // The dry run reports the cross-location warning without writing
    let (status, body) = app
        .admin("POST", "/api/shifts/check", Some(shift_body(b, jane, "2025-01-10", "server")))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "accepted_with_warning");
    assert_eq!(body["details"][0]["restaurant_name"], "A");

    // Same day at B needs confirmation
    let (status, body) = app
        .admin("POST", "/api/shifts", Some(shift_body(b, jane, "2025-01-10", "server")))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "confirmation_required");
    assert_eq!(body["conflicts"][0]["restaurant_name"], "A");
    assert_eq!(body["conflicts"][0]["role"], "server");

    let mut confirmed = shift_body(b, jane, "2025-01-10", "server");
    confirmed["confirm"] = json!(true);
    let (status, body) = app.admin("POST", "/api/shifts", Some(confirmed)).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["warnings"].as_array().unwrap().len(), 1);

    // Both shifts show up in Jane's own schedule
    let jane_token = app.login("jane", "jane-pass").await;
    let (status, body) = app
        .send("GET", "/api/me/shifts?from=2025-01-01", Some(&jane_token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["restaurant_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["A", "B"]);
}

#[tokio::test]
async fn confirmation_lists_every_conflicting_restaurant() {
    let app = TestApp::new().await;
    let a = app.create_restaurant("A").await;
    let b = app.create_restaurant("B").await;
    let c = app.create_restaurant("C").await;
    let jane = app.create_jane(a, b).await;
    let (status, _) = app
        .admin("POST", &format!("/api/employees/{jane}/restaurants/{c}"), Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    for restaurant in [b, a] {
        let mut body = shift_body(restaurant, jane, "2025-01-10", "server");
        body["confirm"] = json!(true);
        let (status, _) = app.admin("POST", "/api/shifts", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = app
        .admin("POST", "/api/shifts", Some(shift_body(c, jane, "2025-01-10", "server")))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "confirmation_required");
    let conflicts: Vec<(&str, &str)> = body["conflicts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| {
            (
                c["restaurant_name"].as_str().unwrap(),
                c["role"].as_str().unwrap(),
            )
        })
        .collect();
    assert_eq!(conflicts, vec![("A", "server"), ("B", "server")]);
}

#[tokio::test]
async fn calendar_and_range_queries() {
    let app = TestApp::new().await;
    let a = app.create_restaurant("A").await;
    let b = app.create_restaurant("B").await;
    let jane = app.create_jane(a, b).await;

    let (status, _) = app
        .admin("POST", "/api/shifts", Some(shift_body(a, jane, "2025-02-01", "server")))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let uri = format!("/api/restaurants/{a}/calendar?mode=month&date=2025-01-15");
    let (status, grid) = app.admin("GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK, "{grid}");
    assert_eq!(grid["title"], "January 2025");
    assert_eq!(grid["fetch_failed"], false);
    let cells = grid["cells"].as_array().unwrap();
    assert_eq!(cells.len(), 35);
    assert_eq!(cells[0]["date"], "2024-12-29");

    // Trailing February day is not primary but carries the shift
    let feb1 = cells.iter().find(|c| c["date"] == "2025-02-01").unwrap();
    assert_eq!(feb1["is_primary"], false);
    assert_eq!(feb1["shifts_by_role"]["server"][0]["employee_name"], "Jane");

    let uri = format!("/api/restaurants/{a}/calendar?mode=week&date=2025-01-29");
    let (status, grid) = app.admin("GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(grid["cells"].as_array().unwrap().len(), 7);

    let uri = format!("/api/restaurants/{a}/shifts?start_date=2025-02-01&end_date=2025-02-01");
    let (status, shifts) = app.admin("GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(shifts.as_array().unwrap().len(), 1);

    let uri = format!("/api/restaurants/{a}/shifts?start_date=2025-02-02&end_date=2025-02-01");
    let (status, body) = app.admin("GET", &uri, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 5007);

    let (status, body) = app
        .admin("GET", "/api/restaurants/12345/calendar", None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 4001);
}

#[tokio::test]
async fn staff_permissions() {
    let app = TestApp::new().await;
    let a = app.create_restaurant("A").await;
    let b = app.create_restaurant("B").await;
    let c = app.create_restaurant("C").await;
    app.create_jane(a, b).await;
    let jane = app.login("jane", "jane-pass").await;

    // Admin-only routes
    let (status, body) = app.send("GET", "/api/employees", Some(&jane), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 2003);
    let (status, _) = app
        .send("POST", "/api/restaurants", Some(&jane), Some(json!({ "name": "D" })))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Only linked restaurants are visible
    let (status, body) = app.send("GET", "/api/restaurants", Some(&jane), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (status, body) = app.send("GET", "/api/me/restaurants", Some(&jane), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["name"], "A");

    let uri = format!("/api/restaurants/{a}/calendar");
    let (status, _) = app.send("GET", &uri, Some(&jane), None).await;
    assert_eq!(status, StatusCode::OK);

    let uri = format!("/api/restaurants/{c}/calendar");
    let (status, body) = app.send("GET", &uri, Some(&jane), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 2001);

    // Admins have no employee view
    let (status, body) = app.admin("GET", "/api/me/shifts", None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 2006);

    let (status, body) = app.send("GET", "/api/auth/me", Some(&jane), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["identity"]["kind"], "employee");
    assert_eq!(body["employee"]["name"], "Jane");
}

#[tokio::test]
async fn unlink_cascades_to_employee_deletion() {
    let app = TestApp::new().await;
    let a = app.create_restaurant("A").await;
    let b = app.create_restaurant("B").await;
    let jane = app.create_jane(a, b).await;
    let jane_token = app.login("jane", "jane-pass").await;

    for (restaurant, date) in [(a, "2025-01-10"), (b, "2025-01-11")] {
        let (status, _) = app
            .admin("POST", "/api/shifts", Some(shift_body(restaurant, jane, date, "server")))
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    // Warm the calendar cache for A
    let calendar_a = format!("/api/restaurants/{a}/calendar?date=2025-01-10");
    let (_, grid) = app.admin("GET", &calendar_a, None).await;
    let count = |grid: &Value| {
        grid["cells"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| {
                c["shifts_by_role"]
                    .as_object()
                    .unwrap()
                    .values()
                    .map(|v| v.as_array().unwrap().len())
                    .sum::<usize>()
            })
            .sum::<usize>()
    };
    assert_eq!(count(&grid), 1);

    let (status, body) = app
        .admin("DELETE", &format!("/api/employees/{jane}/restaurants/{a}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "link_removed");

    // A's shift went with the link, B's stays; B is now primary
    let (_, grid) = app.admin("GET", &calendar_a, None).await;
    assert_eq!(count(&grid), 0);
    let (_, detail) = app.admin("GET", &format!("/api/employees/{jane}"), None).await;
    assert_eq!(detail["links"].as_array().unwrap().len(), 1);
    assert_eq!(detail["links"][0]["primary_location"], true);

    let (status, body) = app
        .admin("DELETE", &format!("/api/employees/{jane}/restaurants/{a}"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 8004);

    let (status, body) = app
        .admin("DELETE", &format!("/api/employees/{jane}/restaurants/{b}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "employee_deleted");

    let (status, body) = app.admin("GET", &format!("/api/employees/{jane}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 8001);

    let uri = format!("/api/restaurants/{b}/shifts?start_date=2025-01-01&end_date=2025-01-31");
    let (_, shifts) = app.admin("GET", &uri, None).await;
    assert!(shifts.as_array().unwrap().is_empty());

    // Her token no longer resolves
    let (status, _) = app.send("GET", "/api/auth/me", Some(&jane_token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn conflict_error_codes() {
    let app = TestApp::new().await;
    let a = app.create_restaurant("A").await;
    let b = app.create_restaurant("B").await;

    let (status, body) = app
        .admin("POST", "/api/restaurants", Some(json!({ "name": " A " })))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 4002);

    let (status, body) = app
        .admin("POST", "/api/restaurants", Some(json!({ "name": "   " })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2);

    // Employees start with at least one restaurant
    let (status, body) = app
        .admin(
            "POST",
            "/api/employees",
            Some(json!({ "name": "Orphan", "roles": ["server"], "restaurant_ids": [] })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2);
    let (status, body) = app
        .admin("POST", "/api/employees", Some(json!({ "name": "Orphan", "roles": ["server"] })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2);

    // Employee without account, linked to A only
    let (status, body) = app
        .admin(
            "POST",
            "/api/employees",
            Some(json!({ "name": "Marco", "roles": ["door", "gelato"], "restaurant_ids": [a] })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let marco = body["id"].as_i64().unwrap();

    let (status, body) = app.admin("GET", "/api/employees/without-account", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let link = format!("/api/employees/{marco}/restaurants/{a}");
    let (status, body) = app.admin("POST", &link, Some(json!({}))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 8003);

    let link = format!("/api/employees/{marco}/restaurants/{b}");
    let (status, body) = app
        .admin("POST", &link, Some(json!({ "primary_location": true })))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["primary_location"], true);

    // Not linked to a restaurant that does not exist
    let (status, body) = app
        .admin("POST", &format!("/api/employees/{marco}/restaurants/999"), Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 4001);

    let account = format!("/api/employees/{marco}/account");
    let (status, body) = app
        .admin("PUT", &account, Some(json!({ "username": "admin", "password": "secret-1" })))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 8002);

    let (status, _) = app
        .admin("PUT", &account, Some(json!({ "username": "marco", "password": "secret-1" })))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .admin("PUT", &account, Some(json!({ "username": "marco2", "password": "secret-1" })))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 8005);

    app.login("marco", "secret-1").await;

    let (status, body) = app.admin("DELETE", "/api/shifts/424242", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 5001);
}
