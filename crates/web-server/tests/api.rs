//! Drives the router end to end over an in-memory repository.

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use core_types::NewEmployee;
use database::memory::InMemoryRepository;
use serde_json::{json, Value};
use service::EmployeeService;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use web_server::{build_router, AppState};

async fn app_with(employees: Vec<NewEmployee>) -> Router {
    let repo = InMemoryRepository::seeded(employees).await.unwrap();
    let state = Arc::new(AppState {
        employees: EmployeeService::new(Arc::new(repo)),
    });
    build_router(state, Duration::from_secs(5))
}

async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn names(value: &Value) -> Vec<&str> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["name"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn health_reports_ok() {
    let (status, body) = send(app_with(vec![]).await, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "OK");
}

#[tokio::test]
async fn create_returns_created_employee() {
    let app = app_with(vec![]).await;
    let (status, body) = send(
        app.clone(),
        Method::POST,
        "/api/employees",
        Some(json!({ "name": "Alice", "phone": "+7701", "city": "Almaty" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 1);
    assert_eq!(body["name"], "Alice");

    let (status, body) = send(app, Method::GET, "/api/employees/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["phone"], "+7701");
}

#[tokio::test]
async fn create_with_missing_field_is_bad_request() {
    let (status, body) = send(
        app_with(vec![]).await,
        Method::POST,
        "/api/employees",
        Some(json!({ "name": "Alice", "city": "Almaty" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "phone");
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let app = app_with(vec![]).await;
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/employees")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn duplicate_phone_is_conflict() {
    let app = app_with(vec![NewEmployee::new("Alice", "+7701", "Almaty")]).await;
    let (status, _) = send(
        app,
        Method::POST,
        "/api/employees",
        Some(json!({ "name": "Alicia", "phone": "+7701", "city": "Astana" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn unknown_and_malformed_ids() {
    let app = app_with(vec![]).await;
    let (status, _) = send(app.clone(), Method::GET, "/api/employees/404", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(app, Method::GET, "/api/employees/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_replaces_and_missing_update_is_not_found() {
    let app = app_with(vec![NewEmployee::new("Alice", "+7701", "Almaty")]).await;
    let (status, body) = send(
        app.clone(),
        Method::PUT,
        "/api/employees/1",
        Some(json!({ "name": "Alice Smith", "phone": "+7709", "city": "Astana" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "id": 1, "name": "Alice Smith", "phone": "+7709", "city": "Astana" }));

    let (status, _) = send(
        app,
        Method::PUT,
        "/api/employees/99",
        Some(json!({ "name": "Ghost", "phone": "+7799", "city": "Nowhere" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_then_delete_is_not_found() {
    let app = app_with(vec![NewEmployee::new("Alice", "+7701", "Almaty")]).await;
    let (status, _) = send(app.clone(), Method::DELETE, "/api/employees/1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(app, Method::DELETE, "/api/employees/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_is_in_insertion_order() {
    let app = app_with(vec![
        NewEmployee::new("Zed", "1", "Almaty"),
        NewEmployee::new("Ann", "2", "Astana"),
    ])
    .await;
    let (status, body) = send(app, Method::GET, "/api/employees", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body), vec!["Zed", "Ann"]);
}

#[tokio::test]
async fn search_ranks_and_validates() {
    let app = app_with(vec![
        NewEmployee::new("John Smith", "+7701", "Almaty"),
        NewEmployee::new("John Doe", "+7702", "Astana"),
        NewEmployee::new("Ann", "555", "Johnstown"),
    ])
    .await;

    let (status, body) = send(app.clone(), Method::GET, "/api/employees/search?q=john", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body), vec!["John Doe", "John Smith", "Ann"]);

    let (status, body) = send(app.clone(), Method::GET, "/api/employees/search?q=j", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "query");

    let (status, _) = send(app, Method::GET, "/api/employees/search", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn city_phone_and_stats_lookups() {
    let app = app_with(vec![
        NewEmployee::new("Carol", "1", "Almaty"),
        NewEmployee::new("Alice", "2", "Almaty"),
        NewEmployee::new("Bob", "3", "Almaty"),
        NewEmployee::new("Dave", "4", "Astana"),
    ])
    .await;

    let (status, body) = send(app.clone(), Method::GET, "/api/employees/city/almaty", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body), vec!["Alice", "Bob", "Carol"]);

    let (status, body) = send(app.clone(), Method::GET, "/api/employees/phone/4", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Dave");

    let (status, _) = send(app.clone(), Method::GET, "/api/employees/phone/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(app, Method::GET, "/api/employees/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "total_count": 4, "cities_count": 2, "most_common_city": "Almaty" })
    );
}

#[tokio::test]
async fn search_matches_wildcards_literally() {
    let app = app_with(vec![
        NewEmployee::new("50% Off", "1", "Almaty"),
        NewEmployee::new("500 Club", "2", "Almaty"),
        NewEmployee::new("snake_case", "3", "Astana"),
        NewEmployee::new("snakeXcase", "4", "Astana"),
    ])
    .await;

    let (status, body) = send(app.clone(), Method::GET, "/api/employees/search?q=50%25", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body), vec!["50% Off"]);

    let (status, body) = send(app, Method::GET, "/api/employees/search?q=e_c", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body), vec!["snake_case"]);
}

#[tokio::test]
async fn whitespace_values_are_accepted_and_looked_up_exactly() {
    let app = app_with(vec![]).await;
    let (status, body) = send(
        app.clone(),
        Method::POST,
        "/api/employees",
        Some(json!({ "name": " ", "phone": " +7701", "city": "Almaty" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], " ");

    let (status, body) = send(app, Method::GET, "/api/employees/phone/%20+7701", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["phone"], " +7701");
}
