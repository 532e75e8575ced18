//! Handler tests for the events domain
//!
//! Drive the events router over the in-memory repository with real tokens.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum_helpers::{JwtAuth, JwtConfig};
use chrono::{Duration, Utc};
use domain_events::*;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt; // For oneshot()
use uuid::Uuid;

const SECRET: &str = "events-test-secret-that-is-at-least-32-chars";

struct TestApp {
    router: Router,
    jwt: JwtAuth,
}

impl TestApp {
    fn new() -> Self {
        let jwt = JwtAuth::new(&JwtConfig::new(SECRET));
        let service = EventService::new(InMemoryEventRepository::new());
        let router = events_router(EventsState::new(service, jwt.clone()));
        Self { router, jwt }
    }

    fn token_for(&self, user: Uuid, name: &str) -> String {
        self.jwt
            .create_token(&user.to_string(), &format!("{}@example.com", name), name)
            .unwrap()
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    async fn create(&self, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(json_request("POST", "/", Some(token), body)).await
    }
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

fn delete(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

fn event_body(title: &str, days_ahead: i64) -> Value {
    json!({
        "title": title,
        "description": "An evening of talks and pizza",
        "date": (Utc::now() + Duration::days(days_ahead)).to_rfc3339(),
        "time": "18:30",
        "location": "Berlin",
        "category": "Workshop",
        "maxAttendees": 50
    })
}

#[tokio::test]
async fn test_create_event() {
    let app = TestApp::new();
    let ada = Uuid::now_v7();
    let token = app.token_for(ada, "ada");

    let (status, json) = app.create(&token, event_body("Rust Meetup", 7)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "Event created successfully");
    assert_eq!(json["event"]["title"], "Rust Meetup");
    assert_eq!(json["event"]["category"], "Workshop");
    assert_eq!(json["event"]["status"], "upcoming");
    assert_eq!(json["event"]["price"], 0.0);
    assert_eq!(json["event"]["attendeeCount"], 0);
    assert_eq!(json["event"]["spotsRemaining"], 50);
    assert_eq!(json["event"]["organizer"]["_id"], ada.to_string());
    assert_eq!(json["event"]["organizer"]["name"], "ada");
}

#[tokio::test]
async fn test_create_requires_token() {
    let app = TestApp::new();
    let (status, json) = app
        .send(json_request("POST", "/", None, event_body("Rust Meetup", 7)))
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["message"], "No token, authorization denied");
}

#[tokio::test]
async fn test_create_rejects_invalid_token() {
    let app = TestApp::new();
    let (status, json) = app.create("not-a-jwt", event_body("Rust Meetup", 7)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["message"], "Token is not valid");
}

#[tokio::test]
async fn test_create_validation_errors() {
    let app = TestApp::new();
    let token = app.token_for(Uuid::now_v7(), "ada");

    let mut body = event_body("Rust Meetup", -1);
    body["time"] = json!("25:00");
    body["price"] = json!(-5);

    let (status, json) = app.create(&token, body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Validation failed");

    let errors = json["errors"].as_array().unwrap();
    let messages: Vec<(&str, &str)> = errors
        .iter()
        .map(|e| (e["field"].as_str().unwrap(), e["message"].as_str().unwrap()))
        .collect();
    assert!(messages.contains(&("date", "Event date must be in the future")));
    assert!(messages.contains(&("time", "Please enter a valid time in HH:MM format")));
    assert!(messages.contains(&("price", "Price cannot be negative")));
}

#[tokio::test]
async fn test_create_missing_and_mistyped_fields() {
    let app = TestApp::new();
    let token = app.token_for(Uuid::now_v7(), "ada");

    let mut body = event_body("Rust Meetup", 7);
    body.as_object_mut().unwrap().remove("title");
    let (status, json) = app.create(&token, body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Validation failed");
    assert_eq!(
        json["errors"],
        json!([{"field": "title", "message": "Title must be between 3 and 100 characters"}])
    );

    let mut body = event_body("Rust Meetup", 7);
    body["maxAttendees"] = json!("abc");
    let (status, json) = app.create(&token, body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        json["errors"],
        json!([{"field": "maxAttendees", "message": "Invalid value for maxAttendees"}])
    );
}

#[tokio::test]
async fn test_get_event_and_not_found() {
    let app = TestApp::new();
    let token = app.token_for(Uuid::now_v7(), "ada");
    let (_, created) = app.create(&token, event_body("Rust Meetup", 7)).await;
    let id = created["event"]["_id"].as_str().unwrap().to_string();

    let (status, json) = app.send(get(&format!("/{}", id), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["event"]["_id"], id.as_str());
    assert!(json.get("message").is_none());

    let (status, json) = app
        .send(get(&format!("/{}", Uuid::now_v7()), None))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["message"], "Event not found");

    let (status, json) = app.send(get("/definitely-not-an-id", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["message"], "Event not found");
}

#[tokio::test]
async fn test_list_pagination_and_filters() {
    let app = TestApp::new();
    let token = app.token_for(Uuid::now_v7(), "ada");
    for day in 1..=5 {
        app.create(&token, event_body(&format!("Rust Meetup {}", day), day))
            .await;
    }
    let mut social = event_body("Jazz Evening", 10);
    social["category"] = json!("Social");
    app.create(&token, social).await;

    let (status, json) = app.send(get("/?page=2&limit=4", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["events"].as_array().unwrap().len(), 2);
    assert_eq!(json["pagination"], json!({"current": 2, "pages": 2, "total": 6}));
    assert_eq!(json["events"][1]["title"], "Jazz Evening");

    let (_, json) = app.send(get("/?category=Social", None)).await;
    assert_eq!(json["pagination"]["total"], 1);

    let (_, json) = app.send(get("/?category=All", None)).await;
    assert_eq!(json["pagination"]["total"], 6);

    let (_, json) = app.send(get("/?search=jazz", None)).await;
    assert_eq!(json["events"][0]["title"], "Jazz Evening");

    let (status, _) = app.send(get("/?limit=101", None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, json) = app.send(get("/?category=Party", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["events"], json!([]));
    assert_eq!(json["pagination"]["total"], 0);
}

#[tokio::test]
async fn test_list_rejects_unparseable_page() {
    let app = TestApp::new();
    let (status, json) = app.send(get("/?page=abc", None)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Validation failed");
    assert_eq!(
        json["errors"],
        json!([{"field": "page", "message": "Invalid value for page"}])
    );
}

#[tokio::test]
async fn test_list_huge_page_is_empty() {
    let app = TestApp::new();
    let token = app.token_for(Uuid::now_v7(), "ada");
    app.create(&token, event_body("Rust Meetup", 7)).await;

    let (status, json) = app
        .send(get("/?page=1000000000000000001&limit=10", None))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["events"], json!([]));
    assert_eq!(json["pagination"]["total"], 1);
}

#[tokio::test]
async fn test_list_empty() {
    let app = TestApp::new();
    let (status, json) = app.send(get("/", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["events"], json!([]));
    assert_eq!(json["pagination"], json!({"current": 1, "pages": 0, "total": 0}));
}

#[tokio::test]
async fn test_update_only_by_organizer() {
    let app = TestApp::new();
    let ada = app.token_for(Uuid::now_v7(), "ada");
    let bob = app.token_for(Uuid::now_v7(), "bob");
    let (_, created) = app.create(&ada, event_body("Rust Meetup", 7)).await;
    let uri = format!("/{}", created["event"]["_id"].as_str().unwrap());

    let patch = json!({"title": "Rust Meetup (moved)", "price": 12.5});

    let (status, json) = app
        .send(json_request("PUT", &uri, Some(&bob), patch.clone()))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["message"], "Not authorized to update this event");

    let (status, json) = app.send(json_request("PUT", &uri, Some(&ada), patch)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Event updated successfully");
    assert_eq!(json["event"]["title"], "Rust Meetup (moved)");
    assert_eq!(json["event"]["price"], 12.5);
    assert_eq!(json["event"]["location"], "Berlin");
}

#[tokio::test]
async fn test_delete_only_by_organizer() {
    let app = TestApp::new();
    let ada = app.token_for(Uuid::now_v7(), "ada");
    let bob = app.token_for(Uuid::now_v7(), "bob");
    let (_, created) = app.create(&ada, event_body("Rust Meetup", 7)).await;
    let uri = format!("/{}", created["event"]["_id"].as_str().unwrap());

    let (status, json) = app.send(delete(&uri, &bob)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["message"], "Not authorized to delete this event");

    let (status, json) = app.send(delete(&uri, &ada)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({"success": true, "message": "Event deleted successfully"}));

    let (status, _) = app.send(get(&uri, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.send(delete(&uri, &ada)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_my_events() {
    let app = TestApp::new();
    let ada = app.token_for(Uuid::now_v7(), "ada");
    let bob = app.token_for(Uuid::now_v7(), "bob");
    app.create(&ada, event_body("Later", 9)).await;
    app.create(&ada, event_body("Sooner", 2)).await;
    app.create(&bob, event_body("Bob's Party", 3)).await;

    let (status, json) = app.send(get("/user/my-events", Some(&ada))).await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = json["events"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Sooner", "Later"]);

    let (status, _) = app.send(get("/user/my-events", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
