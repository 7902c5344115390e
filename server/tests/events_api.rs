//! End-to-end tests for the events API.
//!
//! The full router runs over `MemoryDocumentStore` with a JWT verifier keyed by
//! a test secret, exercising auth, validation, handlers and response shapes.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use chrono::{DateTime, Utc};
use events_server::auth::{Claims, JwtVerifier};
use events_server::routes::{create_routes, AppState};
use events_server::store::MemoryDocumentStore;
use http_body_util::BodyExt;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use tower::ServiceExt;

const SECRET: &[u8] = b"integration_test_secret";

struct TestApp {
    router: Router,
}

impl TestApp {
    fn new() -> Self {
        let state = AppState::new(
            Arc::new(MemoryDocumentStore::new()),
            Arc::new(JwtVerifier::new(SECRET)),
        );
        Self {
            router: create_routes(state),
        }
    }

    async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    async fn create(&self, body: Value) -> String {
        let response = self.send(post_json("/createEvent", body, Some(&token()))).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = json_body(response).await;
        body["id"].as_str().unwrap().to_string()
    }

    async fn get_by_id(&self, id: &str) -> Response {
        self.send(get(&format!("/getEventById?id={}", id), Some(&token())))
            .await
    }
}

fn token() -> String {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: "organizer-1".to_string(),
        email: Some("organizer@example.com".to_string()),
        exp: now + 3600,
        iat: Some(now),
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET)).unwrap()
}

fn with_auth(builder: axum::http::request::Builder, token: Option<&str>) -> axum::http::request::Builder {
    match token {
        Some(token) => builder.header(header::AUTHORIZATION, format!("Bearer {}", token)),
        None => builder,
    }
}

fn post_json(uri: &str, body: Value, token: Option<&str>) -> Request<Body> {
    with_auth(Request::post(uri), token)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn put_json(uri: &str, body: Value, token: Option<&str>) -> Request<Body> {
    with_auth(Request::put(uri), token)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    with_auth(Request::get(uri), token)
        .body(Body::empty())
        .unwrap()
}

fn delete(uri: &str, token: Option<&str>) -> Request<Body> {
    with_auth(Request::delete(uri), token)
        .body(Body::empty())
        .unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn launch() -> Value {
    json!({
        "title": "Launch",
        "eventType": "Webinar",
        "date": "2025-01-10T10:00:00Z",
        "location": "HQ",
        "organizer": "Alice",
    })
}

fn event(title: &str, event_type: &str, date: &str) -> Value {
    json!({
        "title": title,
        "eventType": event_type,
        "date": date,
        "location": "Main hall",
        "organizer": "Bob",
    })
}

fn timestamp(value: &Value) -> DateTime<Utc> {
    value.as_str().unwrap().parse().unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new();
    let response = app.send(get("/health", None)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "ok");
}

#[tokio::test]
async fn test_event_lifecycle() {
    let app = TestApp::new();

    let response = app.send(post_json("/createEvent", launch(), None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        json_body(response).await,
        json!({ "success": false, "message": "Unauthorized: No token provided." })
    );

    let response = app
        .send(post_json("/createEvent", launch(), Some(&token())))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    let id = body["id"].as_str().unwrap().to_string();
    assert!(!id.is_empty());

    let response = app.get_by_id(&id).await;
    assert_eq!(response.status(), StatusCode::OK);
    let record = json_body(response).await;
    assert_eq!(record["id"], id.as_str());
    assert_eq!(record["title"], "Launch");
    assert_eq!(record["eventType"], "Webinar");
    assert_eq!(record["location"], "HQ");
    assert_eq!(record["organizer"], "Alice");
    assert_eq!(
        timestamp(&record["date"]),
        "2025-01-10T10:00:00Z".parse::<DateTime<Utc>>().unwrap()
    );
    assert_eq!(record["createdAt"], record["updatedAt"]);

    let response = app
        .send(delete(&format!("/deleteEvent?id={}", id), Some(&token())))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({ "success": true, "message": "Event deleted successfully" })
    );

    let response = app.get_by_id(&id).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await["success"], false);
}

#[tokio::test]
async fn test_invalid_token_is_rejected() {
    let app = TestApp::new();

    let response = app
        .send(post_json("/createEvent", launch(), Some("not-a-token")))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        json_body(response).await["message"],
        "Unauthorized: Invalid token."
    );

    let expired = encode(
        &Header::default(),
        &Claims {
            sub: "organizer-1".to_string(),
            email: None,
            exp: Utc::now().timestamp() - 3600,
            iat: None,
        },
        &EncodingKey::from_secret(SECRET),
    )
    .unwrap();
    let response = app
        .send(get("/getEventById?id=anything", Some(&expired)))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_rejects_unknown_event_type() {
    let app = TestApp::new();
    let mut body = launch();
    body["eventType"] = json!("Hackathon");

    let response = app
        .send(post_json("/createEvent", body, Some(&token())))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Invalid input");
    let errors = body["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].as_str().unwrap().contains("eventType"));
}

#[tokio::test]
async fn test_create_reports_every_violation() {
    let app = TestApp::new();

    let response = app
        .send(post_json(
            "/createEvent",
            json!({ "eventType": "Webinar", "date": "not a date" }),
            Some(&token()),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert_eq!(
        body["errors"],
        json!([
            "\"title\" is required",
            "\"date\" must be in ISO 8601 date format",
            "\"location\" is required",
            "\"organizer\" is required",
        ])
    );
}

#[tokio::test]
async fn test_malformed_body_uses_validation_shape() {
    let app = TestApp::new();

    let request = Request::post("/createEvent")
        .header(header::AUTHORIZATION, format!("Bearer {}", token()))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.send(request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["message"], "Invalid input");

    let response = app
        .send(post_json("/createEvent", json!([1, 2]), Some(&token())))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await["errors"],
        json!(["\"value\" must be of type object"])
    );
}

#[tokio::test]
async fn test_get_all_events() {
    let app = TestApp::new();

    let response = app.send(get("/getAllEvents", None)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let first = app.create(launch()).await;
    let second = app
        .create(event("Rust meetup", "Meetup", "2025-02-01T18:00:00Z"))
        .await;

    let response = app.send(get("/getAllEvents", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let events = json_body(response).await;
    let mut ids: Vec<&str> = events
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["id"].as_str().unwrap())
        .collect();
    ids.sort();
    let mut expected = vec![first.as_str(), second.as_str()];
    expected.sort();
    assert_eq!(ids, expected);
}

#[tokio::test]
async fn test_get_by_id_requires_id() {
    let app = TestApp::new();

    let response = app.send(get("/getEventById", Some(&token()))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await["errors"],
        json!(["\"id\" is required"])
    );
}

#[tokio::test]
async fn test_update_event() {
    let app = TestApp::new();
    let id = app.create(launch()).await;
    let before = json_body(app.get_by_id(&id).await).await;

    let response = app
        .send(put_json(
            "/updateEvent",
            json!({ "id": id, "title": "Launch v2", "description": "Now with demos" }),
            Some(&token()),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({ "success": true, "message": "Event updated successfully" })
    );

    let after = json_body(app.get_by_id(&id).await).await;
    assert_eq!(after["id"], id.as_str());
    assert_eq!(after["title"], "Launch v2");
    assert_eq!(after["description"], "Now with demos");
    assert_eq!(after["location"], before["location"]);
    assert_eq!(after["organizer"], before["organizer"]);
    assert_eq!(after["eventType"], before["eventType"]);
    assert_eq!(after["createdAt"], before["createdAt"]);
    assert!(timestamp(&after["updatedAt"]) > timestamp(&before["updatedAt"]));
    assert!(timestamp(&after["createdAt"]) <= timestamp(&after["updatedAt"]));
}

#[tokio::test]
async fn test_update_requires_token() {
    let app = TestApp::new();
    let id = app.create(launch()).await;
    let before = json_body(app.get_by_id(&id).await).await;

    let response = app
        .send(put_json(
            "/updateEvent",
            json!({ "id": id, "title": "Hijacked" }),
            None,
        ))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        json_body(response).await,
        json!({ "success": false, "message": "Unauthorized: No token provided." })
    );

    let after = json_body(app.get_by_id(&id).await).await;
    assert_eq!(after, before);
}

#[tokio::test]
async fn test_operations_answer_any_method() {
    let app = TestApp::new();
    let id = app.create(launch()).await;

    let response = app
        .send(post_json(
            "/updateEvent",
            json!({ "id": id, "title": "Posted" }),
            Some(&token()),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(app.get_by_id(&id).await).await["title"], "Posted");

    let response = app
        .send(post_json("/getAllEvents", json!({}), None))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .send(get(&format!("/deleteEvent?id={}", id), Some(&token())))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(app.get_by_id(&id).await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_rejects_immutable_fields() {
    let app = TestApp::new();
    let id = app.create(launch()).await;

    let response = app
        .send(put_json(
            "/updateEvent",
            json!({ "id": id, "createdAt": "2000-01-01T00:00:00Z", "eventType": "Party" }),
            Some(&token()),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await["errors"],
        json!([
            "\"eventType\" must be one of [Conference, Meetup, Workshop, Webinar]",
            "\"createdAt\" is not allowed",
        ])
    );
}

#[tokio::test]
async fn test_update_missing_event_is_not_found() {
    let app = TestApp::new();

    let response = app
        .send(put_json(
            "/updateEvent",
            json!({ "id": "does-not-exist", "title": "x" }),
            Some(&token()),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.send(get("/getAllEvents", None)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_delete_twice() {
    let app = TestApp::new();
    let id = app.create(launch()).await;
    let uri = format!("/deleteEvent?id={}", id);

    let first = app.send(delete(&uri, Some(&token()))).await;
    assert_eq!(first.status(), StatusCode::OK);

    let second = app.send(delete(&uri, Some(&token()))).await;
    assert_eq!(second.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        json_body(second).await,
        json!({ "success": false, "message": "Event not found" })
    );
}

#[tokio::test]
async fn test_filter_without_predicates_matches_get_all() {
    let app = TestApp::new();

    let response = app.send(get("/filterEvents", None)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    app.create(launch()).await;
    app.create(event("Hands-on", "Workshop", "2025-03-01T09:00:00Z"))
        .await;

    let all = json_body(app.send(get("/getAllEvents", None)).await).await;
    let filtered = json_body(app.send(get("/filterEvents", None)).await).await;
    assert_eq!(filtered, all);
}

#[tokio::test]
async fn test_filter_by_event_type() {
    let app = TestApp::new();
    app.create(launch()).await;
    app.create(event("Hands-on", "Workshop", "2025-03-01T09:00:00Z"))
        .await;
    app.create(event("Deep dive", "Workshop", "2025-04-01T09:00:00Z"))
        .await;

    let response = app
        .send(get("/filterEvents?eventType=Workshop", None))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let events = json_body(response).await;
    let events = events.as_array().unwrap();
    assert_eq!(events.len(), 2);
    assert!(events.iter().all(|e| e["eventType"] == "Workshop"));

    let response = app
        .send(get("/filterEvents?eventType=Conference", None))
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_filter_date_bounds_are_inclusive() {
    let app = TestApp::new();
    app.create(event("Early", "Meetup", "2025-03-01T00:00:00Z")).await;
    app.create(event("Middle", "Meetup", "2025-03-15T12:00:00Z")).await;
    app.create(event("Late", "Meetup", "2025-03-31T00:00:00Z")).await;

    let response = app
        .send(get(
            "/filterEvents?startDate=2025-03-01&endDate=2025-03-15T12:00:00Z",
            None,
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let events = json_body(response).await;
    let mut titles: Vec<&str> = events
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["title"].as_str().unwrap())
        .collect();
    titles.sort();
    assert_eq!(titles, vec!["Early", "Middle"]);

    let response = app
        .send(get(
            "/filterEvents?eventType=Meetup&startDate=2025-03-16T00:00:00%2B00:00",
            None,
        ))
        .await;
    let events = json_body(response).await;
    assert_eq!(events.as_array().unwrap().len(), 1);
    assert_eq!(events[0]["title"], "Late");
}

#[tokio::test]
async fn test_filter_rejects_bad_dates() {
    let app = TestApp::new();

    let response = app
        .send(get("/filterEvents?startDate=last-week&eventType=Gala", None))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await["errors"],
        json!([
            "\"eventType\" must be one of [Conference, Meetup, Workshop, Webinar]",
            "\"startDate\" must be in ISO 8601 date format",
        ])
    );
}
