//! 反馈 API 端到端测试
//!
//! 使用内存仓储驱动完整路由（含中间件），不依赖数据库。

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use fake::{
    Fake,
    faker::{internet::en::SafeEmail, lorem::en::Sentence, name::en::Name},
};
use feedback_service::{AppState, InMemoryFeedbackRepository, routes, validation::normalize_email};
use feedback_shared::config::AppConfig;
use serde_json::{Value, json};
use tower::ServiceExt;

const BASE: &str = "/api/v1/feedback";

fn test_app() -> Router {
    let state = AppState::new(Arc::new(InMemoryFeedbackRepository::new()), true);
    routes::app(state, &AppConfig::default())
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn random_input() -> Value {
    let name: String = Name().fake();
    let email: String = SafeEmail().fake();
    let comment: String = Sentence(3..6).fake();
    let rating: i32 = (1..6).fake();
    json!({
        "name": name,
        "email": email,
        "eventName": "Annual Workshop",
        "division": "HRD",
        "rating": rating,
        "comment": comment,
    })
}

async fn create(app: &Router, input: Value) -> Value {
    let (status, body) = send(app, "POST", BASE, Some(input)).await;
    assert_eq!(status, StatusCode::CREATED, "body: {}", body);
    body["data"].clone()
}

#[tokio::test]
async fn test_create_example_feedback() {
    let app = test_app();

    let (status, body) = send(
        &app,
        "POST",
        BASE,
        Some(json!({
            "name": "John Doe",
            "email": "john@x.com",
            "eventName": "Workshop",
            "division": "LnT",
            "rating": 5
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Feedback created successfully");
    assert_eq!(body["data"]["status"], "open");
    assert_eq!(body["data"]["rating"], 5);
    assert_eq!(body["data"]["division"], "LnT");
    assert!(body["data"]["comment"].is_null());
    assert!(body["data"]["suggestion"].is_null());
    assert!(body["data"]["id"].as_i64().unwrap() >= 1);
    assert!(body["data"]["createdAt"].is_string());
}

#[tokio::test]
async fn test_create_missing_field_reports_that_field() {
    let app = test_app();
    let mut input = random_input();
    input.as_object_mut().unwrap().remove("eventName");

    let (status, body) = send(&app, "POST", BASE, Some(input)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Validation failed");
    let errors = body["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["field"], "eventName");
    assert_eq!(errors[0]["message"], "Event name is required");

    // 校验失败时不落库
    let (_, list) = send(&app, "GET", BASE, None).await;
    assert_eq!(list["data"]["pagination"]["total"], 0);
}

#[tokio::test]
async fn test_create_rating_out_of_range() {
    let app = test_app();
    for rating in [json!(0), json!(6), json!("7"), json!(2.5)] {
        let mut input = random_input();
        input["rating"] = rating;

        let (status, body) = send(&app, "POST", BASE, Some(input)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"][0]["field"], "rating");
        assert_eq!(
            body["errors"][0]["message"],
            "Rating must be an integer between 1 and 5"
        );
    }
}

#[tokio::test]
async fn test_create_accepts_integral_float_rating() {
    let app = test_app();
    let mut input = random_input();
    input["rating"] = json!(5.0);

    let created = create(&app, input).await;

    assert_eq!(created["rating"], 5);
}

#[tokio::test]
async fn test_create_from_form_body() {
    let app = test_app();
    let request = Request::builder()
        .method("POST")
        .uri(BASE)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(
            "name=Jane+Doe&email=Jane%40Example.com&eventName=Open+House\
             &division=PR&rating=4&comment=&suggestion=More+snacks",
        ))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();

    let data = &body["data"];
    assert_eq!(data["name"], "Jane Doe");
    assert_eq!(data["email"], "jane@example.com");
    assert_eq!(data["eventName"], "Open House");
    assert_eq!(data["division"], "PR");
    assert_eq!(data["rating"], 4);
    assert!(data["comment"].is_null());
    assert_eq!(data["suggestion"], "More snacks");
}

#[tokio::test]
async fn test_form_body_validation_errors() {
    let app = test_app();
    let request = Request::builder()
        .method("POST")
        .uri(BASE)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from("name=Jane&email=jane%40example.com&division=PR&rating=9"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["eventName", "rating"]);
}

#[tokio::test]
async fn test_update_rejects_null_rating() {
    let app = test_app();
    let created = create(&app, random_input()).await;
    let uri = format!("{}/{}", BASE, created["id"]);

    let (status, body) = send(&app, "PUT", &uri, Some(json!({"rating": null}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "rating");
    let (_, fetched) = send(&app, "GET", &uri, None).await;
    assert_eq!(fetched["data"], created);
}

#[tokio::test]
async fn test_create_then_get_round_trip() {
    let app = test_app();
    let input = random_input();
    let created = create(&app, input.clone()).await;
    let id = created["id"].as_i64().unwrap();

    let (status, body) = send(&app, "GET", &format!("{}/{}", BASE, id), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Feedback retrieved successfully");
    let fetched = &body["data"];
    assert_eq!(fetched, &created);
    assert_eq!(fetched["name"], input["name"].as_str().unwrap().trim());
    assert_eq!(
        fetched["email"],
        normalize_email(input["email"].as_str().unwrap())
    );
    assert_eq!(fetched["eventName"], input["eventName"]);
    assert_eq!(fetched["division"], input["division"]);
    assert_eq!(fetched["rating"], input["rating"]);
    assert_eq!(fetched["comment"], input["comment"].as_str().unwrap().trim());
    assert_eq!(fetched["status"], "open");
}

#[tokio::test]
async fn test_repeated_get_is_idempotent() {
    let app = test_app();
    let created = create(&app, random_input()).await;
    let uri = format!("{}/{}", BASE, created["id"]);

    let (_, first) = send(&app, "GET", &uri, None).await;
    let (_, second) = send(&app, "GET", &uri, None).await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_partial_update_changes_only_given_fields() {
    let app = test_app();
    let created = create(&app, random_input()).await;
    let uri = format!("{}/{}", BASE, created["id"]);

    let (status, body) = send(
        &app,
        "PUT",
        &uri,
        Some(json!({ "status": "in_review", "comment": null })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Feedback updated successfully");
    let updated = &body["data"];
    assert_eq!(updated["status"], "in_review");
    assert!(updated["comment"].is_null());
    let untouched = [
        "id",
        "name",
        "email",
        "eventName",
        "division",
        "rating",
        "suggestion",
        "createdAt",
    ];
    for field in untouched {
        assert_eq!(updated[field], created[field], "field {} changed", field);
    }
}

#[tokio::test]
async fn test_update_missing_and_invalid() {
    let app = test_app();

    let uri = format!("{}/999", BASE);
    let (status, body) = send(&app, "PUT", &uri, Some(json!({"rating": 3}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Feedback not found");

    let created = create(&app, random_input()).await;
    let (status, body) = send(
        &app,
        "PUT",
        &format!("{}/{}", BASE, created["id"]),
        Some(json!({"division": "Sales"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "division");
}

#[tokio::test]
async fn test_delete_twice_returns_not_found() {
    let app = test_app();
    let created = create(&app, random_input()).await;
    let uri = format!("{}/{}", BASE, created["id"]);

    let (status, body) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"success": true, "message": "Feedback deleted successfully"})
    );

    let (status, body) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Feedback not found");

    let (status, _) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_nonexistent_returns_not_found() {
    let app = test_app();
    let uri = format!("{}/12345", BASE);
    let (status, body) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_pagination_second_page() {
    let app = test_app();
    for _ in 0..12 {
        create(&app, random_input()).await;
    }

    let (status, body) = send(&app, "GET", &format!("{}?page=2&limit=5", BASE), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Feedbacks retrieved successfully");
    assert_eq!(body["data"]["feedbacks"].as_array().unwrap().len(), 5);
    assert_eq!(
        body["data"]["pagination"],
        json!({"page": 2, "limit": 5, "total": 12, "totalPages": 3})
    );

    let (_, last) = send(&app, "GET", &format!("{}?page=3&limit=5", BASE), None).await;
    assert_eq!(last["data"]["feedbacks"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_list_is_newest_first_and_filterable() {
    let app = test_app();
    let mut ids = Vec::new();
    for division in ["LnT", "PR", "LnT"] {
        let mut input = random_input();
        input["division"] = json!(division);
        ids.push(create(&app, input).await["id"].as_i64().unwrap());
    }

    let (_, body) = send(&app, "GET", BASE, None).await;
    let listed: Vec<i64> = body["data"]["feedbacks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["id"].as_i64().unwrap())
        .collect();
    assert_eq!(listed, vec![ids[2], ids[1], ids[0]]);

    let (_, body) = send(&app, "GET", &format!("{}?division=LnT", BASE), None).await;
    assert_eq!(body["data"]["pagination"]["total"], 2);

    send(
        &app,
        "PUT",
        &format!("{}/{}", BASE, ids[0]),
        Some(json!({"status": "resolved"})),
    )
    .await;
    let uri = format!("{}?status=resolved&division=LnT", BASE);
    let (_, body) = send(&app, "GET", &uri, None).await;
    assert_eq!(body["data"]["feedbacks"][0]["id"], ids[0]);
    assert_eq!(body["data"]["pagination"]["total"], 1);
}

#[tokio::test]
async fn test_health_check() {
    let app = test_app();
    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Server is running");
}
