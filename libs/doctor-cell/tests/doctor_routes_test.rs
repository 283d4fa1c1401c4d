use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use doctor_cell::router::doctor_routes;
use shared_database::collections::DOCTORS;
use shared_utils::test_utils::{TestContext, TestUser};

const ADMIN_EMAIL: &str = "admin@example.com";

async fn admin_context() -> (TestContext, String) {
    let context = TestContext::default();
    let admin = TestUser::admin(ADMIN_EMAIL);
    context.seed_user(&admin).await;
    let token = context.token_for(&admin);
    (context, token)
}

fn request(method: &str, uri: &str, token: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {}", token))
        .header("content-type", "application/json");

    match body {
        Some(body) => builder.body(Body::from(body.to_string())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_add_list_and_remove_doctor() {
    let (context, token) = admin_context().await;
    let uri = format!("/doctors?email={}", ADMIN_EMAIL);

    let (status, inserted) = send(
        doctor_routes(context.ctx.clone()),
        request(
            "POST",
            &uri,
            &token,
            Some(json!({
                "name": "Dr. Strange",
                "email": "strange@example.com",
                "specialty": "Oral Surgery",
                "image": "https://img.example.com/strange.png"
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(inserted["acknowledged"], true);
    let id = inserted["insertedId"].as_str().unwrap().to_string();

    let (status, doctors) = send(doctor_routes(context.ctx.clone()), request("GET", &uri, &token, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(doctors[0]["specialty"], "Oral Surgery");
    assert_eq!(doctors[0]["_id"], id.as_str());

    let delete_uri = format!("/doctors/{}?email={}", id, ADMIN_EMAIL);
    let (status, deleted) = send(doctor_routes(context.ctx.clone()), request("DELETE", &delete_uri, &token, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted, json!({ "acknowledged": true, "deletedCount": 1 }));

    let (_, again) = send(doctor_routes(context.ctx.clone()), request("DELETE", &delete_uri, &token, None)).await;
    assert_eq!(again["deletedCount"], 0);
    assert_eq!(context.store.count(DOCTORS).await, 0);
}

#[tokio::test]
async fn test_add_doctor_without_email() {
    let (context, token) = admin_context().await;
    let uri = format!("/doctors?email={}", ADMIN_EMAIL);

    let (status, inserted) = send(
        doctor_routes(context.ctx.clone()),
        request(
            "POST",
            &uri,
            &token,
            Some(json!({
                "name": "Dr. Quinn",
                "specialty": "Pediatric Dental",
                "image": "https://img.example.com/quinn.png"
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(inserted["acknowledged"], true);

    let (_, doctors) = send(doctor_routes(context.ctx.clone()), request("GET", &uri, &token, None)).await;
    assert_eq!(doctors[0]["name"], "Dr. Quinn");
    assert!(doctors[0].get("email").is_none());
}

#[tokio::test]
async fn test_doctor_routes_reject_non_admins() {
    let context = TestContext::default();
    let patient = TestUser::patient("patient@example.com");
    context.seed_user(&patient).await;
    let token = context.token_for(&patient);

    let (status, body) = send(
        doctor_routes(context.ctx.clone()),
        request("GET", "/doctors?email=patient@example.com", &token, None),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, json!({ "message": "Forbidden access!" }));

    let (status, _) = send(
        doctor_routes(context.ctx.clone()),
        request(
            "POST",
            "/doctors?email=patient@example.com",
            &token,
            Some(json!({ "name": "X", "email": "x@example.com", "specialty": "Y" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(context.store.count(DOCTORS).await, 0);
}

#[tokio::test]
async fn test_admin_must_name_themselves_in_query() {
    let (context, token) = admin_context().await;

    let (status, _) = send(
        doctor_routes(context.ctx.clone()),
        request("GET", "/doctors?email=someone-else@example.com", &token, None),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
