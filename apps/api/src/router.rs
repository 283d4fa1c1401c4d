use std::sync::Arc;

use axum::{routing::get, Router};

use appointment_cell::router::appointment_routes;
use auth_cell::router::auth_routes;
use doctor_cell::router::doctor_routes;
use payment_cell::router::payment_routes;
use shared_database::AppContext;
use user_cell::router::user_routes;

pub const BANNER: &str = "Doctors Portal server is running!";

// Paths are flat; each cell owns its top-level segments
pub fn create_router(state: Arc<AppContext>) -> Router {
    Router::new()
        .route("/", get(|| async { BANNER }))
        .merge(appointment_routes(state.clone()))
        .merge(user_routes(state.clone()))
        .merge(doctor_routes(state.clone()))
        .merge(payment_routes(state.clone()))
        .merge(auth_routes(state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use shared_utils::test_utils::{TestContext, TestUser};

    async fn fetch(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn test_banner() {
        let context = TestContext::default();
        let (status, body) = fetch(create_router(context.ctx.clone()), "/").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, BANNER.as_bytes());
    }

    #[tokio::test]
    async fn test_every_cell_is_mounted() {
        let context = TestContext::default();
        context.seed_user(&TestUser::patient("patient@example.com")).await;

        for uri in [
            "/infos",
            "/appointmentServices",
            "/v2/appointmentServices?date=2024-01-01",
            "/appointmentSpecialty",
            "/bookings?email=patient@example.com",
            "/users/admin/patient@example.com",
            "/jwt?email=patient@example.com",
        ] {
            let (status, _) = fetch(create_router(context.ctx.clone()), uri).await;
            assert_eq!(status, StatusCode::OK, "GET {}", uri);
        }

        let (status, body) = fetch(create_router(context.ctx.clone()), "/doctors").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body, json!({ "message": "Unauthorized access!" }));
    }

    #[tokio::test]
    async fn test_issued_token_opens_guarded_routes() {
        let context = TestContext::default();
        context.seed_user(&TestUser::admin("admin@example.com")).await;

        let (_, body) = fetch(create_router(context.ctx.clone()), "/jwt?email=admin@example.com").await;
        let token: Value = serde_json::from_slice(&body).unwrap();
        let token = token["accessToken"].as_str().unwrap().to_string();

        let request = Request::builder()
            .uri("/users?email=admin@example.com")
            .header("authorization", format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();
        let response = create_router(context.ctx.clone()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
