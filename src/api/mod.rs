// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    body::Body,
    http::Request,
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    models::{
        LoginRequest, LoginResponse, MessageResponse, OrderConfirmationRequest,
        OrderConfirmationResponse, OrderItem, PublicUser, SignupRequest,
    },
    state::AppState,
    validation::FieldError,
};

pub mod health;
pub mod orders;
pub mod rate_limit;
pub mod users;

pub fn router(state: AppState) -> Router {
    let user_routes = Router::new()
        .route(
            "/signup",
            post(users::signup).route_layer(middleware::from_fn_with_state(
                state.clone(),
                rate_limit::signup_rate_limit,
            )),
        )
        .route("/verify/{token}", get(users::verify_email))
        .route("/login", post(users::login))
        .route(
            "/send-order-confirmation",
            post(orders::send_order_confirmation).route_layer(middleware::from_fn_with_state(
                state.clone(),
                rate_limit::email_rate_limit,
            )),
        );

    Router::new()
        .nest("/api/user", user_routes)
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
                    let request_id = req
                        .headers()
                        .get("x-request-id")
                        .and_then(|value| value.to_str().ok())
                        .unwrap_or("-");
                    tracing::info_span!(
                        "http_request",
                        method = %req.method(),
                        path = %req.uri().path(),
                        request_id = %request_id,
                    )
                }))
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(CorsLayer::permissive()),
        )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        users::signup,
        users::verify_email,
        users::login,
        orders::send_order_confirmation,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            SignupRequest,
            LoginRequest,
            LoginResponse,
            MessageResponse,
            PublicUser,
            OrderItem,
            OrderConfirmationRequest,
            OrderConfirmationResponse,
            FieldError,
            health::HealthResponse,
            health::ReadyResponse,
            health::HealthChecks
        )
    ),
    tags(
        (name = "Users", description = "Signup, email verification and login"),
        (name = "Orders", description = "Order confirmation mail"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        auth::VerificationClaims,
        config::RateLimitSettings,
        policy::FixedWindowLimiter,
        testing::{test_app, test_tokens, verify_token_in},
    };
    use axum::{
        body::to_bytes,
        http::{header, Method, StatusCode},
        response::Response,
    };
    use chrono::{Duration as ChronoDuration, Utc};
    use std::{sync::Arc, time::Duration};
    use tower::ServiceExt;

    fn json_request(method: Method, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_string(response: Response) -> String {
        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(body_bytes.to_vec()).unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        serde_json::from_str(&body_string(response).await).unwrap()
    }

    fn ann_signup() -> serde_json::Value {
        serde_json::json!({ "name": "Ann", "email": "ann@x.com", "password": "secret1" })
    }

    #[tokio::test]
    async fn signup_verify_login_scenario() {
        let app = test_app();
        let router = router(app.state.clone());

        let response = router
            .clone()
            .oneshot(json_request(Method::POST, "/api/user/signup", ann_signup()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "message": "Verification email sent" })
        );

        let token = verify_token_in(&app.mailer.sent()[0]);
        let response = router
            .clone()
            .oneshot(get_request(&format!("/api/user/verify/{token}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/plain"));
        assert_eq!(
            body_string(response).await,
            "Email verified successfully. You can now log in."
        );

        let response = router
            .oneshot(json_request(
                Method::POST,
                "/api/user/login",
                serde_json::json!({ "email": "ann@x.com", "password": "secret1" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["message"], "Login successful");
        assert!(body["token"].as_str().unwrap().split('.').count() == 3);
        assert_eq!(body["user"]["name"], "Ann");
        assert_eq!(body["user"]["email"], "ann@x.com");
        assert!(body["user"]["id"].is_string());
        assert!(body["user"].get("password_hash").is_none());
    }

    #[tokio::test]
    async fn duplicate_signup_is_rejected() {
        let app = test_app();
        let router = router(app.state);

        router
            .clone()
            .oneshot(json_request(Method::POST, "/api/user/signup", ann_signup()))
            .await
            .unwrap();
        let response = router
            .oneshot(json_request(Method::POST, "/api/user/signup", ann_signup()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["message"], "User already exists");
    }

    #[tokio::test]
    async fn expired_link_asks_to_sign_up_again() {
        let app = test_app();
        let router = router(app.state);
        router
            .clone()
            .oneshot(json_request(Method::POST, "/api/user/signup", ann_signup()))
            .await
            .unwrap();

        let expired = test_tokens()
            .issue_at(
                VerificationClaims {
                    name: "Ann".to_string(),
                    email: "ann@x.com".to_string(),
                },
                Duration::from_secs(3600),
                Utc::now() - ChronoDuration::hours(2),
            )
            .unwrap();

        let response = router
            .oneshot(get_request(&format!("/api/user/verify/{expired}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_string(response).await,
            "Verification link has expired. Please sign up again."
        );
    }

    #[tokio::test]
    async fn malformed_json_is_validation_error() {
        let app = test_app();
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/user/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let response = router(app.state).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["message"], "Validation failed");
        assert_eq!(body["errors"][0]["field"], "body");
    }

    #[tokio::test]
    async fn sixth_signup_from_one_address_is_limited() {
        let app = test_app();
        let gate = Arc::new(FixedWindowLimiter::new(RateLimitSettings::default()));
        let state = app.state.with_gates(gate, Arc::new(FixedWindowLimiter::new(
            RateLimitSettings::default(),
        )));
        let router = router(state);

        for i in 0..5 {
            let body = serde_json::json!({
                "name": "Ann",
                "email": format!("ann{i}@x.com"),
                "password": "secret1"
            });
            let mut request = json_request(Method::POST, "/api/user/signup", body);
            request
                .headers_mut()
                .insert("x-forwarded-for", "203.0.113.5".parse().unwrap());
            let response = router.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::CREATED);
        }

        let mut request = json_request(Method::POST, "/api/user/signup", ann_signup());
        request
            .headers_mut()
            .insert("x-forwarded-for", "203.0.113.5".parse().unwrap());
        let response = router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(response.headers().contains_key(header::RETRY_AFTER));
        assert_eq!(
            body_string(response).await,
            "Too many signup attempts. Try again later."
        );

        // Login is not gated.
        let response = router
            .oneshot(json_request(
                Method::POST,
                "/api/user/login",
                serde_json::json!({ "email": "ann0@x.com", "password": "secret1" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn order_confirmation_with_no_items_sends_nothing() {
        let app = test_app();
        let response = router(app.state)
            .oneshot(json_request(
                Method::POST,
                "/api/user/send-order-confirmation",
                serde_json::json!({
                    "userEmail": "bob@x.com",
                    "userName": "Bob",
                    "orderId": "A-1",
                    "orderItems": [],
                    "orderTotal": 0
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(app.mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn order_total_may_be_a_numeric_string() {
        let app = test_app();
        let response = router(app.state)
            .oneshot(json_request(
                Method::POST,
                "/api/user/send-order-confirmation",
                serde_json::json!({
                    "userEmail": "bob@x.com",
                    "userName": "Bob",
                    "orderId": "A-1",
                    "orderItems": [{ "name": "Mug", "quantity": 1, "price": 9.99 }],
                    "orderTotal": "9.99"
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(app.mailer.sent().len(), 2);
    }

    #[tokio::test]
    async fn responses_carry_request_id() {
        let app = test_app();
        let response = router(app.state)
            .oneshot(get_request("/health/live"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn openapi_document_lists_user_routes() {
        let app = test_app();
        let response = router(app.state)
            .oneshot(get_request("/api-doc/openapi.json"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let doc = body_json(response).await;
        assert!(doc["paths"]["/api/user/signup"].is_object());
        assert!(doc["paths"]["/api/user/verify/{token}"].is_object());
    }
}
