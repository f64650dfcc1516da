//! HTTP surface for the reservation functions.
//!
//! ```text
//! POST /swaig                   legacy agent webhook (basic auth)
//! POST /api/functions/{name}    structured outcome per call (basic auth)
//! GET  /api/reservations        masked snapshot (basic auth)
//! GET  /health                  liveness, unauthenticated
//! ```

mod auth;
mod handlers;
mod webhook_server;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::config::BasicCredentials;
use crate::dispatch::Dispatcher;

pub use auth::{AuthState, basic_auth_middleware};
pub use handlers::status_for;
pub use webhook_server::WebhookServer;

/// Maximum accepted request body.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// State shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Dispatcher,
}

/// Build the full router. Everything except `/health` sits behind basic auth.
pub fn router(dispatcher: Dispatcher, credentials: BasicCredentials) -> Router {
    let auth = AuthState::new(credentials);

    Router::new()
        .route("/swaig", post(handlers::swaig_handler))
        .route("/api/functions/{name}", post(handlers::function_handler))
        .route("/api/reservations", get(handlers::reservations_handler))
        .route_layer(middleware::from_fn_with_state(auth, basic_auth_middleware))
        .route("/health", get(handlers::health_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(DefaultBodyLimit::max(MAX_BODY_BYTES)),
        )
        .with_state(AppState { dispatcher })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use chrono::NaiveDateTime;
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::functions::{BoundArguments, FunctionRegistry, Parameter, ReservationFunction};
    use crate::reservations::{FixedClock, Outcome, ReservationService, ReservationStore};

    struct Exploding;

    #[async_trait]
    impl ReservationFunction for Exploding {
        fn name(&self) -> &str {
            "explode"
        }

        fn description(&self) -> &str {
            "Always panics"
        }

        fn parameters(&self) -> &[Parameter] {
            &[]
        }

        async fn invoke(&self, _args: BoundArguments, _service: &ReservationService) -> Outcome {
            panic!("kaboom");
        }
    }

    fn router_with(registry: FunctionRegistry) -> Router {
        let now = NaiveDateTime::parse_from_str("2026-10-19 12:00", "%Y-%m-%d %H:%M").unwrap();
        let service =
            ReservationService::spawn_with(ReservationStore::new(), Arc::new(FixedClock(now)));
        let dispatcher = Dispatcher::new(Arc::new(registry), service);
        router(dispatcher, BasicCredentials::new("admin", "secret"))
    }

    fn test_router() -> Router {
        router_with(FunctionRegistry::with_builtins())
    }

    fn exploding_router() -> Router {
        let mut registry = FunctionRegistry::with_builtins();
        registry.register(Arc::new(Exploding));
        router_with(registry)
    }

    fn authorization() -> String {
        format!("Basic {}", STANDARD.encode("admin:secret"))
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::AUTHORIZATION, authorization())
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_is_public() {
        let response = test_router()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({"status": "healthy"}));
    }

    #[tokio::test]
    async fn test_missing_credentials_challenge() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/swaig")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Basic realm=\"swaig\""
        );
    }

    #[tokio::test]
    async fn test_wrong_password_rejected() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .uri("/api/reservations")
                    .header(
                        header::AUTHORIZATION,
                        format!("Basic {}", STANDARD.encode("admin:nope")),
                    )
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_swaig_requires_json_content_type() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/swaig")
                    .header(header::AUTHORIZATION, authorization())
                    .header(header::CONTENT_TYPE, "text/plain")
                    .body(Body::from(r#"{"function": "get_reservation"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await, json!({"error": "Request must be JSON"}));
    }

    #[tokio::test]
    async fn test_swaig_missing_function() {
        let response = test_router()
            .oneshot(post_json("/swaig", json!({"arguments": {}})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({"error": "Missing 'function' in request"})
        );
    }

    #[tokio::test]
    async fn test_swaig_unknown_function() {
        let response = test_router()
            .oneshot(post_json("/swaig", json!({"function": "delete_everything"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await,
            json!({"error": "Function 'delete_everything' not found"})
        );
    }

    #[tokio::test]
    async fn test_swaig_bad_arguments_are_soft() {
        let response = test_router()
            .oneshot(post_json(
                "/swaig",
                json!({"function": "get_reservation", "arguments": {}}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({"response": "Invalid arguments for function 'get_reservation': missing required argument(s): 'phone_number'"})
        );
    }

    #[tokio::test]
    async fn test_swaig_signature_handshake() {
        let response = test_router()
            .oneshot(post_json(
                "/swaig",
                json!({"action": "get_signature", "functions": ["cancel_reservation"]}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let signatures = body.as_array().unwrap();
        assert_eq!(signatures.len(), 1);
        assert_eq!(signatures[0]["function"], "cancel_reservation");
        assert_eq!(signatures[0]["argument"]["required"], json!(["phone_number"]));
    }

    #[tokio::test]
    async fn test_structured_route_statuses() {
        let app = test_router();

        let response = app
            .clone()
            .oneshot(post_json(
                "/api/functions/get_reservation",
                json!({"phone_number": "+19185551234"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["kind"], "not_found");

        let response = app
            .clone()
            .oneshot(post_json(
                "/api/functions/create_reservation",
                json!({
                    "name": "John Doe",
                    "party_size": 4,
                    "date": "2026-10-20",
                    "time": "19:00",
                    "phone_number": "+19185551234"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["kind"], "success");
        assert_eq!(body["reservation"]["name"], "John Doe");

        let response = app
            .clone()
            .oneshot(post_json("/api/functions/nope", json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["kind"], "unknown_function");

        let response = app
            .clone()
            .oneshot(post_json(
                "/api/functions/cancel_reservation",
                json!({"phone": "+19185551234"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["kind"], "invalid_input");

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/reservations")
                    .header(header::AUTHORIZATION, authorization())
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body[0]["phone_number"], "+*******1234");
    }

    #[tokio::test]
    async fn test_swaig_function_panic_is_soft() {
        let app = exploding_router();

        let response = app
            .clone()
            .oneshot(post_json("/swaig", json!({"function": "explode"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({"response": "Invalid arguments for function 'explode': kaboom"})
        );

        // The server keeps answering after the fault.
        let response = app
            .oneshot(post_json(
                "/swaig",
                json!({"function": "get_reservation", "arguments": {"phone_number": "+19185551234"}}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({"response": "No reservation found for this phone number."})
        );
    }

    #[tokio::test]
    async fn test_structured_route_function_panic_is_internal() {
        let response = exploding_router()
            .oneshot(post_json("/api/functions/explode", json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["kind"], "internal");
        assert_eq!(body["message"], "Invalid arguments for function 'explode': kaboom");
    }

    #[tokio::test]
    async fn test_oversized_body_rejected() {
        let padding = "x".repeat(MAX_BODY_BYTES + 1);
        let response = test_router()
            .oneshot(post_json(
                "/swaig",
                json!({"function": "get_reservation", "pad": padding}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
