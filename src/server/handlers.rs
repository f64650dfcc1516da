//! Route handlers.

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;

use super::AppState;
use crate::dispatch::{DispatchError, FunctionCall, NormalizeError, WebhookRequest, normalize, parse_body};
use crate::functions::Arguments;
use crate::reservations::OutcomeKind;

/// HTTP status for each outcome kind on the structured route.
pub fn status_for(kind: OutcomeKind) -> StatusCode {
    match kind {
        OutcomeKind::Success => StatusCode::OK,
        OutcomeKind::NotFound => StatusCode::NOT_FOUND,
        OutcomeKind::Conflict | OutcomeKind::AlreadyExists => StatusCode::CONFLICT,
        OutcomeKind::InvalidInput => StatusCode::BAD_REQUEST,
        OutcomeKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|mime| {
            let mime = mime.trim().to_ascii_lowercase();
            mime == "application/json" || mime.ends_with("+json")
        })
        .unwrap_or(false)
}

fn legacy_error(status: StatusCode, message: impl ToString) -> Response {
    (status, Json(json!({ "error": message.to_string() }))).into_response()
}

fn legacy_reply(message: impl ToString) -> Response {
    (StatusCode::OK, Json(json!({ "response": message.to_string() }))).into_response()
}

/// POST /swaig
///
/// Every reply the agent can act on is a 200 with a `response` string.
/// Only malformed requests and unknown functions use error statuses.
pub async fn swaig_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if !is_json(&headers) {
        return legacy_error(StatusCode::BAD_REQUEST, NormalizeError::NotJson);
    }

    let request = match parse_body(&body).and_then(normalize) {
        Ok(request) => request,
        Err(NormalizeError::MalformedArguments { function, reason }) => {
            return legacy_reply(DispatchError::InvalidArguments { function, reason });
        }
        Err(e) => return legacy_error(StatusCode::BAD_REQUEST, e),
    };

    let call = match request {
        WebhookRequest::Signature { functions } => {
            let signatures = state.dispatcher.registry().signatures(&functions);
            tracing::debug!(requested = functions.len(), returned = signatures.len(), "Signature request");
            return (StatusCode::OK, Json(signatures)).into_response();
        }
        WebhookRequest::Call(call) => call,
    };

    match state.dispatcher.dispatch(call).await {
        Ok(outcome) => legacy_reply(outcome.message),
        Err(e @ DispatchError::UnknownFunction(_)) => legacy_error(StatusCode::NOT_FOUND, e),
        Err(e) => legacy_reply(e),
    }
}

/// POST /api/functions/{name}
///
/// The body is the argument object itself; an empty body means no
/// arguments.
pub async fn function_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Bytes,
) -> Response {
    let arguments = if body.iter().all(u8::is_ascii_whitespace) {
        Arguments::new()
    } else {
        match parse_body(&body) {
            Ok(arguments) => arguments,
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "kind": OutcomeKind::InvalidInput, "message": e.to_string() })),
                )
                    .into_response();
            }
        }
    };

    match state.dispatcher.dispatch(FunctionCall::new(name, arguments)).await {
        Ok(outcome) => (status_for(outcome.kind), Json(outcome)).into_response(),
        Err(e) => match e.kind() {
            Some(kind) => (
                status_for(kind),
                Json(json!({ "kind": kind, "message": e.to_string() })),
            )
                .into_response(),
            None => (
                StatusCode::NOT_FOUND,
                Json(json!({ "kind": "unknown_function", "message": e.to_string() })),
            )
                .into_response(),
        },
    }
}

/// GET /api/reservations
pub async fn reservations_handler(State(state): State<AppState>) -> Response {
    match state.dispatcher.service().snapshot().await {
        Ok(views) => {
            let masked: Vec<_> = views.iter().map(|v| v.masked()).collect();
            (StatusCode::OK, Json(masked)).into_response()
        }
        Err(e) => legacy_error(StatusCode::INTERNAL_SERVER_ERROR, e),
    }
}

/// GET /health
pub async fn health_handler() -> impl IntoResponse {
    Json(json!({ "status": "healthy" }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_for() {
        assert_eq!(status_for(OutcomeKind::Success), StatusCode::OK);
        assert_eq!(status_for(OutcomeKind::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_for(OutcomeKind::Conflict), StatusCode::CONFLICT);
        assert_eq!(status_for(OutcomeKind::AlreadyExists), StatusCode::CONFLICT);
        assert_eq!(status_for(OutcomeKind::InvalidInput), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(OutcomeKind::Internal), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_is_json() {
        let mut headers = HeaderMap::new();
        assert!(!is_json(&headers));
        headers.insert(header::CONTENT_TYPE, "application/json; charset=utf-8".parse().unwrap());
        assert!(is_json(&headers));
        headers.insert(header::CONTENT_TYPE, "application/vnd.api+json".parse().unwrap());
        assert!(is_json(&headers));
        headers.insert(header::CONTENT_TYPE, "text/plain".parse().unwrap());
        assert!(!is_json(&headers));
    }
}
