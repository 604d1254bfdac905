//! HTTP transport for the chat assistant.
//!
//! `POST /api/chat` runs one turn; `OPTIONS /api/chat` answers CORS
//! preflights. Everything else is a bare 404.

use crate::session::{ChatResult, SessionStore, DEFAULT_SESSION_ID};
use axum::{
    body::Bytes,
    extract::State,
    http::{
        header::{ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN},
        HeaderValue, StatusCode,
    },
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::{error, info};

/// Path of the chat endpoint.
pub const CHAT_PATH: &str = "/api/chat";
/// Error text for requests without a usable `message`.
pub const NO_MESSAGE_ERROR: &str = "No message provided";

/// Shared application state.
pub struct AppState {
    sessions: SessionStore,
}

impl AppState {
    pub fn new(sessions: SessionStore) -> Self {
        Self { sessions }
    }
}

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    let chat_routes = Router::new()
        .route(
            CHAT_PATH,
            post(chat).options(preflight).fallback(not_found),
        )
        .route_layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .route_layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("POST, OPTIONS"),
        ))
        .route_layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        ));

    chat_routes.fallback(not_found).with_state(state)
}

/// Serve the router on `listener` until the process exits.
pub async fn serve(listener: tokio::net::TcpListener, state: Arc<AppState>) -> std::io::Result<()> {
    axum::serve(listener, router(state)).await
}

// === Request/Response Types ===

#[derive(Deserialize)]
struct ChatRequest {
    /// Kept loose so that non-string values get the same 400 as a missing field.
    #[serde(default)]
    message: Option<Value>,
    /// Conversation to continue. Callers without a usable string id share the default session.
    #[serde(default)]
    session_id: Option<Value>,
}

#[derive(Serialize)]
struct ChatResponse {
    response: ChatResult,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

fn error_response(status: StatusCode, error: impl Into<String>) -> Response {
    (status, Json(ErrorResponse { error: error.into() })).into_response()
}

// === Handlers ===

async fn chat(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let request: ChatRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => return error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    };

    let Some(message) = request
        .message
        .as_ref()
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
    else {
        return error_response(StatusCode::BAD_REQUEST, NO_MESSAGE_ERROR);
    };

    let session_id = request
        .session_id
        .as_ref()
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .unwrap_or(DEFAULT_SESSION_ID)
        .to_string();

    // The turn runs in its own task so a dropped connection cannot cancel it
    // halfway through updating history.
    let turn = tokio::spawn(async move { state.sessions.chat(&session_id, &message).await }).await;

    match turn {
        Ok(turn) => {
            info!(outcome = ?turn.outcome, "Answered chat request");
            Json(ChatResponse { response: turn.result }).into_response()
        }
        Err(e) => {
            error!("Chat turn aborted: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

async fn preflight() -> StatusCode {
    StatusCode::OK
}

async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AssistantPrompts;
    use crate::rag::{AnswerGenerator, KnowledgeRetriever};
    use crate::test_support::{knowledge_base, ScriptedChatModel, StaticEmbedder, NAMESPACE};
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn test_state() -> Arc<AppState> {
        let retriever = Arc::new(KnowledgeRetriever::new(
            Arc::new(StaticEmbedder(vec![1.0, 0.0, 0.0])),
            Arc::new(knowledge_base()),
            NAMESPACE,
        ));
        let generator = Arc::new(AnswerGenerator::new(
            Arc::new(ScriptedChatModel::replying("Keep a fixed sleep window.")),
            AssistantPrompts::default(),
        ));
        Arc::new(AppState::new(SessionStore::new(retriever, generator, 6, 16)))
    }

    fn post_chat(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(CHAT_PATH)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_bytes(response: Response) -> Bytes {
        response.into_body().collect().await.unwrap().to_bytes()
    }

    async fn body_json(response: Response) -> Value {
        serde_json::from_slice(&body_bytes(response).await).unwrap()
    }

    fn assert_cors(response: &Response) {
        let headers = response.headers();
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_METHODS], "POST, OPTIONS");
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_HEADERS], "Content-Type");
    }

    #[tokio::test]
    async fn chat_returns_response_and_sources() {
        let app = router(test_state());

        let response = app
            .oneshot(post_chat(r#"{"message": "How do I sleep after nights?"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_cors(&response);

        let json = body_json(response).await;
        assert_eq!(
            json,
            serde_json::json!({
                "response": {
                    "response": "Keep a fixed sleep window.",
                    "sources": ["Shift Work Sleep", "Tactical Breathing"]
                }
            })
        );
    }

    #[tokio::test]
    async fn missing_message_is_bad_request() {
        for body in [r#"{}"#, r#"{"message": ""}"#, r#"{"message": "   "}"#, r#"{"message": 42}"#] {
            let response = router(test_state()).oneshot(post_chat(body)).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {}", body);
            assert_cors(&response);
            assert_eq!(body_json(response).await, serde_json::json!({ "error": "No message provided" }));
        }
    }

    #[tokio::test]
    async fn malformed_json_is_server_error() {
        let response = router(test_state()).oneshot(post_chat("{not json")).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert!(json["error"].as_str().is_some_and(|e| !e.is_empty()));
    }

    #[tokio::test]
    async fn preflight_returns_cors_headers_and_empty_body() {
        let req = Request::builder()
            .method("OPTIONS")
            .uri(CHAT_PATH)
            .body(Body::empty())
            .unwrap();

        let response = router(test_state()).oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_cors(&response);
        assert!(body_bytes(response).await.is_empty());
    }

    #[tokio::test]
    async fn unknown_path_and_method_are_not_found() {
        let req = Request::builder()
            .method("POST")
            .uri("/api/other")
            .body(Body::empty())
            .unwrap();
        let response = router(test_state()).oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_bytes(response).await.is_empty());

        let req = Request::builder()
            .method("GET")
            .uri(CHAT_PATH)
            .body(Body::empty())
            .unwrap();
        let response = router(test_state()).oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_bytes(response).await.is_empty());
    }

    #[tokio::test]
    async fn session_ids_isolate_histories() {
        let state = test_state();

        for body in [
            r#"{"message": "one", "session_id": "unit-7"}"#,
            r#"{"message": "two", "session_id": "unit-7"}"#,
            r#"{"message": "three"}"#,
        ] {
            let response = router(state.clone()).oneshot(post_chat(body)).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        assert_eq!(state.sessions.history_len("unit-7"), Some(4));
        assert_eq!(state.sessions.history_len(DEFAULT_SESSION_ID), Some(2));
    }

    #[tokio::test]
    async fn unusable_session_id_falls_back_to_default_session() {
        let state = test_state();

        for body in [
            r#"{"message": "one", "session_id": 7}"#,
            r#"{"message": "two", "session_id": null}"#,
            r#"{"message": "three", "session_id": "  "}"#,
        ] {
            let response = router(state.clone()).oneshot(post_chat(body)).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK, "body: {}", body);
            assert_cors(&response);
        }

        assert_eq!(state.sessions.len(), 1);
        assert_eq!(state.sessions.history_len(DEFAULT_SESSION_ID), Some(6));
    }
}
