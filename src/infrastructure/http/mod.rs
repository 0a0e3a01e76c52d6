//! Webhook HTTP server

use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use crate::application::errors::HandlerError;
use crate::application::services::WebhookHandler;
use crate::infrastructure::adapters::line::SIGNATURE_HEADER;

/// Body served on `GET /`
pub const GREETING: &str = "Hello! The food recommendation bot is running.";

/// Shared, read-only request state
#[derive(Clone)]
pub struct AppState {
    pub handler: Arc<WebhookHandler>,
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(handler: WebhookHandler) -> Self {
        Self {
            handler: Arc::new(handler),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Build the router with tracing, request timeout and panic handling
pub fn router(mut state: AppState, request_timeout: Duration) -> Router {
    state.request_timeout = request_timeout;

    Router::new()
        .route("/", get(index))
        .route("/callback", post(callback))
        .fallback(not_found)
        .with_state(state)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
}

/// Bind `addr` and serve until Ctrl-C
pub async fn serve(addr: &str, app: Router) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

async fn index() -> &'static str {
    GREETING
}

async fn callback(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<&'static str, HandlerError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok());

    // Expiry surfaces as a JSON 500 like any other handler failure
    match tokio::time::timeout(state.request_timeout, state.handler.handle(&body, signature)).await {
        Ok(result) => result?,
        Err(_) => {
            return Err(HandlerError::Internal(format!(
                "request timed out after {:?}",
                state.request_timeout
            )))
        }
    }
    Ok("OK")
}

async fn not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    tracing::error!("Request handler panicked: {}", detail);
    error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        tracing::error!("Webhook rejected: {}", self);

        match &self {
            HandlerError::MissingSignature | HandlerError::InvalidSignature => {
                error_response(StatusCode::BAD_REQUEST, &self.to_string())
            }
            HandlerError::DeliveryFailed { .. } => {
                error_response(StatusCode::INTERNAL_SERVER_ERROR, &self.to_string())
            }
            HandlerError::Internal(_) => {
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::errors::BotError;
    use crate::application::services::CommandResolver;
    use crate::domain::entities::{OutboundReply, RecommendationTable};
    use crate::domain::traits::ReplySender;
    use crate::infrastructure::adapters::line::{LineEventParser, LineSignatureVerifier};
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use std::sync::Mutex;
    use tower::ServiceExt;

    const SECRET: &str = "channel-secret";

    #[derive(Default)]
    struct StubSender {
        sent: Mutex<Vec<OutboundReply>>,
    }

    #[async_trait]
    impl ReplySender for StubSender {
        async fn send_reply(&self, reply: &OutboundReply) -> Result<(), BotError> {
            match reply.reply_token.as_str() {
                "fail" => Err(BotError::Network("503 Service Unavailable".to_string())),
                "panic" => panic!("sender exploded"),
                "hang" => {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                    Ok(())
                }
                _ => {
                    self.sent.lock().unwrap().push(reply.clone());
                    Ok(())
                }
            }
        }

        fn platform(&self) -> &str {
            "stub"
        }
    }

    fn app(sender: Arc<StubSender>) -> Router {
        app_with_timeout(sender, Duration::from_secs(5))
    }

    fn app_with_timeout(sender: Arc<StubSender>, request_timeout: Duration) -> Router {
        let handler = WebhookHandler::new(
            Arc::new(LineSignatureVerifier::new(SECRET)),
            Arc::new(LineEventParser),
            sender,
            CommandResolver::new(Arc::new(RecommendationTable::builtin())),
        );
        router(AppState::new(handler), request_timeout)
    }

    fn text_event_body(reply_token: &str, text: &str) -> String {
        json!({
            "destination": "U0",
            "events": [{
                "type": "message",
                "replyToken": reply_token,
                "timestamp": 1700000000000i64,
                "source": {"type": "user", "userId": "U1"},
                "message": {"id": "1", "type": "text", "text": text}
            }]
        })
        .to_string()
    }

    fn signed_callback(body: &str) -> Request<Body> {
        let signature = LineSignatureVerifier::new(SECRET).sign(body.as_bytes());
        Request::builder()
            .method("POST")
            .uri("/callback")
            .header("X-Line-Signature", signature)
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        String::from_utf8(bytes.to_vec()).expect("utf8")
    }

    async fn body_json(response: Response) -> serde_json::Value {
        serde_json::from_str(&body_text(response).await).expect("json")
    }

    #[tokio::test]
    async fn index_returns_greeting() {
        let response = app(Arc::default())
            .oneshot(Request::builder().uri("/").body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, GREETING);
    }

    #[tokio::test]
    async fn signed_callback_replies_and_returns_ok() {
        let sender = Arc::new(StubSender::default());
        let response = app(sender.clone())
            .oneshot(signed_callback(&text_event_body("r1", "/cnxfood")))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "OK");

        let sent = sender.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].reply_token, "r1");
        assert!(sent[0].text.contains("B Coffee Shop\nContact: LINE ID: Bcoffee"));
    }

    #[tokio::test]
    async fn tampered_body_is_bad_request() {
        let sender = Arc::new(StubSender::default());
        let signature = LineSignatureVerifier::new(SECRET)
            .sign(text_event_body("r1", "/cnxfood").as_bytes());
        let request = Request::builder()
            .method("POST")
            .uri("/callback")
            .header("X-Line-Signature", signature)
            .body(Body::from(text_event_body("r1", "/bkkfood")))
            .expect("request");

        let response = app(sender.clone()).oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "Invalid signature");
        assert!(sender.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_signature_is_bad_request() {
        let request = Request::builder()
            .method("POST")
            .uri("/callback")
            .body(Body::from(text_event_body("r1", "/cnxfood")))
            .expect("request");

        let response = app(Arc::default()).oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "Missing signature header");
    }

    #[tokio::test]
    async fn delivery_failure_is_server_error() {
        let response = app(Arc::default())
            .oneshot(signed_callback(&text_event_body("fail", "/cnxfood")))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body_json(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn malformed_signed_body_is_server_error() {
        let response = app(Arc::default())
            .oneshot(signed_callback("not json"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["error"], "Internal server error");
    }

    #[tokio::test]
    async fn expired_request_is_json_server_error() {
        let response = app_with_timeout(Arc::default(), Duration::from_millis(50))
            .oneshot(signed_callback(&text_event_body("hang", "/cnxfood")))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["error"], "Internal server error");
    }

    #[tokio::test]
    async fn panic_becomes_json_server_error() {
        let response = app(Arc::default())
            .oneshot(signed_callback(&text_event_body("panic", "/cnxfood")))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["error"], "Internal server error");
    }

    #[tokio::test]
    async fn unknown_route_is_json_not_found() {
        let response = app(Arc::default())
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"], "Not found");
    }

    #[tokio::test]
    async fn get_on_callback_is_not_allowed() {
        let response = app(Arc::default())
            .oneshot(Request::builder().uri("/callback").body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
