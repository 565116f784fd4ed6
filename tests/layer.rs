use axum::body::{Body, to_bytes};
use axum::http::{Request, header};
use axum::routing::get;
use faultline::prelude::*;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::task::{Context, Poll};
use tower::{Layer, Service, ServiceExt};

async fn missing_book() -> std::result::Result<Json<Value>, Fault> {
    Err(DomainError::resource_not_found([DetailItem::new("Book", "isbn 978-0")]).into())
}

async fn invalid_form() -> std::result::Result<Json<Value>, DomainError> {
    Err(DomainError::model_validation(["title is required", "year must be positive"]))
}

async fn admin_only() -> std::result::Result<&'static str, Fault> {
    Err(Fault::forbidden("role 'admin' missing"))
}

async fn crash() -> std::result::Result<&'static str, Fault> {
    Err(anyhow::anyhow!("connection pool exhausted").into())
}

async fn healthy() -> &'static str {
    "ok"
}

fn app(configuration: HandlerConfiguration) -> Router {
    let handler = ExceptionHandler::new(Arc::new(configuration));
    Router::new()
        .route("/books/missing", get(missing_book))
        .route("/books/invalid", get(invalid_form))
        .route("/admin", get(admin_only))
        .route("/crash", get(crash))
        .route("/health", get(healthy))
        .layer(ExceptionHandlingLayer::new(Arc::new(handler)))
}

async fn send(app: Router, uri: &str) -> (StatusCode, Option<String>, String) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string());
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, content_type, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn test_successful_responses_pass_through() {
    let (status, _, body) = send(app(HandlerConfiguration::default()), "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
}

#[tokio::test]
async fn test_domain_errors_are_classified() {
    let (status, content_type, body) =
        send(app(HandlerConfiguration::default()), "/books/missing").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(content_type.as_deref(), Some("application/json; charset=utf-8"));
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["key"], "ResourceNotFound");
    assert_eq!(body["items"][0]["key"], "Book");

    let (status, _, body) = send(app(HandlerConfiguration::default()), "/books/invalid").await;
    assert_eq!(status, StatusCode::NOT_ACCEPTABLE);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["items"].as_array().unwrap().len(), 2);
    assert_eq!(body["items"][1]["message"], "year must be positive");
}

#[tokio::test]
async fn test_forbidden_body_is_fixed() {
    let (status, _, body) = send(app(HandlerConfiguration::default()), "/admin").await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        body,
        r#"{"key":"Forbidden","message":"Access to this resource is forbidden."}"#
    );
}

#[tokio::test]
async fn test_internal_errors_hide_details_outside_development() {
    let (status, _, body) = send(app(HandlerConfiguration::default()), "/crash").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!body.contains("connection pool"));
    let body: Value = serde_json::from_str(&body).unwrap();
    assert!(body["logEntryId"].is_string());
    assert!(body.get("exception").is_none());
}

#[tokio::test]
async fn test_internal_errors_show_base_message_in_development() {
    let configuration = HandlerConfiguration::builder()
        .environment(Environment::Development)
        .build();
    let (_, _, body) = send(app(configuration), "/crash").await;

    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["exception"]["message"], "connection pool exhausted");
}

#[tokio::test]
async fn test_interception_event_rewrites_response() {
    let configuration = HandlerConfiguration::configure(|cfg| {
        cfg.add_event(FnEvent::new(
            "pool-exhaustion",
            |_, fault| fault.to_string().contains("pool exhausted"),
            |_, _| {
                Interception::new(
                    StatusCode::SERVICE_UNAVAILABLE,
                    DomainError::new("TryAgainLater", "The service is busy.").into(),
                )
                .with_behavior(Behavior::ClientError)
            },
        ))
    });

    let (status, _, body) = send(app(configuration), "/crash").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["key"], "TryAgainLater");
    assert_eq!(body["items"], Value::Array(Vec::new()));
}

#[derive(Clone)]
struct Unavailable {
    calls: Arc<AtomicUsize>,
}

impl Service<Request<Body>> for Unavailable {
    type Response = Response;
    type Error = std::io::Error;
    type Future = std::future::Ready<std::result::Result<Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<std::result::Result<(), Self::Error>> {
        Poll::Ready(Err(std::io::Error::other("backend unavailable")))
    }

    fn call(&mut self, _request: Request<Body>) -> Self::Future {
        self.calls.fetch_add(1, Ordering::SeqCst);
        std::future::ready(Ok("ok".into_response()))
    }
}

#[tokio::test]
async fn test_readiness_error_is_handled_without_calling_inner() {
    let calls = Arc::new(AtomicUsize::new(0));
    let configuration = HandlerConfiguration::builder()
        .environment(Environment::Development)
        .build();
    let service = ExceptionHandlingLayer::new(Arc::new(ExceptionHandler::new(Arc::new(
        configuration,
    ))))
    .layer(Unavailable {
        calls: calls.clone(),
    });

    let response = service
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["exception"]["message"], "backend unavailable");
}

#[tokio::test]
async fn test_domain_error_through_anyhow_keeps_classification() {
    async fn save_profile() -> std::result::Result<&'static str, Fault> {
        let outcome: anyhow::Result<&'static str> =
            Err(DomainError::model_validation(["email is invalid"]).into());
        Ok(outcome?)
    }

    let app = Router::new()
        .route("/profile", get(save_profile))
        .layer(ExceptionHandlingLayer::new(Arc::new(ExceptionHandler::new(
            Arc::new(HandlerConfiguration::default()),
        ))));

    let (status, _, body) = send(app, "/profile").await;

    assert_eq!(status, StatusCode::NOT_ACCEPTABLE);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["key"], "ModelValidation");
}
