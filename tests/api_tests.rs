//! End-to-end tests of the HTTP surface
//!
//! The router is driven in-process with `tower::ServiceExt::oneshot`; the model
//! is either a stub generator or a `GeminiClient` pointed at a wiremock server.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use text_refiner::api::{build_router, TRACE_ID_HEADER};
use text_refiner::core::error::Result;
use text_refiner::{Config, GeminiClient, RefinerError, TextGenerator};
use tower::util::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct StubGenerator {
    reply: std::result::Result<String, String>,
    calls: AtomicUsize,
}

impl StubGenerator {
    fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self { reply: Ok(reply.to_string()), calls: AtomicUsize::new(0) })
    }

    fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self { reply: Err(message.to_string()), calls: AtomicUsize::new(0) })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for StubGenerator {
    fn model(&self) -> &str {
        "stub-model"
    }

    fn check(&self) -> Result<()> {
        match &self.reply {
            Ok(_) => Ok(()),
            Err(message) => Err(RefinerError::ConfigError(message.clone())),
        }
    }

    async fn generate(&self, _prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply.clone().map_err(RefinerError::ModelError)
    }
}

fn app(generator: Arc<dyn TextGenerator>) -> Router {
    build_router(&Config::default(), generator)
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Option<String>, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let trace_id = response
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, trace_id, value)
}

const REFINE_REPLY: &str = "REFINED TEXT:\n\
    Our meeting moved to Thursday at 3 PM.\n\
    \n\
    IMPROVEMENTS MADE:\n\
    - Corrected the day name\n\
    - Standardised the time format\n";

const TITLE_REPLY: &str = "SUGGESTED TITLES:\n\
    1. Rust for Web Services\n\
    2. Building APIs with Axum\n\
    3. Typed Handlers in Practice\n\
    \n\
    PRIMARY RECOMMENDATION:\n\
    Building APIs with Axum\n\
    \n\
    REASONING:\n\
    It is concrete.\n";

#[tokio::test]
async fn refine_text_returns_structured_reply() {
    let stub = StubGenerator::replying(REFINE_REPLY);
    let body = json!({ "text": "our meeting moved to thurs 3pm", "tone": "formal", "max_length": 120 });

    let (status, _, value) = send(app(stub.clone()), post_json("/refine-text", &body.to_string())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["original_text"], "our meeting moved to thurs 3pm");
    assert_eq!(value["refined_text"], "Our meeting moved to Thursday at 3 PM.");
    assert_eq!(value["tone"], "formal");
    assert_eq!(
        value["improvements_made"],
        json!(["Corrected the day name", "Standardised the time format"])
    );
    assert_eq!(stub.calls(), 1);
}

#[tokio::test]
async fn refine_text_defaults_tone_and_falls_back_without_markers() {
    let stub = StubGenerator::replying("A cleaner sentence.");

    let (status, _, value) = send(app(stub), post_json("/refine-text", r#"{"text":"a sentence"}"#)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["tone"], "professional");
    assert_eq!(value["refined_text"], "A cleaner sentence.");
    assert_eq!(
        value["improvements_made"],
        json!(["Text has been refined for better clarity and flow"])
    );
}

#[tokio::test]
async fn refine_text_accepts_null_optionals() {
    let stub = StubGenerator::replying(REFINE_REPLY);
    let body = r#"{"text":"hello","tone":null,"max_length":null}"#;

    let (status, _, value) = send(app(stub), post_json("/refine-text", body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["tone"], "professional");
}

#[tokio::test]
async fn missing_text_is_rejected_before_model_call() {
    let stub = StubGenerator::replying(REFINE_REPLY);

    let (status, _, value) = send(app(stub.clone()), post_json("/refine-text", r#"{"tone":"casual"}"#)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(value["error"], "ValidationError");
    assert_eq!(stub.calls(), 0);
}

#[tokio::test]
async fn empty_text_is_rejected_before_model_call() {
    let stub = StubGenerator::replying(TITLE_REPLY);

    let (status, _, value) = send(app(stub.clone()), post_json("/generate-title", r#"{"text":"   "}"#)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(value["error"], "ValidationError");
    assert!(value["message"].as_str().unwrap().contains("text must not be empty"));
    assert_eq!(stub.calls(), 0);
}

#[tokio::test]
async fn negative_max_length_is_rejected() {
    let stub = StubGenerator::replying(REFINE_REPLY);

    let (status, _, _) = send(
        app(stub.clone()),
        post_json("/refine-text", r#"{"text":"hi","max_length":-5}"#),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(stub.calls(), 0);
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let stub = StubGenerator::replying(REFINE_REPLY);

    let (status, _, value) = send(app(stub), post_json("/refine-text", "{not json")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(value["error"], "InvalidRequest");
}

#[tokio::test]
async fn model_failure_becomes_server_error() {
    let stub = StubGenerator::failing("HTTP 503: overloaded");

    let (status, trace_id, value) =
        send(app(stub.clone()), post_json("/refine-text", r#"{"text":"hello"}"#)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(value["error"], "InternalError");
    assert_eq!(
        value["message"],
        "Error refining text: Gemini API error: HTTP 503: overloaded"
    );
    assert_eq!(value["trace_id"].as_str(), trace_id.as_deref());
    assert_eq!(stub.calls(), 1);
}

#[tokio::test]
async fn generate_title_returns_structured_reply() {
    let stub = StubGenerator::replying(TITLE_REPLY);
    let body = json!({ "text": "A post about building web services in Rust", "tone": "ignored" });

    let (status, _, value) = send(app(stub.clone()), post_json("/generate-title", &body.to_string())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["original_text"], "A post about building web services in Rust");
    assert_eq!(
        value["suggested_titles"],
        json!([
            "Rust for Web Services",
            "Building APIs with Axum",
            "Typed Handlers in Practice"
        ])
    );
    assert_eq!(value["primary_title"], "Building APIs with Axum");
    assert_eq!(stub.calls(), 1);
}

#[tokio::test]
async fn generate_title_falls_back_to_placeholders() {
    let stub = StubGenerator::replying("Sorry, I can't help with that.");

    let (status, _, value) = send(app(stub), post_json("/generate-title", r#"{"text":"anything"}"#)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        value["suggested_titles"],
        json!(["Generated Title 1", "Generated Title 2", "Generated Title 3"])
    );
    assert_eq!(value["primary_title"], "Generated Title 1");
}

#[tokio::test]
async fn generate_title_failure_uses_its_own_prefix() {
    let stub = StubGenerator::failing("quota exceeded");

    let (status, _, value) = send(app(stub), post_json("/generate-title", r#"{"text":"anything"}"#)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(value["message"]
        .as_str()
        .unwrap()
        .starts_with("Error generating titles: "));
}

#[tokio::test]
async fn health_reports_model_client_state() {
    let (status, _, value) = send(app(StubGenerator::replying("ok")), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["status"], "healthy");
    assert_eq!(value["gemini_api"], "connected");
    assert!(value.get("error").is_none());

    let (status, _, value) = send(app(StubGenerator::failing("no credentials")), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["status"], "unhealthy");
    assert!(value["error"].as_str().unwrap().contains("no credentials"));
    assert!(value.get("gemini_api").is_none());
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let (status, _, _) = send(app(StubGenerator::replying("ok")), get("/nope")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

fn gemini_for(base_url: &str, api_key: &str) -> Arc<dyn TextGenerator> {
    let mut config = Config::default();
    config.gemini.base_url = base_url.to_string();
    config.gemini.api_key = api_key.to_string();
    Arc::new(GeminiClient::new(&config.gemini).unwrap())
}

#[tokio::test]
async fn full_stack_against_mock_gemini() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/gemini-1.5-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": TITLE_REPLY }] },
                "finishReason": "STOP"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let app = app(gemini_for(&server.uri(), "test-key"));
    let (status, _, value) = send(app, post_json("/generate-title", r#"{"text":"web services in Rust"}"#)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["primary_title"], "Building APIs with Axum");
    assert_eq!(value["suggested_titles"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn missing_api_key_fails_requests_and_health() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let app = app(gemini_for(&server.uri(), ""));

    let (status, _, value) = send(app.clone(), post_json("/refine-text", r#"{"text":"hello"}"#)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        value["message"],
        "Error refining text: Configuration error: GOOGLE_API_KEY environment variable not set"
    );

    let (status, _, value) = send(app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["status"], "unhealthy");
    assert_eq!(value["model"], "gemini-1.5-flash");
}
