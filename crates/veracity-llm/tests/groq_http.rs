//! HTTP tests for GroqProvider against a local stub of the chat-completions API

use axum::{
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use veracity_domain::Claim;
use veracity_llm::{
    Credential, CredentialStatus, GroqProvider, LlmError, ServiceConfig, VerificationService,
};

const TEST_KEY: &str = "gsk_test_key";

/// Bind a stub server on an ephemeral port and return its base URL
async fn spawn_stub(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {}", TEST_KEY))
        .unwrap_or(false)
}

/// Echoes the request settings back as the completion text
async fn echo_completion(headers: HeaderMap, Json(body): Json<Value>) -> impl IntoResponse {
    if !authorized(&headers) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": {"message": "Invalid API Key", "type": "invalid_request_error"}})),
        );
    }

    let prompt = body["messages"][0]["content"].as_str().unwrap_or_default();
    let content = format!(
        "model={} max_tokens={} temperature={} has_fact_checks={}",
        body["model"].as_str().unwrap_or_default(),
        body["max_tokens"],
        body["temperature"],
        prompt.contains("fact_checks"),
    );

    (
        StatusCode::OK,
        Json(json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": content}}]
        })),
    )
}

async fn list_models(headers: HeaderMap) -> impl IntoResponse {
    if !authorized(&headers) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": {"message": "Invalid API Key"}})),
        );
    }
    (
        StatusCode::OK,
        Json(json!({"object": "list", "data": [{"id": "compound-beta"}, {"id": "llama-3.1-8b-instant"}]})),
    )
}

fn provider_for(base_url: String) -> GroqProvider {
    GroqProvider::new(ServiceConfig {
        endpoint: base_url,
        timeout_secs: Some(10),
        ..ServiceConfig::default()
    })
    .unwrap()
}

fn credential() -> Credential {
    Credential::new(TEST_KEY).unwrap()
}

#[tokio::test]
async fn test_extraction_request_settings() {
    let app = Router::new().route("/chat/completions", post(echo_completion));
    let provider = provider_for(spawn_stub(app).await);

    let text = provider.extract_claims("Some content.", &credential()).await.unwrap();

    assert!(text.contains("model=meta-llama/llama-4-maverick-17b-128e-instruct"));
    assert!(text.contains("max_tokens=4000"));
    assert!(text.contains("temperature=0.1"));
    assert!(text.contains("has_fact_checks=false"));
}

#[tokio::test]
async fn test_verification_request_settings() {
    let app = Router::new().route("/chat/completions", post(echo_completion));
    let provider = provider_for(spawn_stub(app).await);

    let claims = vec![Claim::new(1, "The Eiffel Tower was completed in 1889.").unwrap()];
    let text = provider.verify_claims(&claims, &credential()).await.unwrap();

    assert!(text.contains("model=compound-beta"));
    assert!(text.contains("max_tokens=8000"));
    assert!(text.contains("has_fact_checks=true"));
}

#[tokio::test]
async fn test_service_error_uses_body_message() {
    let app = Router::new().route("/chat/completions", post(echo_completion));
    let provider = provider_for(spawn_stub(app).await);

    let wrong = Credential::new("gsk_wrong").unwrap();
    let result = provider.extract_claims("x", &wrong).await;

    assert_eq!(
        result,
        Err(LlmError::Service {
            status: 401,
            message: "Invalid API Key".to_string(),
        })
    );
}

#[tokio::test]
async fn test_service_error_falls_back_to_status_reason() {
    let app = Router::new().route(
        "/chat/completions",
        post(|| async { (StatusCode::SERVICE_UNAVAILABLE, "upstream down") }),
    );
    let provider = provider_for(spawn_stub(app).await);

    let result = provider.extract_claims("x", &credential()).await;

    assert_eq!(
        result,
        Err(LlmError::Service {
            status: 503,
            message: "Service Unavailable".to_string(),
        })
    );
}

#[tokio::test]
async fn test_success_without_choices_is_invalid_response() {
    let app = Router::new().route(
        "/chat/completions",
        post(|| async { Json(json!({"choices": []})) }),
    );
    let provider = provider_for(spawn_stub(app).await);

    let result = provider.extract_claims("x", &credential()).await;
    assert!(matches!(result, Err(LlmError::InvalidResponse(_))));
}

#[tokio::test]
async fn test_probe_reports_verification_model() {
    let app = Router::new().route("/models", get(list_models));
    let base = spawn_stub(app).await;

    let provider = provider_for(base.clone());
    assert_eq!(provider.probe(&credential()).await, CredentialStatus::Valid);

    let other = GroqProvider::new(ServiceConfig {
        endpoint: base,
        verification_model: "compound".to_string(),
        ..ServiceConfig::default()
    })
    .unwrap();
    assert_eq!(
        other.probe(&credential()).await,
        CredentialStatus::ValidWithoutVerificationModel {
            model: "compound".to_string(),
        }
    );
}

#[tokio::test]
async fn test_probe_with_rejected_key() {
    let app = Router::new().route("/models", get(list_models));
    let provider = provider_for(spawn_stub(app).await);

    let status = provider.probe(&Credential::new("gsk_wrong").unwrap()).await;
    assert!(!status.is_usable());
    assert!(status.describe().contains("Invalid API Key"));
}
