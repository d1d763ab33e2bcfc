use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Value, json};
use vayama::llm::{
    Content, GeminiDriver, GenerateRequest, GenerationConfig, LlmDriver, LlmError, LlmSettings,
};

#[derive(Debug, Clone)]
struct Seen {
    call: String,
    api_key: Option<String>,
    body: Value,
}

#[derive(Clone)]
struct Fake {
    status: StatusCode,
    reply: Value,
    seen: Arc<Mutex<Vec<Seen>>>,
}

async fn generate(
    State(fake): State<Fake>,
    Path(call): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    fake.seen.lock().unwrap().push(Seen {
        call,
        api_key: headers
            .get("x-goog-api-key")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    });
    (fake.status, Json(fake.reply.clone()))
}

/// Serve `reply` with `status` on a random local port.
async fn fake_endpoint(status: StatusCode, reply: Value) -> (String, Arc<Mutex<Vec<Seen>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/v1beta/models/{call}", post(generate))
        .with_state(Fake {
            status,
            reply,
            seen: Arc::clone(&seen),
        });
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), seen)
}

fn driver(base_url: &str, api_key: Option<&str>) -> GeminiDriver {
    GeminiDriver::new(LlmSettings {
        base_url: base_url.to_string(),
        api_key: api_key.map(str::to_string),
        model: "gemini-2.5-flash".to_string(),
        request_timeout_secs: 5,
        connect_timeout_secs: 1,
    })
    .unwrap()
}

fn request() -> GenerateRequest {
    GenerateRequest {
        system_instruction: Content::instruction("You are Vayama."),
        contents: vec![Content::user("Plan me a weekend in Bo")],
        generation_config: GenerationConfig {
            response_mime_type: "application/json".to_string(),
            response_schema: json!({"type": "ARRAY"}),
        },
    }
}

#[tokio::test]
async fn test_generate_sends_key_and_joins_parts() {
    let reply = json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": "[{\"day\":1,"}, {"text": "\"title\":\"Bo\"}]"}]}
        }]
    });
    let (base, seen) = fake_endpoint(StatusCode::OK, reply).await;

    let text = driver(&base, Some("AIza-test")).generate(request()).await.unwrap();
    assert_eq!(text, r#"[{"day":1,"title":"Bo"}]"#);

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].call, "gemini-2.5-flash:generateContent");
    assert_eq!(seen[0].api_key.as_deref(), Some("AIza-test"));
    assert_eq!(seen[0].body["systemInstruction"]["parts"][0]["text"], "You are Vayama.");
    assert_eq!(seen[0].body["contents"][0]["role"], "user");
    assert_eq!(seen[0].body["generationConfig"]["responseMimeType"], "application/json");
}

#[tokio::test]
async fn test_blocked_prompt() {
    let reply = json!({"promptFeedback": {"blockReason": "SAFETY"}});
    let (base, _) = fake_endpoint(StatusCode::OK, reply).await;

    let err = driver(&base, Some("k")).generate(request()).await.unwrap_err();
    assert!(matches!(err, LlmError::Blocked(reason) if reason == "SAFETY"));
}

#[tokio::test]
async fn test_empty_candidates() {
    let (base, _) = fake_endpoint(StatusCode::OK, json!({"candidates": []})).await;

    let err = driver(&base, Some("k")).generate(request()).await.unwrap_err();
    assert!(matches!(err, LlmError::EmptyResponse));
}

#[tokio::test]
async fn test_error_status_is_reported() {
    let reply = json!({"error": {"code": 429, "message": "quota"}});
    let (base, _) = fake_endpoint(StatusCode::TOO_MANY_REQUESTS, reply).await;

    let err = driver(&base, Some("k")).generate(request()).await.unwrap_err();
    match err {
        LlmError::Status { status, body } => {
            assert_eq!(status, 429);
            assert!(body.contains("quota"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_missing_key_never_calls_out() {
    let (base, seen) = fake_endpoint(StatusCode::OK, json!({})).await;

    let err = driver(&base, None).generate(request()).await.unwrap_err();
    assert!(matches!(err, LlmError::MissingApiKey));
    assert!(seen.lock().unwrap().is_empty());
}
