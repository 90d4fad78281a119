use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use serde_json::{Value, json};
use tokio::net::TcpListener;

use boardbrief_core::FanOut;
use boardbrief_server::config::ServerConfig;
use boardbrief_server::routes;
use boardbrief_server::state::AppState;

pub const BRASS_HTML: &str = "<html><body><script>x</script><p>Brass: Birmingham is a game.</p></body></html>";

/// Knobs the tests vary; everything else uses server defaults.
pub struct TestSetup {
    pub models: Vec<&'static str>,
    pub min_text_chars: usize,
    pub call_timeout: Duration,
    pub max_body_bytes: usize,
}

impl Default for TestSetup {
    fn default() -> Self {
        Self {
            models: vec!["m1", "m2"],
            min_text_chars: 0,
            call_timeout: Duration::from_secs(10),
            max_body_bytes: 1024 * 1024,
        }
    }
}

/// Start a stub model API and return the app router pointed at it.
pub async fn setup_test_app(setup: TestSetup) -> Router {
    let base_url = spawn_stub_llm().await;

    let config = ServerConfig {
        models: setup.models.iter().map(|m| m.to_string()).collect(),
        base_url,
        api_key: "test-key".to_string(),
        port: 0,
        call_timeout: setup.call_timeout,
        fan_out: FanOut::Concurrent,
        max_attempts: 1,
        retry_base_delay: Duration::from_millis(10),
        min_text_chars: setup.min_text_chars,
        max_body_bytes: setup.max_body_bytes,
    };

    let state = AppState::from_config(&config).expect("Failed to build app state");
    routes::router(Arc::new(state))
}

/// Serve an OpenAI-compatible `/chat/completions` on an ephemeral port.
///
/// Behaviour is keyed on the requested model:
/// - `m1`: answers "Summary A" with 10 input / 5 output tokens
/// - `no-usage`: answers without a `usage` block
/// - `slow`: answers after 300 ms
/// - `hang`: answers after 5 s
/// - anything else: 404 "model not found"
async fn spawn_stub_llm() -> String {
    let app = Router::new().route("/v1/chat/completions", post(stub_completion));
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub LLM");
    let addr = listener.local_addr().expect("Failed to read stub address");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Stub LLM crashed");
    });

    format!("http://{addr}/v1")
}

async fn stub_completion(axum::Json(body): axum::Json<Value>) -> Response {
    let model = body["model"].as_str().unwrap_or_default().to_string();
    match model.as_str() {
        "m1" => completion("Summary A", Some((10, 5))),
        "no-usage" => completion("No usage reported", None),
        "slow" => {
            tokio::time::sleep(Duration::from_millis(300)).await;
            completion("Slow summary", Some((20, 8)))
        }
        "hang" => {
            tokio::time::sleep(Duration::from_secs(5)).await;
            completion("Too late", Some((1, 1)))
        }
        _ => (
            StatusCode::NOT_FOUND,
            axum::Json(json!({"error": {"message": format!("model not found: {model}")}})),
        )
            .into_response(),
    }
}

fn completion(text: &str, usage: Option<(u64, u64)>) -> Response {
    let mut body = json!({"choices": [{"message": {"role": "assistant", "content": text}}]});
    if let Some((prompt, completion)) = usage {
        body["usage"] = json!({"prompt_tokens": prompt, "completion_tokens": completion});
    }
    axum::Json(body).into_response()
}
