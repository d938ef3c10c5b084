use crate::{
    config::Config,
    credentials,
    models::{PluginParams, PluginRequest},
    tools::{TextToImageTool, TOOL_NAME},
};
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    tool: Arc<TextToImageTool>,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            tool: Arc::new(TextToImageTool::new(&config.gptproto)),
        }
    }

    pub fn with_tool(tool: TextToImageTool) -> Self {
        Self {
            tool: Arc::new(tool),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/dify/receive", post(receive))
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// Single entry point for the plugin host; dispatches on `point`. Success is
/// `{result}`, failure is `{error}` with a non-2xx status.
async fn receive(
    State(state): State<AppState>,
    Json(request): Json<PluginRequest>,
) -> (StatusCode, Json<Value>) {
    log::info!("[Dify] Received request - point: {}", request.point);
    let params = request.params.unwrap_or_default();

    match request.point.as_str() {
        "ping" => (StatusCode::OK, Json(json!({ "result": "pong" }))),
        "tool.invoke" | "app.tool.invoke" => invoke_tool(&state, params).await,
        "provider.validate_credentials" => validate_credentials(params),
        other => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": format!("Unknown point: {}", other) })),
        ),
    }
}

async fn invoke_tool(state: &AppState, params: PluginParams) -> (StatusCode, Json<Value>) {
    let tool_name = params.tool_name.unwrap_or_default();
    if tool_name != TOOL_NAME {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": format!("Unknown tool: {}", tool_name) })),
        );
    }

    let tool_parameters = params.tool_parameters.unwrap_or_default();
    let tool_credentials = params.credentials.unwrap_or_default();

    let result = state.tool.invoke(&tool_parameters, &tool_credentials).await;
    if result.success {
        // The host expects the payload as a string, not a nested object.
        let rendered = result
            .data
            .and_then(|data| serde_json::to_string_pretty(&data).ok())
            .unwrap_or_default();
        (StatusCode::OK, Json(json!({ "result": rendered })))
    } else {
        let message = result.error.unwrap_or_else(|| "Unknown error".to_string());
        (StatusCode::BAD_REQUEST, Json(json!({ "error": message })))
    }
}

fn validate_credentials(params: PluginParams) -> (StatusCode, Json<Value>) {
    let api_key = params
        .credentials
        .and_then(|c| c.api_key)
        .unwrap_or_default();

    match credentials::validate(&api_key) {
        Ok(()) => (StatusCode::OK, Json(json!({ "result": "ok" }))),
        Err(error) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": error.to_string() })),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gptproto::{testing::ScriptedApi, GptProtoClient, PollConfig};
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn test_router(api: Arc<ScriptedApi>) -> Router {
        let tool =
            TextToImageTool::with_client(GptProtoClient::with_api(api, PollConfig::default()));
        router(AppState::with_tool(tool))
    }

    async fn post_receive(router: Router, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/api/dify/receive")
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn ping_pongs() {
        let router = test_router(Arc::new(ScriptedApi::new()));
        let (status, body) = post_receive(router, json!({ "point": "ping" })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "result": "pong" }));
    }

    #[tokio::test]
    async fn unknown_point_is_rejected() {
        let router = test_router(Arc::new(ScriptedApi::new()));
        let (status, body) = post_receive(router, json!({ "point": "app.mystery" })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Unknown point: app.mystery" }));
    }

    #[tokio::test]
    async fn unknown_tool_is_rejected() {
        let api = Arc::new(ScriptedApi::new());
        let router = test_router(api.clone());
        let (status, body) = post_receive(
            router,
            json!({
                "point": "tool.invoke",
                "params": { "tool_name": "image_to_video" }
            }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Unknown tool: image_to_video" }));
        assert_eq!(api.network_calls(), 0);
    }

    #[tokio::test]
    async fn tool_invoke_returns_stringified_payload() {
        let api = Arc::new(
            ScriptedApi::new().with_polls(vec![Ok(ScriptedApi::succeeded("https://x/img.png"))]),
        );
        let router = test_router(api);
        let (status, body) = post_receive(
            router,
            json!({
                "point": "app.tool.invoke",
                "params": {
                    "tool_name": "text_to_image",
                    "tool_parameters": { "prompt": "a red fox" },
                    "credentials": { "api_key": "sk-test" }
                }
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let rendered = body["result"].as_str().unwrap();
        let payload: Value = serde_json::from_str(rendered).unwrap();
        assert_eq!(payload["image_url"], "https://x/img.png");
        assert_eq!(payload["status"], "succeeded");
    }

    #[tokio::test]
    async fn tool_errors_come_back_as_400() {
        let router = test_router(Arc::new(ScriptedApi::new()));
        let (status, body) = post_receive(
            router,
            json!({
                "point": "tool.invoke",
                "params": {
                    "tool_name": "text_to_image",
                    "tool_parameters": {},
                    "credentials": { "api_key": "sk-test" }
                }
            }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Prompt is required" }));
    }

    #[tokio::test]
    async fn credential_validation_round_trip() {
        let router = test_router(Arc::new(ScriptedApi::new()));

        let (status, body) = post_receive(
            router.clone(),
            json!({
                "point": "provider.validate_credentials",
                "params": { "credentials": { "api_key": "sk-valid" } }
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "result": "ok" }));

        let (status, body) = post_receive(
            router,
            json!({
                "point": "provider.validate_credentials",
                "params": { "credentials": { "api_key": "not-a-key" } }
            }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({ "error": "Invalid API Key. Must start with \"sk-\"" })
        );
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let router = test_router(Arc::new(ScriptedApi::new()));
        let request = Request::builder()
            .method("GET")
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
        assert!(body["timestamp"].is_string());
    }
}
