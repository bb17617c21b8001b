use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use scout::{invoker::InvocationRequest, models::conversation::ConversationTurn};
use serde::Deserialize;
use serde_json::json;

// Types matching the incoming JSON structure
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    model_name: String,
    model_provider: String,
    #[serde(default)]
    system_prompt: String,
    messages: Vec<ConversationTurn>,
    #[serde(default)]
    allow_search: bool,
}

impl From<ChatRequest> for InvocationRequest {
    fn from(request: ChatRequest) -> Self {
        InvocationRequest::new(request.model_name, request.model_provider, request.messages)
            .with_search(request.allow_search)
            .with_system_prompt(request.system_prompt)
    }
}

/// A fault raised while answering; the client only learns that it failed
pub struct ChatError(anyhow::Error);

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        tracing::error!("Failed to answer chat request: {:#}", self.0);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": self.0.to_string() })),
        )
            .into_response()
    }
}

impl<E: Into<anyhow::Error>> From<E> for ChatError {
    fn from(err: E) -> Self {
        ChatError(err.into())
    }
}

// Answer with the agent's final reply as a bare JSON string
async fn handler(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<String>, ChatError> {
    let request = InvocationRequest::from(request);
    tracing::info!(
        model = %request.model_id,
        provider = %request.provider,
        allow_search = request.allow_search,
        "received chat request"
    );

    let reply = state.invoker.invoke(&request).await?;
    Ok(Json(reply))
}

// Configure routes for this module
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/chat", post(handler))
        .with_state(state)
}
