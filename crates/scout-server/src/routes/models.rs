use axum::{response::Json, routing::get, Router};
use scout::providers::factory::ProviderType;
use serde::Serialize;
use strum::IntoEnumIterator;

#[derive(Debug, Serialize)]
pub struct ProviderModels {
    name: String,
    models: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ModelsResponse {
    providers: Vec<ProviderModels>,
}

/// List the providers the backend accepts and the models a client may pick for each
async fn list_models() -> Json<ModelsResponse> {
    let providers = ProviderType::iter()
        .map(|provider| ProviderModels {
            name: provider.to_string(),
            models: provider.models().iter().map(|m| m.to_string()).collect(),
        })
        .collect();

    Json(ModelsResponse { providers })
}

async fn status() -> &'static str {
    "ok"
}

pub fn routes() -> Router {
    Router::new()
        .route("/models", get(list_models))
        .route("/status", get(status))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, http::StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_models_lists_gemini() {
        let response = routes()
            .oneshot(Request::builder().uri("/models").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            body,
            json!({"providers": [{"name": "Gemini", "models": ["gemini-1.5-flash", "gemini-1.5-pro"]}]})
        );
    }

    #[tokio::test]
    async fn test_status() {
        let response = routes()
            .oneshot(Request::builder().uri("/status").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"ok");
    }
}
