// Persona preset HTTP routes

use axum::{routing::get, Json, Router};
use duologue_core::PERSONA_PRESETS;
use serde::Serialize;
use utoipa::ToSchema;

use crate::common::ListResponse;

/// Create preset routes
pub fn routes() -> Router {
    Router::new().route("/v1/presets", get(list_presets))
}

/// A ready-made persona prompt the UI can offer
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PresetInfo {
    pub id: String,
    pub name: String,
    pub prompt: String,
}

/// GET /v1/presets - List built-in persona presets
#[utoipa::path(
    get,
    path = "/v1/presets",
    responses(
        (status = 200, description = "Available persona presets", body = ListResponse<PresetInfo>)
    ),
    tag = "presets"
)]
pub async fn list_presets() -> Json<ListResponse<PresetInfo>> {
    let presets = PERSONA_PRESETS
        .iter()
        .map(|p| PresetInfo {
            id: p.id.to_string(),
            name: p.name.to_string(),
            prompt: p.prompt.to_string(),
        })
        .collect();
    Json(ListResponse::new(presets))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_list_presets() {
        let app = routes();
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/v1/presets")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let parsed: serde_json::Value = serde_json::from_slice(&body).unwrap();
        let data = parsed["data"].as_array().unwrap();
        assert!(!data.is_empty());
        assert!(data[0]["id"].is_string());
        assert!(data[0]["prompt"].is_string());
    }
}
