//! Route handlers organized by resource

use std::sync::Arc;

use axum::Router;
use serde::Serialize;

use super::server::AppState;

pub mod health;
pub mod areas;
pub mod people;

/// Every API route, relative to the versioned prefix
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .merge(health::router())
        .merge(areas::router())
        .merge(people::router())
}

/// Success body: `{"message"?, "data"}`
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn data(data: T) -> Self {
        Self {
            message: None,
            data,
        }
    }

    pub fn with_message(message: &'static str, data: T) -> Self {
        Self {
            message: Some(message),
            data,
        }
    }
}

/// Confirmation body for deletes
#[derive(Debug, Serialize)]
pub struct Confirmation {
    pub message: &'static str,
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::json;
    use tower::ServiceExt;

    use crate::http::server::{build_router, AppState, ServerConfig};
    use crate::service::testing::BrokenStore;
    use crate::service::{AreaService, PersonService};

    fn broken_app() -> axum::Router {
        let store = Arc::new(BrokenStore);
        let state = AppState {
            areas: AreaService::new(store.clone()),
            people: PersonService::new(store.clone(), store),
        };
        build_router(state, &ServerConfig::default())
    }

    async fn call(method: &str, uri: &str, body: Option<serde_json::Value>) -> (StatusCode, serde_json::Value) {
        let body = body.map_or_else(Body::empty, |v| Body::from(v.to_string()));
        let response = broken_app()
            .oneshot(Request::builder().method(method).uri(uri).body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn storage_failures_are_500_with_generic_body() {
        let (status, body) = call("GET", "/api/v1/areas", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Error al obtener las áreas" }));

        let (status, body) = call("GET", "/api/v1/areas/conteo", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Error al obtener las áreas con conteo" }));

        let (status, _) = call("GET", "/api/v1/personas", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn storage_failure_on_lookup_is_not_reported_as_missing() {
        let (status, body) = call("GET", "/api/v1/areas/1", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Error al obtener el área" }));

        let (status, body) = call("GET", "/api/v1/personas/1", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Error al obtener la persona" }));

        let (status, body) = call("GET", "/api/v1/personas/email/a@b.io", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Error al obtener la persona" }));

        let (status, body) = call("DELETE", "/api/v1/areas/1", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Error al eliminar el área" }));
    }

    #[tokio::test]
    async fn storage_failure_on_create_is_500() {
        let (status, body) = call(
            "POST",
            "/api/v1/areas",
            Some(json!({ "nombre": "Ventas", "descripcion": "" })),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Error al crear el área");
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn invalid_input_never_reaches_storage() {
        // A broken store would answer 500; validation answers first.
        let (status, _) = call("GET", "/api/v1/areas/abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = call(
            "POST",
            "/api/v1/personas",
            Some(json!({ "nombre": "", "email": "ana@example.com", "area_id": 1 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Datos inválidos");
    }
}
