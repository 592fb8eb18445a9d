//! Area endpoints

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::{Deserialize, Serialize};

use super::{Confirmation, Envelope};
use crate::db::{Area, AreaWithCount};
use crate::http::error::{ApiError, Missing};
use crate::http::extractors::{ListQuery, RecordId, ValidJson};
use crate::http::server::AppState;
use crate::models::{AreaId, NewArea, ValidationError};

const AREA_NOT_FOUND: Missing = Missing::NotFound("Área no encontrada");

/// Create/replace area request
#[derive(Debug, Deserialize)]
pub struct AreaRequest {
    pub nombre: String,
    #[serde(default)]
    pub descripcion: Option<String>,
}

impl AreaRequest {
    fn validate(&self) -> Result<NewArea, ValidationError> {
        NewArea::new(&self.nombre, self.descripcion.as_deref())
    }
}

/// Area response
#[derive(Debug, Serialize)]
pub struct AreaResponse {
    #[serde(rename = "ID")]
    pub id: AreaId,
    #[serde(rename = "CreatedAt")]
    pub created_at: String,
    #[serde(rename = "UpdatedAt")]
    pub updated_at: String,
    #[serde(rename = "DeletedAt")]
    pub deleted_at: Option<String>,
    pub nombre: String,
    pub descripcion: String,
}

impl From<Area> for AreaResponse {
    fn from(a: Area) -> Self {
        Self {
            id: a.id,
            created_at: a.created_at.to_rfc3339(),
            updated_at: a.updated_at.to_rfc3339(),
            deleted_at: a.deleted_at.map(|t| t.to_rfc3339()),
            nombre: a.nombre,
            descripcion: a.descripcion,
        }
    }
}

/// Area with head count
#[derive(Debug, Serialize)]
pub struct AreaCountResponse {
    pub id: AreaId,
    pub nombre: String,
    pub descripcion: String,
    pub personas: i64,
}

impl From<AreaWithCount> for AreaCountResponse {
    fn from(a: AreaWithCount) -> Self {
        Self {
            id: a.id,
            nombre: a.nombre,
            descripcion: a.descripcion,
            personas: a.personas,
        }
    }
}

/// POST /areas - create an area
async fn create_area(
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<AreaRequest>,
) -> Result<(StatusCode, Json<Envelope<AreaResponse>>), ApiError> {
    let input = req.validate()?;
    let area = state
        .areas
        .create(&input)
        .await
        .map_err(|e| ApiError::service("Error al crear el área", e, Missing::BadRequest))?;

    tracing::info!(id = area.id, "Area created");
    Ok((
        StatusCode::CREATED,
        Json(Envelope::with_message("Área creada exitosamente", area.into())),
    ))
}

/// GET /areas - list areas
async fn list_areas(
    State(state): State<Arc<AppState>>,
    query: ListQuery,
) -> Result<Json<Envelope<Vec<AreaResponse>>>, ApiError> {
    let areas = state
        .areas
        .list(query.include_deleted)
        .await
        .map_err(|e| ApiError::service("Error al obtener las áreas", e, Missing::BadRequest))?;

    Ok(Json(Envelope::data(
        areas.into_iter().map(AreaResponse::from).collect(),
    )))
}

/// GET /areas/{id} - get a single area
async fn get_area(
    State(state): State<Arc<AppState>>,
    RecordId(id): RecordId,
) -> Result<Json<Envelope<AreaResponse>>, ApiError> {
    let area = state
        .areas
        .get(id)
        .await
        .map_err(|e| ApiError::service("Error al obtener el área", e, AREA_NOT_FOUND))?;

    Ok(Json(Envelope::data(area.into())))
}

/// PUT /areas/{id} - replace an area
///
/// A missing area answers 400, not 404.
async fn update_area(
    State(state): State<Arc<AppState>>,
    RecordId(id): RecordId,
    ValidJson(req): ValidJson<AreaRequest>,
) -> Result<Json<Envelope<AreaResponse>>, ApiError> {
    let input = req.validate()?;
    let area = state
        .areas
        .update(id, &input)
        .await
        .map_err(|e| ApiError::service("Error al actualizar el área", e, Missing::BadRequest))?;

    Ok(Json(Envelope::with_message(
        "Área actualizada exitosamente",
        area.into(),
    )))
}

/// DELETE /areas/{id} - soft delete an unused area
async fn delete_area(
    State(state): State<Arc<AppState>>,
    RecordId(id): RecordId,
) -> Result<Json<Confirmation>, ApiError> {
    state
        .areas
        .delete(id)
        .await
        .map_err(|e| {
            let label = "Error al eliminar el área";
            ApiError::service(label, e, Missing::NotFound(label))
        })?;

    tracing::info!(id, "Area deleted");
    Ok(Json(Confirmation {
        message: "Área eliminada exitosamente",
    }))
}

/// GET /areas/conteo - areas with live person counts
async fn list_area_counts(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Envelope<Vec<AreaCountResponse>>>, ApiError> {
    let counts = state.areas.list_with_count().await.map_err(|e| {
        ApiError::service("Error al obtener las áreas con conteo", e, Missing::BadRequest)
    })?;

    Ok(Json(Envelope::data(
        counts.into_iter().map(AreaCountResponse::from).collect(),
    )))
}

/// Area routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/areas", get(list_areas).post(create_area))
        .route("/areas/conteo", get(list_area_counts))
        .route(
            "/areas/{id}",
            get(get_area).put(update_area).delete(delete_area),
        )
}
