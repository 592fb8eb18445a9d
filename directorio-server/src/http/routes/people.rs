//! Person endpoints

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::areas::AreaResponse;
use super::{Confirmation, Envelope};
use crate::db::Person;
use crate::http::error::{ApiError, Missing};
use crate::http::extractors::{ListQuery, RecordId, ValidJson};
use crate::http::server::AppState;
use crate::models::{AreaId, NewPerson, PersonId, ValidationError};

const PERSON_NOT_FOUND: Missing = Missing::NotFound("Persona no encontrada");

/// Create/replace person request
#[derive(Debug, Deserialize)]
pub struct PersonRequest {
    pub nombre: String,
    pub email: String,
    pub area_id: u32,
}

impl PersonRequest {
    fn validate(&self) -> Result<NewPerson, ValidationError> {
        NewPerson::new(&self.nombre, &self.email, self.area_id)
    }
}

/// Person response, with the area nested when it is live
#[derive(Debug, Serialize)]
pub struct PersonResponse {
    #[serde(rename = "ID")]
    pub id: PersonId,
    #[serde(rename = "CreatedAt")]
    pub created_at: String,
    #[serde(rename = "UpdatedAt")]
    pub updated_at: String,
    #[serde(rename = "DeletedAt")]
    pub deleted_at: Option<String>,
    pub nombre: String,
    pub email: String,
    pub area_id: AreaId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<AreaResponse>,
}

impl From<Person> for PersonResponse {
    fn from(p: Person) -> Self {
        Self {
            id: p.id,
            created_at: p.created_at.to_rfc3339(),
            updated_at: p.updated_at.to_rfc3339(),
            deleted_at: p.deleted_at.map(|t| t.to_rfc3339()),
            nombre: p.nombre,
            email: p.email,
            area_id: p.area_id,
            area: p.area.map(AreaResponse::from),
        }
    }
}

/// POST /personas - register a person
async fn create_person(
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<PersonRequest>,
) -> Result<(StatusCode, Json<Envelope<PersonResponse>>), ApiError> {
    let input = req.validate()?;
    let person = state
        .people
        .create(&input)
        .await
        .map_err(|e| ApiError::service("Error al registrar la persona", e, Missing::BadRequest))?;

    tracing::info!(id = person.id, area_id = person.area_id, "Person registered");
    Ok((
        StatusCode::CREATED,
        Json(Envelope::with_message(
            "Persona registrada exitosamente",
            person.into(),
        )),
    ))
}

/// GET /personas - list persons with their areas
async fn list_people(
    State(state): State<Arc<AppState>>,
    query: ListQuery,
) -> Result<Json<Envelope<Vec<PersonResponse>>>, ApiError> {
    let people = state
        .people
        .list(query.include_deleted)
        .await
        .map_err(|e| ApiError::service("Error al obtener las personas", e, Missing::BadRequest))?;

    Ok(Json(Envelope::data(
        people.into_iter().map(PersonResponse::from).collect(),
    )))
}

/// GET /personas/{id}
async fn get_person(
    State(state): State<Arc<AppState>>,
    RecordId(id): RecordId,
) -> Result<Json<Envelope<PersonResponse>>, ApiError> {
    let person = state
        .people
        .get(id)
        .await
        .map_err(|e| ApiError::service("Error al obtener la persona", e, PERSON_NOT_FOUND))?;

    Ok(Json(Envelope::data(person.into())))
}

/// GET /personas/email/{email}
async fn get_person_by_email(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> Result<Json<Envelope<PersonResponse>>, ApiError> {
    let person = state
        .people
        .get_by_email(&email)
        .await
        .map_err(|e| ApiError::service("Error al obtener la persona", e, PERSON_NOT_FOUND))?;

    Ok(Json(Envelope::data(person.into())))
}

/// PUT /personas/{id} - replace a person
///
/// A missing person answers 400, not 404.
async fn update_person(
    State(state): State<Arc<AppState>>,
    RecordId(id): RecordId,
    ValidJson(req): ValidJson<PersonRequest>,
) -> Result<Json<Envelope<PersonResponse>>, ApiError> {
    let input = req.validate()?;
    let person = state
        .people
        .update(id, &input)
        .await
        .map_err(|e| ApiError::service("Error al actualizar la persona", e, Missing::BadRequest))?;

    Ok(Json(Envelope::with_message(
        "Persona actualizada exitosamente",
        person.into(),
    )))
}

/// DELETE /personas/{id} - soft delete
async fn delete_person(
    State(state): State<Arc<AppState>>,
    RecordId(id): RecordId,
) -> Result<Json<Confirmation>, ApiError> {
    state
        .people
        .delete(id)
        .await
        .map_err(|e| {
            let label = "Error al eliminar la persona";
            ApiError::service(label, e, Missing::NotFound(label))
        })?;

    tracing::info!(id, "Person deleted");
    Ok(Json(Confirmation {
        message: "Persona eliminada exitosamente",
    }))
}

/// Person routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/personas", get(list_people).post(create_person))
        .route("/personas/email/{email}", get(get_person_by_email))
        .route(
            "/personas/{id}",
            get(get_person).put(update_person).delete(delete_person),
        )
}
