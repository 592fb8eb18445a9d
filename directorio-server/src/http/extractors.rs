//! Custom Axum extractors
//!
//! Both reject with `ApiError` so malformed input never reaches a
//! service and always answers with the standard error body.

use axum::body::Bytes;
use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::error::ApiError;

/// Extract a record id from path, accepting unsigned 32-bit integers only
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordId(pub i64);

impl<S> FromRequestParts<S> for RecordId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::InvalidId)?;

        parse_id(&raw)
            .map(|id| Self(i64::from(id)))
            .ok_or(ApiError::InvalidId)
    }
}

/// Decimal digits only; `str::parse` alone would also take a leading `+`.
fn parse_id(raw: &str) -> Option<u32> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

/// Query string of list endpoints
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct ListQuery {
    /// Also return soft-deleted records
    #[serde(default)]
    pub include_deleted: bool,
}

impl<S> FromRequestParts<S> for ListQuery
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<ListQuery>::try_from_uri(&parts.uri).map_err(|e| {
            ApiError::BadRequest {
                error: "Parámetros inválidos",
                details: e.body_text(),
            }
        })?;
        Ok(query)
    }
}

/// JSON body extractor that ignores `Content-Type` and maps every
/// failure (unreadable body, syntax, missing field, wrong type) to 400
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::InvalidBody {
                details: e.body_text(),
            })?;

        serde_json::from_slice(&bytes)
            .map(Self)
            .map_err(|e| ApiError::InvalidBody {
                details: e.to_string(),
            })
    }
}
