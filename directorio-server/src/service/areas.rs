//! Area use-cases

use std::sync::Arc;

use crate::db::{Area, AreaRepository, AreaWithCount, DbError};
use crate::models::{AreaId, NewArea};

use super::{ServiceError, ServiceResult};

/// Area service over any area gateway
#[derive(Clone)]
pub struct AreaService {
    repo: Arc<dyn AreaRepository>,
}

impl AreaService {
    pub fn new(repo: Arc<dyn AreaRepository>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, area: &NewArea) -> ServiceResult<Area> {
        self.repo.create(area).await.map_err(write_error)
    }

    pub async fn list(&self, include_deleted: bool) -> ServiceResult<Vec<Area>> {
        Ok(self.repo.list(include_deleted).await?)
    }

    pub async fn get(&self, id: AreaId) -> ServiceResult<Area> {
        self.repo.get(id, false).await.map_err(lookup_error)
    }

    /// Replace name and description of a live area.
    pub async fn update(&self, id: AreaId, area: &NewArea) -> ServiceResult<Area> {
        self.repo.get(id, false).await.map_err(lookup_error)?;
        self.repo.update(id, area).await.map_err(write_error)
    }

    /// Soft delete an area that no live person references.
    pub async fn delete(&self, id: AreaId) -> ServiceResult<()> {
        self.repo.get(id, false).await.map_err(lookup_error)?;

        self.repo.delete(id).await.map_err(|e| match e {
            DbError::InUse { members } => ServiceError::AreaInUse(members),
            other => lookup_error(other),
        })
    }

    pub async fn list_with_count(&self) -> ServiceResult<Vec<AreaWithCount>> {
        Ok(self.repo.list_with_count().await?)
    }
}

fn lookup_error(e: DbError) -> ServiceError {
    match e {
        DbError::NotFound { .. } => ServiceError::AreaNotFound,
        other => other.into(),
    }
}

fn write_error(e: DbError) -> ServiceError {
    match e {
        DbError::UniqueViolation { .. } => ServiceError::DuplicateAreaName,
        other => lookup_error(other),
    }
}
