//! Test doubles shared by service and HTTP tests

use async_trait::async_trait;

use crate::db::{Area, AreaRepository, AreaWithCount, DbError, Person, PersonRepository};
use crate::models::{AreaId, NewArea, NewPerson, PersonId};

/// Backend whose every call fails like an unreachable database
pub(crate) struct BrokenStore;

fn down<T>() -> Result<T, DbError> {
    Err(DbError::Sqlx(sqlx::Error::PoolTimedOut))
}

#[async_trait]
impl AreaRepository for BrokenStore {
    async fn create(&self, _: &NewArea) -> Result<Area, DbError> {
        down()
    }
    async fn list(&self, _: bool) -> Result<Vec<Area>, DbError> {
        down()
    }
    async fn get(&self, _: AreaId, _: bool) -> Result<Area, DbError> {
        down()
    }
    async fn update(&self, _: AreaId, _: &NewArea) -> Result<Area, DbError> {
        down()
    }
    async fn delete(&self, _: AreaId) -> Result<(), DbError> {
        down()
    }
    async fn list_with_count(&self) -> Result<Vec<AreaWithCount>, DbError> {
        down()
    }
    async fn count_members(&self, _: AreaId) -> Result<i64, DbError> {
        down()
    }
}

#[async_trait]
impl PersonRepository for BrokenStore {
    async fn create(&self, _: &NewPerson) -> Result<Person, DbError> {
        down()
    }
    async fn list(&self, _: bool) -> Result<Vec<Person>, DbError> {
        down()
    }
    async fn get(&self, _: PersonId, _: bool) -> Result<Person, DbError> {
        down()
    }
    async fn get_by_email(&self, _: &str) -> Result<Person, DbError> {
        down()
    }
    async fn update(&self, _: PersonId, _: &NewPerson) -> Result<Person, DbError> {
        down()
    }
    async fn delete(&self, _: PersonId) -> Result<(), DbError> {
        down()
    }
}
