//! Repository contracts and PostgreSQL implementations
//!
//! Each repository follows these patterns:
//! - Soft deletes only touch live rows; a second delete is `NotFound`
//! - Constraint violations surface as typed errors carrying the
//!   constraint name, never as opaque database errors
//! - `include_deleted` is the only way to see soft-deleted rows

use async_trait::async_trait;

use crate::models::{AreaId, NewArea, NewPerson, PersonId};

pub mod areas;
pub mod people;

pub use areas::{Area, AreaWithCount, PgAreaRepo};
pub use people::{Person, PgPersonRepo};

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    #[error("unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },

    #[error("foreign key constraint violated: {constraint}")]
    ForeignKeyViolation { constraint: String },

    #[error("still referenced by {members} live row(s)")]
    InUse { members: i64 },
}

impl DbError {
    pub(crate) fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }
}

impl From<sqlx::Error> for DbError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &e {
            let constraint = db.constraint().unwrap_or_default().to_owned();
            if db.is_unique_violation() {
                return Self::UniqueViolation { constraint };
            }
            if db.is_foreign_key_violation() {
                return Self::ForeignKeyViolation { constraint };
            }
        }
        Self::Sqlx(e)
    }
}

/// Area persistence gateway
#[async_trait]
pub trait AreaRepository: Send + Sync {
    async fn create(&self, area: &NewArea) -> Result<Area, DbError>;

    /// All areas ordered by id.
    async fn list(&self, include_deleted: bool) -> Result<Vec<Area>, DbError>;

    async fn get(&self, id: AreaId, include_deleted: bool) -> Result<Area, DbError>;

    /// Replace the mutable fields of a live area.
    async fn update(&self, id: AreaId, area: &NewArea) -> Result<Area, DbError>;

    /// Soft delete a live area that no live person references.
    ///
    /// The member check and the delete are a single store operation;
    /// a referenced area yields `InUse`.
    async fn delete(&self, id: AreaId) -> Result<(), DbError>;

    /// Live areas with their live person count, ordered by id.
    async fn list_with_count(&self) -> Result<Vec<AreaWithCount>, DbError>;

    /// Number of live persons referencing the area.
    async fn count_members(&self, id: AreaId) -> Result<i64, DbError>;
}

/// Person persistence gateway
///
/// Every returned `Person` carries its live area, if any.
#[async_trait]
pub trait PersonRepository: Send + Sync {
    async fn create(&self, person: &NewPerson) -> Result<Person, DbError>;

    /// All persons ordered by id.
    async fn list(&self, include_deleted: bool) -> Result<Vec<Person>, DbError>;

    async fn get(&self, id: PersonId, include_deleted: bool) -> Result<Person, DbError>;

    /// Live person holding `email`.
    async fn get_by_email(&self, email: &str) -> Result<Person, DbError>;

    async fn update(&self, id: PersonId, person: &NewPerson) -> Result<Person, DbError>;

    async fn delete(&self, id: PersonId) -> Result<(), DbError>;
}
