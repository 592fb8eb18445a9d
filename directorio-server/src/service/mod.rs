//! Domain services
//!
//! Services enforce the invariants the HTTP layer cannot see (email
//! ownership, live referenced area, area still in use) and translate
//! gateway not-found signals into domain errors. They hold no locks and
//! open no transactions: the pre-checks give early, friendly errors and
//! the store's constraints settle races.

use crate::db::DbError;
use crate::models::AreaId;

pub mod areas;
pub mod people;

pub use areas::AreaService;
pub use people::PersonService;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Domain error. Display strings are the user-facing `details`.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("área no encontrada")]
    AreaNotFound,

    #[error("persona no encontrada")]
    PersonNotFound,

    #[error("el correo electrónico ya está registrado")]
    DuplicateEmail,

    #[error("ya existe un área con ese nombre")]
    DuplicateAreaName,

    #[error("el área {0} no existe")]
    UnknownArea(AreaId),

    #[error("el área tiene {0} persona(s) asociada(s)")]
    AreaInUse(i64),

    #[error(transparent)]
    Db(#[from] DbError),
}

impl ServiceError {
    /// The requested record itself does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::AreaNotFound | Self::PersonNotFound)
    }
}

#[cfg(test)]
pub(crate) mod testing;
