//! Person input validation

use super::validation::bounded_text;
use super::{AreaId, Email, ValidationError};

/// Surrogate key of a person row
pub type PersonId = i64;

/// Maximum length for person names (matches `VARCHAR(200)`)
pub const MAX_PERSON_NAME_LEN: usize = 200;

/// Validated person name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonName(String);

impl PersonName {
    /// Create a new person name.
    ///
    /// # Rules
    /// - Non-empty (after trimming whitespace)
    /// - Max 200 characters
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        bounded_text(s, "nombre", MAX_PERSON_NAME_LEN).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Validated payload for creating or replacing a person
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPerson {
    pub nombre: PersonName,
    pub email: Email,
    pub area_id: AreaId,
}

impl NewPerson {
    /// Validate every field; `area_id` must be a positive id.
    pub fn new(nombre: &str, email: &str, area_id: u32) -> Result<Self, ValidationError> {
        if area_id == 0 {
            return Err(ValidationError::Empty { field: "area_id" });
        }

        Ok(Self {
            nombre: PersonName::new(nombre)?,
            email: Email::new(email)?,
            area_id: AreaId::from(area_id),
        })
    }
}
