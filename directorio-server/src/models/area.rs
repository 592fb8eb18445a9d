//! Area input validation
//!
//! Area names are unique among live areas; uniqueness itself is the
//! store's job, this module only checks shape.

use super::validation::bounded_text;
use super::ValidationError;

/// Surrogate key of an area row
pub type AreaId = i64;

/// Maximum length for area names (matches `VARCHAR(100)`)
pub const MAX_AREA_NAME_LEN: usize = 100;

/// Validated area name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AreaName(String);

impl AreaName {
    /// Create a new area name.
    ///
    /// # Rules
    /// - Non-empty (after trimming whitespace)
    /// - Max 100 characters
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        bounded_text(s, "nombre", MAX_AREA_NAME_LEN).map(Self)
    }

    /// Get the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for AreaName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Validated payload for creating or replacing an area
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewArea {
    pub nombre: AreaName,
    pub descripcion: String,
}

impl NewArea {
    pub fn new(nombre: &str, descripcion: Option<&str>) -> Result<Self, ValidationError> {
        Ok(Self {
            nombre: AreaName::new(nombre)?,
            descripcion: descripcion.unwrap_or_default().to_owned(),
        })
    }
}
