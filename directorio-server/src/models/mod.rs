//! Domain models with validation at construction
//!
//! All user input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod validation;
pub mod area;
pub mod person;
pub mod email;

pub use validation::ValidationError;
pub use area::{AreaId, AreaName, NewArea};
pub use person::{NewPerson, PersonId, PersonName};
pub use email::Email;
