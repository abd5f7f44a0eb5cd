//! Department domain model.
//!
//! # Responsibility
//! - Define the department record mapped onto the `departments` table.
//! - Enforce name/location validation on construction and on every mutation.
//!
//! # Invariants
//! - `name` and `location` are never blank after trimming.
//! - `id` is only assigned by the repository; a value carrying an id lives in
//!   exactly one identity map slot.
//! - Failed setters leave the previous value untouched.

use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned row identifier for a persisted department.
pub type DepartmentId = i64;

/// Validation failures for department fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepartmentValidationError {
    BlankName,
    BlankLocation,
    /// Stored `name` column did not hold text.
    NonTextName,
    /// Stored `location` column did not hold text.
    NonTextLocation,
}

impl Display for DepartmentValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName => write!(f, "name must be a non-empty string"),
            Self::BlankLocation => write!(f, "location must be a non-empty string"),
            Self::NonTextName => write!(f, "name must be a string"),
            Self::NonTextLocation => write!(f, "location must be a string"),
        }
    }
}

impl Error for DepartmentValidationError {}

/// A department, either unsaved (`id == None`) or tracked by a repository.
///
/// Not `Clone`: a second in-memory copy of a persisted row would break
/// identity-map canonicalization.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct Department {
    id: Option<DepartmentId>,
    name: String,
    location: String,
}

impl Department {
    /// Builds an unsaved department after validating both fields.
    pub fn new(
        name: impl Into<String>,
        location: impl Into<String>,
    ) -> Result<Self, DepartmentValidationError> {
        let name = name.into();
        let location = location.into();
        validate_name(&name)?;
        validate_location(&location)?;

        Ok(Self {
            id: None,
            name,
            location,
        })
    }

    pub fn id(&self) -> Option<DepartmentId> {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    /// Returns whether the store has assigned an id to this department.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Replaces the name; rejected values keep the old name.
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), DepartmentValidationError> {
        let name = name.into();
        validate_name(&name)?;
        self.name = name;
        Ok(())
    }

    /// Replaces the location; rejected values keep the old location.
    pub fn set_location(
        &mut self,
        location: impl Into<String>,
    ) -> Result<(), DepartmentValidationError> {
        let location = location.into();
        validate_location(&location)?;
        self.location = location;
        Ok(())
    }

    /// Re-checks both fields. Repository write paths call this before SQL.
    pub fn validate(&self) -> Result<(), DepartmentValidationError> {
        validate_name(&self.name)?;
        validate_location(&self.location)
    }

    pub(crate) fn assign_id(&mut self, id: DepartmentId) {
        self.id = Some(id);
    }

    pub(crate) fn clear_id(&mut self) {
        self.id = None;
    }

    /// Copies the stored fields of an already validated row onto this instance.
    pub(crate) fn refresh_from(&mut self, loaded: Department) {
        self.name = loaded.name;
        self.location = loaded.location;
    }
}

impl Display for Department {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.id {
            Some(id) => write!(f, "<Department {id}: {}, {}>", self.name, self.location),
            None => write!(f, "<Department None: {}, {}>", self.name, self.location),
        }
    }
}

fn validate_name(value: &str) -> Result<(), DepartmentValidationError> {
    if value.trim().is_empty() {
        return Err(DepartmentValidationError::BlankName);
    }
    Ok(())
}

fn validate_location(value: &str) -> Result<(), DepartmentValidationError> {
    if value.trim().is_empty() {
        return Err(DepartmentValidationError::BlankLocation);
    }
    Ok(())
}
