//! Repository layer over the `Datastore` seam.
//!
//! # Responsibility
//! - Own department persistence and identity-map canonicalization.
//! - Define the employee mapping contract used for relationship lookups.
//!
//! # Invariants
//! - Repository writes enforce `Department::validate()` before persistence.
//! - Repository APIs return semantic errors (`NotFound`, `InvalidState`) in
//!   addition to store errors, which pass through unchanged.

pub mod department_repo;
pub mod employee_repo;
