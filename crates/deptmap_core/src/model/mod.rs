//! Domain model for the department mapper.
//!
//! # Responsibility
//! - Define the values mapped onto `departments` and `employees` rows.
//!
//! # Invariants
//! - A department id is assigned by the store, never by callers.

pub mod department;
pub mod employee;
