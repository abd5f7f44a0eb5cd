//! Employee read model.
//!
//! Employees are owned by their own collaborator; departments only read them
//! through the one-hop `department_id` relationship.

use crate::model::department::DepartmentId;
use serde::Serialize;
use std::fmt::{Display, Formatter};

/// Row identifier for an employee.
pub type EmployeeId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    pub job_title: String,
    /// `None` when the employee is not assigned to any department.
    pub department_id: Option<DepartmentId>,
}

impl Display for Employee {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "<Employee {}: {}, {}, ", self.id, self.name, self.job_title)?;
        match self.department_id {
            Some(department_id) => write!(f, "Department ID: {department_id}>"),
            None => write!(f, "Department ID: None>"),
        }
    }
}
