//! Employee row mapping collaborator.
//!
//! # Responsibility
//! - Define the contract departments use to turn `employees` rows into values.
//! - Provide a plain decoder and table helpers for the `employees` schema.
//!
//! # Invariants
//! - Rows arrive in fixed column order `(id, name, job_title, department_id)`.

use crate::db::Datastore;
use crate::model::employee::Employee;
use crate::repo::department_repo::{RepoError, RepoResult};
use rusqlite::types::Value;

const CREATE_EMPLOYEES_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS employees (
    id INTEGER PRIMARY KEY,
    name TEXT,
    job_title TEXT,
    department_id INTEGER,
    FOREIGN KEY (department_id) REFERENCES departments(id)
);";

/// Maps one `employees` row to the collaborator's employee type.
pub trait EmployeeRepository {
    type Employee;

    fn instance_from_db(&mut self, row: &[Value]) -> RepoResult<Self::Employee>;
}

/// Decodes rows into owned `Employee` values without caching them.
#[derive(Debug, Default)]
pub struct BasicEmployeeRepository;

impl EmployeeRepository for BasicEmployeeRepository {
    type Employee = Employee;

    fn instance_from_db(&mut self, row: &[Value]) -> RepoResult<Employee> {
        let [id, name, job_title, department_id] = row else {
            return Err(RepoError::InvalidData(format!(
                "employees row must have 4 columns, got {}",
                row.len()
            )));
        };

        Ok(Employee {
            id: integer_column(id, "id")?,
            name: text_column(name, "name")?,
            job_title: text_column(job_title, "job_title")?,
            department_id: match department_id {
                Value::Null => None,
                other => Some(integer_column(other, "department_id")?),
            },
        })
    }
}

/// Creates the `employees` table when it does not exist yet.
pub fn create_employees_table<D: Datastore + ?Sized>(store: &D) -> RepoResult<()> {
    store.execute(CREATE_EMPLOYEES_TABLE_SQL, &[])?;
    store.commit()?;
    Ok(())
}

pub fn drop_employees_table<D: Datastore + ?Sized>(store: &D) -> RepoResult<()> {
    store.execute("DROP TABLE IF EXISTS employees;", &[])?;
    store.commit()?;
    Ok(())
}

fn integer_column(value: &Value, column: &str) -> RepoResult<i64> {
    match value {
        Value::Integer(number) => Ok(*number),
        other => Err(RepoError::InvalidData(format!(
            "invalid integer `{other:?}` in employees.{column}"
        ))),
    }
}

fn text_column(value: &Value, column: &str) -> RepoResult<String> {
    match value {
        Value::Text(text) => Ok(text.clone()),
        other => Err(RepoError::InvalidData(format!(
            "invalid text `{other:?}` in employees.{column}"
        ))),
    }
}
