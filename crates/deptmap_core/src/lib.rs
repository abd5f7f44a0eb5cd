//! Department data mapper over SQLite.
//! This crate owns department validation, identity-map canonicalization and
//! the one-hop lookup of a department's employees.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;

pub use db::{open_db, open_db_in_memory, Datastore, DbError, DbResult, DbRow, StatementOutput};
pub use logging::{default_log_level, init_logging, logging_status, LoggingConfig, LoggingError};
pub use model::department::{Department, DepartmentId, DepartmentValidationError};
pub use model::employee::{Employee, EmployeeId};
pub use repo::department_repo::{
    decode_department_row, DepartmentRepository, RepoError, RepoResult,
};
pub use repo::employee_repo::{
    create_employees_table, drop_employees_table, BasicEmployeeRepository, EmployeeRepository,
};
