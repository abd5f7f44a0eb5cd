//! Department repository with a session-owned identity map.
//!
//! # Responsibility
//! - Provide CRUD over the `departments` table through a `Datastore`.
//! - Canonicalize loaded rows so each persisted id has one live instance.
//! - Resolve the one-hop `employees.department_id` relationship.
//!
//! # Invariants
//! - Every department with an id is held in `identity_map` under that id.
//! - Write paths call `Department::validate()` before any SQL.
//! - Every mutating statement is followed by `Datastore::commit`.
//! - Row decoding validates the whole row before touching a live instance.

use crate::db::{Datastore, DbError};
use crate::model::department::{Department, DepartmentId, DepartmentValidationError};
use crate::repo::employee_repo::EmployeeRepository;
use log::{debug, warn};
use rusqlite::types::Value;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

const CREATE_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS departments (
    id INTEGER PRIMARY KEY,
    name TEXT,
    location TEXT
);";

const DROP_TABLE_SQL: &str = "DROP TABLE IF EXISTS departments;";

const DEPARTMENT_SELECT_SQL: &str = "SELECT id, name, location FROM departments";

const EMPLOYEE_SELECT_SQL: &str =
    "SELECT id, name, job_title, department_id FROM employees WHERE department_id = ?1;";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for department persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(DepartmentValidationError),
    Db(DbError),
    NotFound(DepartmentId),
    /// The operation is not valid for the department's lifecycle state.
    InvalidState(String),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "department not found: {id}"),
            Self::InvalidState(message) => write!(f, "invalid department state: {message}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidState(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<DepartmentValidationError> for RepoError {
    fn from(value: DepartmentValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Department data mapper bound to one datastore.
///
/// The repository owns every persisted `Department` it has seen; callers
/// borrow instances through it and address them by id. Tracked instances are
/// only ever lent out shared, so they can't be swapped out of the map:
///
/// ```compile_fail
/// use deptmap_core::db::open_db_in_memory;
/// use deptmap_core::{Department, DepartmentRepository};
///
/// let conn = open_db_in_memory().unwrap();
/// let mut repo = DepartmentRepository::new(&conn);
/// repo.create_table().unwrap();
/// let tracked = repo.create("Payroll", "Building A").unwrap();
/// let _ = std::mem::replace(tracked, Department::new("Ghost", "Nowhere").unwrap());
/// ```
pub struct DepartmentRepository<'ds, D: Datastore + ?Sized> {
    store: &'ds D,
    identity_map: BTreeMap<DepartmentId, Department>,
}

impl<'ds, D: Datastore + ?Sized> DepartmentRepository<'ds, D> {
    /// Creates a repository with an empty identity map.
    pub fn new(store: &'ds D) -> Self {
        Self {
            store,
            identity_map: BTreeMap::new(),
        }
    }

    /// Creates the `departments` table when it does not exist yet.
    pub fn create_table(&self) -> RepoResult<()> {
        self.store.execute(CREATE_TABLE_SQL, &[])?;
        self.store.commit()?;
        debug!("event=department_create_table module=repo status=ok");
        Ok(())
    }

    /// Drops the `departments` table when present.
    ///
    /// Tracked instances no longer have rows behind them, so the identity map
    /// is cleared as well.
    pub fn drop_table(&mut self) -> RepoResult<()> {
        self.store.execute(DROP_TABLE_SQL, &[])?;
        self.store.commit()?;
        self.identity_map.clear();
        debug!("event=department_drop_table module=repo status=ok");
        Ok(())
    }

    /// Inserts an unsaved department and takes ownership of it.
    ///
    /// Returns the now-tracked instance carrying its store-assigned id.
    ///
    /// # Errors
    /// - `InvalidState` when the value already carries an id.
    pub fn save(&mut self, mut department: Department) -> RepoResult<&Department> {
        if let Some(id) = department.id() {
            return Err(RepoError::InvalidState(format!(
                "department {id} is already persisted"
            )));
        }
        department.validate()?;

        let output = self.store.execute(
            "INSERT INTO departments (name, location) VALUES (?1, ?2);",
            &[
                Value::Text(department.name().to_string()),
                Value::Text(department.location().to_string()),
            ],
        )?;
        self.store.commit()?;

        let id = output.last_insert_id()?;
        department.assign_id(id);
        debug!("event=department_save module=repo status=ok id={id}");

        match self.identity_map.entry(id) {
            Entry::Occupied(mut entry) => {
                // Row ids can be reused after an out-of-band delete of the max id.
                warn!("event=department_save module=repo status=replaced_stale id={id}");
                entry.insert(department);
                Ok(&*entry.into_mut())
            }
            Entry::Vacant(entry) => Ok(&*entry.insert(department)),
        }
    }

    /// Validates, inserts and returns a new tracked department.
    pub fn create(
        &mut self,
        name: impl Into<String>,
        location: impl Into<String>,
    ) -> RepoResult<&Department> {
        let department = Department::new(name, location)?;
        self.save(department)
    }

    /// Writes the department's current name and location to its row.
    ///
    /// # Errors
    /// - `InvalidState` when the department has never been saved.
    /// - `NotFound` when no row matches its id.
    pub fn update(&self, department: &Department) -> RepoResult<()> {
        let id = department.id().ok_or_else(|| {
            RepoError::InvalidState("cannot update a department that has not been saved".into())
        })?;
        department.validate()?;

        let changed = self
            .store
            .execute(
                "UPDATE departments SET name = ?1, location = ?2 WHERE id = ?3;",
                &[
                    Value::Text(department.name().to_string()),
                    Value::Text(department.location().to_string()),
                    Value::Integer(id),
                ],
            )?
            .rows_affected()?;
        self.store.commit()?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        debug!("event=department_update module=repo status=ok id={id}");
        Ok(())
    }

    /// Deletes the row for a tracked department and hands the instance back
    /// detached, with its id reset to `None`.
    ///
    /// # Errors
    /// - `InvalidState` when `id` is not tracked by this repository.
    /// - `NotFound` when the row is already gone; the instance stays tracked.
    pub fn delete(&mut self, id: DepartmentId) -> RepoResult<Department> {
        if !self.identity_map.contains_key(&id) {
            return Err(RepoError::InvalidState(format!(
                "department {id} is not loaded in this repository"
            )));
        }

        let changed = self
            .store
            .execute(
                "DELETE FROM departments WHERE id = ?1;",
                &[Value::Integer(id)],
            )?
            .rows_affected()?;
        self.store.commit()?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        let mut department = self
            .identity_map
            .remove(&id)
            .ok_or_else(|| RepoError::InvalidState(format!("department {id} vanished")))?;
        department.clear_id();
        debug!("event=department_delete module=repo status=ok id={id}");
        Ok(department)
    }

    /// Canonicalizes a `(id, name, location)` row against the identity map.
    ///
    /// An already tracked instance is refreshed in place and returned;
    /// otherwise a new instance is registered.
    pub fn instance_from_db(&mut self, row: &[Value]) -> RepoResult<&Department> {
        let (id, loaded) = decode_department_row(row)?;

        match self.identity_map.entry(id) {
            Entry::Occupied(entry) => {
                let existing = entry.into_mut();
                existing.assign_id(id);
                existing.refresh_from(loaded);
                Ok(&*existing)
            }
            Entry::Vacant(entry) => {
                let mut department = loaded;
                department.assign_id(id);
                Ok(&*entry.insert(department))
            }
        }
    }

    /// Loads every department, in store order.
    pub fn get_all(&mut self) -> RepoResult<Vec<&Department>> {
        let rows = self
            .store
            .execute(&format!("{DEPARTMENT_SELECT_SQL};"), &[])?
            .into_rows()?;

        let mut ids = Vec::with_capacity(rows.len());
        for row in &rows {
            ids.push(self.canonical_id(row)?);
        }
        debug!(
            "event=department_get_all module=repo status=ok count={}",
            ids.len()
        );

        let this = &*self;
        ids.into_iter().map(|id| this.tracked(id)).collect()
    }

    /// Looks up one department by id.
    pub fn find_by_id(&mut self, id: DepartmentId) -> RepoResult<Option<&Department>> {
        self.find_one(
            &format!("{DEPARTMENT_SELECT_SQL} WHERE id = ?1;"),
            Value::Integer(id),
        )
    }

    /// Looks up the first department with exactly this name.
    pub fn find_by_name(&mut self, name: &str) -> RepoResult<Option<&Department>> {
        self.find_one(
            &format!("{DEPARTMENT_SELECT_SQL} WHERE name IS ?1 LIMIT 1;"),
            Value::Text(name.to_string()),
        )
    }

    /// Loads the employees whose `department_id` points at this department.
    ///
    /// # Errors
    /// - `InvalidState` when the department has never been saved.
    pub fn employees<E: EmployeeRepository + ?Sized>(
        &self,
        department: &Department,
        employee_repo: &mut E,
    ) -> RepoResult<Vec<E::Employee>> {
        let id = department.id().ok_or_else(|| {
            RepoError::InvalidState(
                "cannot list employees of a department that has not been saved".into(),
            )
        })?;

        let rows = self
            .store
            .execute(EMPLOYEE_SELECT_SQL, &[Value::Integer(id)])?
            .into_rows()?;

        rows.iter()
            .map(|row| employee_repo.instance_from_db(row))
            .collect()
    }

    /// Returns the tracked instance for `id`, without touching the store.
    pub fn get(&self, id: DepartmentId) -> Option<&Department> {
        self.identity_map.get(&id)
    }

    /// Renames a tracked department in memory; `update` persists it.
    ///
    /// # Errors
    /// - `InvalidState` when `id` is not tracked by this repository.
    /// - `Validation` for a blank name; the previous name is kept.
    pub fn set_name(&mut self, id: DepartmentId, name: impl Into<String>) -> RepoResult<()> {
        self.tracked_mut(id)?.set_name(name)?;
        Ok(())
    }

    /// Moves a tracked department in memory; `update` persists it.
    ///
    /// # Errors
    /// - `InvalidState` when `id` is not tracked by this repository.
    /// - `Validation` for a blank location; the previous location is kept.
    pub fn set_location(
        &mut self,
        id: DepartmentId,
        location: impl Into<String>,
    ) -> RepoResult<()> {
        self.tracked_mut(id)?.set_location(location)?;
        Ok(())
    }

    pub fn is_tracked(&self, id: DepartmentId) -> bool {
        self.identity_map.contains_key(&id)
    }

    /// Number of live instances in the identity map.
    pub fn tracked_len(&self) -> usize {
        self.identity_map.len()
    }

    fn find_one(&mut self, sql: &str, param: Value) -> RepoResult<Option<&Department>> {
        let rows = self.store.execute(sql, &[param])?.into_rows()?;
        match rows.first() {
            Some(row) => self.instance_from_db(row).map(Some),
            None => Ok(None),
        }
    }

    fn canonical_id(&mut self, row: &[Value]) -> RepoResult<DepartmentId> {
        let department = self.instance_from_db(row)?;
        department.id().ok_or_else(|| {
            RepoError::InvalidState("loaded department is missing its id".into())
        })
    }

    fn tracked_mut(&mut self, id: DepartmentId) -> RepoResult<&mut Department> {
        self.identity_map
            .get_mut(&id)
            .ok_or_else(|| RepoError::InvalidState(format!("department {id} is not tracked")))
    }

    fn tracked(&self, id: DepartmentId) -> RepoResult<&Department> {
        self.identity_map
            .get(&id)
            .ok_or_else(|| RepoError::InvalidState(format!("department {id} is not tracked")))
    }
}

/// Decodes a department row with fixed column order `(id, name, location)`.
///
/// The returned department is unsaved and already validated, so it can be
/// applied to a live instance without risking a partial update.
pub fn decode_department_row(row: &[Value]) -> RepoResult<(DepartmentId, Department)> {
    let [id, name, location] = row else {
        return Err(RepoError::InvalidData(format!(
            "departments row must have 3 columns, got {}",
            row.len()
        )));
    };

    let id = match id {
        Value::Integer(id) => *id,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid id value `{other:?}` in departments.id"
            )));
        }
    };

    let Value::Text(name) = name else {
        return Err(DepartmentValidationError::NonTextName.into());
    };
    let Value::Text(location) = location else {
        return Err(DepartmentValidationError::NonTextLocation.into());
    };

    Ok((id, Department::new(name.as_str(), location.as_str())?))
}
