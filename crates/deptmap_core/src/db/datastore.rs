//! Statement execution contract and its SQLite implementation.
//!
//! # Invariants
//! - Read statements yield every row, in store order, as owned values.
//! - Write statements yield the affected row count and last inserted rowid.
//! - `commit` is a no-op while the connection is in auto-commit mode.

use super::{DbError, DbResult};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};

/// One result row, columns in the order the statement selected them.
pub type DbRow = Vec<Value>;

/// Output of a single executed statement.
#[derive(Debug, Clone, PartialEq)]
pub enum StatementOutput {
    Rows(Vec<DbRow>),
    Changed {
        rows_affected: usize,
        last_insert_id: i64,
    },
}

impl StatementOutput {
    pub fn into_rows(self) -> DbResult<Vec<DbRow>> {
        match self {
            Self::Rows(rows) => Ok(rows),
            Self::Changed { .. } => Err(DbError::UnexpectedOutput { expected: "rows" }),
        }
    }

    pub fn rows_affected(&self) -> DbResult<usize> {
        match self {
            Self::Changed { rows_affected, .. } => Ok(*rows_affected),
            Self::Rows(_) => Err(DbError::UnexpectedOutput {
                expected: "affected row count",
            }),
        }
    }

    pub fn last_insert_id(&self) -> DbResult<i64> {
        match self {
            Self::Changed { last_insert_id, .. } => Ok(*last_insert_id),
            Self::Rows(_) => Err(DbError::UnexpectedOutput {
                expected: "last insert id",
            }),
        }
    }
}

/// Persistence collaborator: executes one SQL statement and commits.
pub trait Datastore {
    fn execute(&self, sql: &str, params: &[Value]) -> DbResult<StatementOutput>;
    fn commit(&self) -> DbResult<()>;
}

impl Datastore for Connection {
    fn execute(&self, sql: &str, params: &[Value]) -> DbResult<StatementOutput> {
        let mut stmt = self.prepare(sql)?;

        if stmt.readonly() {
            let column_count = stmt.column_count();
            let mut rows = stmt.query(params_from_iter(params.iter()))?;
            let mut collected = Vec::new();
            while let Some(row) = rows.next()? {
                let mut values = Vec::with_capacity(column_count);
                for index in 0..column_count {
                    values.push(row.get::<_, Value>(index)?);
                }
                collected.push(values);
            }
            return Ok(StatementOutput::Rows(collected));
        }

        let rows_affected = stmt.execute(params_from_iter(params.iter()))?;
        Ok(StatementOutput::Changed {
            rows_affected,
            last_insert_id: self.last_insert_rowid(),
        })
    }

    fn commit(&self) -> DbResult<()> {
        if !self.is_autocommit() {
            self.execute_batch("COMMIT;")?;
        }
        Ok(())
    }
}
