//! SQLite storage bootstrap and the datastore seam used by repositories.
//!
//! # Responsibility
//! - Open and configure SQLite connections.
//! - Define the `Datastore` contract repositories execute statements through.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON`.
//! - Write statements are committed by the caller through `Datastore::commit`.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod datastore;
mod open;

pub use datastore::{Datastore, DbRow, StatementOutput};
pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// A statement produced a different kind of output than its caller needs.
    UnexpectedOutput { expected: &'static str },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnexpectedOutput { expected } => {
                write!(f, "statement output mismatch: expected {expected}")
            }
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnexpectedOutput { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
