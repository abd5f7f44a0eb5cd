use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Manage departments stored in a SQLite database.
///
/// Without `--db` every invocation works on a fresh in-memory database, which
/// is only useful for smoke checks.
#[derive(Parser, Debug)]
#[command(name = "deptmap", version)]
pub(crate) struct Opts {
    /// SQLite database file
    #[arg(global = true, long, env = "DEPTMAP_DB", value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(global = true, long, env = "DEPTMAP_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Absolute directory for rolling log files; logging is off when unset
    #[arg(global = true, long, env = "DEPTMAP_LOG_DIR", value_name = "DIR")]
    pub log_dir: Option<String>,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Create the departments and employees tables
    Init,
    /// Drop and recreate both tables
    Reset,
    /// Add a department
    Add { name: String, location: String },
    /// List all departments
    List,
    /// Show one department by id
    Show { id: i64 },
    /// Find the first department with this exact name
    Find { name: String },
    /// Change the name and/or location of a department
    Update {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        location: Option<String>,
    },
    /// Delete a department
    Delete { id: i64 },
    /// List the employees of a department
    Employees { id: i64 },
}
