//! Command-line front end for the department mapper.
//!
//! # Responsibility
//! - Map subcommands onto `DepartmentRepository` operations.
//! - Resolve database and logging configuration from flags or environment.

mod cli;

use clap::Parser;
use cli::{Command, Opts};
use deptmap_core::db::{open_db, open_db_in_memory};
use deptmap_core::{
    create_employees_table, default_log_level, drop_employees_table, init_logging,
    BasicEmployeeRepository, Department, DepartmentId, DepartmentRepository, RepoError,
};
use log::{error, info};
use rusqlite::Connection;
use std::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    let opts = Opts::parse();

    if let Some(log_dir) = opts.log_dir.as_deref() {
        let level = opts.log_level.as_deref().unwrap_or(default_log_level());
        if let Err(err) = init_logging(level, log_dir) {
            eprintln!("warning: logging disabled: {err}");
        }
    }

    match run(opts) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_command module=cli status=error error={err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(opts: Opts) -> Result<(), Box<dyn Error>> {
    let conn = match opts.db.as_deref() {
        Some(path) => open_db(path)?,
        None => open_db_in_memory()?,
    };

    if let Command::Reset = opts.cmd {
        drop_employees_table(&conn)?;
        DepartmentRepository::new(&conn).drop_table()?;
    }
    ensure_schema(&conn)?;

    let mut repo = DepartmentRepository::new(&conn);
    match opts.cmd {
        Command::Init | Command::Reset => println!("schema ready"),
        Command::Add { name, location } => {
            println!("{}", repo.create(name, location)?);
        }
        Command::List => {
            for department in repo.get_all()? {
                println!("{department}");
            }
        }
        Command::Show { id } => {
            println!("{}", load(&mut repo, id)?);
        }
        Command::Find { name } => match repo.find_by_name(&name)? {
            Some(department) => println!("{department}"),
            None => return Err(format!("no department named `{name}`").into()),
        },
        Command::Update { id, name, location } => {
            load(&mut repo, id)?;
            if let Some(name) = name {
                repo.set_name(id, name)?;
            }
            if let Some(location) = location {
                repo.set_location(id, location)?;
            }
            let department = tracked(&repo, id)?;
            repo.update(department)?;
            println!("{department}");
        }
        Command::Delete { id } => {
            load(&mut repo, id)?;
            let detached = repo.delete(id)?;
            println!("deleted {detached}");
        }
        Command::Employees { id } => {
            load(&mut repo, id)?;
            let employees = repo.employees(tracked(&repo, id)?, &mut BasicEmployeeRepository)?;
            for employee in employees {
                println!("{employee}");
            }
        }
    }

    info!("event=cli_command module=cli status=ok");
    Ok(())
}

fn ensure_schema(conn: &Connection) -> Result<(), RepoError> {
    DepartmentRepository::new(conn).create_table()?;
    create_employees_table(conn)
}

fn load<'r>(
    repo: &'r mut DepartmentRepository<'_, Connection>,
    id: DepartmentId,
) -> Result<&'r Department, RepoError> {
    repo.find_by_id(id)?.ok_or(RepoError::NotFound(id))
}

fn tracked<'r>(
    repo: &'r DepartmentRepository<'_, Connection>,
    id: DepartmentId,
) -> Result<&'r Department, RepoError> {
    repo.get(id).ok_or(RepoError::NotFound(id))
}
