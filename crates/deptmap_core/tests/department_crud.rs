use deptmap_core::db::open_db_in_memory;
use deptmap_core::{DepartmentRepository, DepartmentValidationError, RepoError};
use rusqlite::Connection;

fn department_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM departments;", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn create_then_find_by_id_returns_same_fields() {
    let conn = open_db_in_memory().unwrap();
    let mut repo = DepartmentRepository::new(&conn);
    repo.create_table().unwrap();

    let id = repo
        .create("Engineering", "Building A")
        .unwrap()
        .id()
        .unwrap();
    assert_eq!(id, 1);

    let found = repo.find_by_id(id).unwrap().unwrap();
    assert_eq!(found.id(), Some(id));
    assert_eq!(found.name(), "Engineering");
    assert_eq!(found.location(), "Building A");
}

#[test]
fn update_persists_renamed_department() {
    let conn = open_db_in_memory().unwrap();
    let mut repo = DepartmentRepository::new(&conn);
    repo.create_table().unwrap();

    let id = repo
        .create("Engineering", "Building A")
        .unwrap()
        .id()
        .unwrap();
    repo.set_name(id, "Eng").unwrap();
    repo.update(repo.get(id).unwrap()).unwrap();

    let stored: String = conn
        .query_row("SELECT name FROM departments WHERE id = ?1;", [id], |row| {
            row.get(0)
        })
        .unwrap();
    assert_eq!(stored, "Eng");

    let found = repo.find_by_name("Eng").unwrap().unwrap();
    assert_eq!(found.id(), Some(id));
    assert_eq!(found.location(), "Building A");
    assert_eq!(repo.tracked_len(), 1);
}

#[test]
fn find_returns_none_when_no_row_matches() {
    let conn = open_db_in_memory().unwrap();
    let mut repo = DepartmentRepository::new(&conn);
    repo.create_table().unwrap();
    repo.create("Payroll", "Building C").unwrap();

    assert!(repo.find_by_id(42).unwrap().is_none());
    assert!(repo.find_by_name("payroll").unwrap().is_none());
}

#[test]
fn find_by_name_returns_first_match() {
    let conn = open_db_in_memory().unwrap();
    let mut repo = DepartmentRepository::new(&conn);
    repo.create_table().unwrap();
    let first = repo.create("Sales", "Floor 1").unwrap().id().unwrap();
    repo.create("Sales", "Floor 2").unwrap();

    let found = repo.find_by_name("Sales").unwrap().unwrap();
    assert_eq!(found.id(), Some(first));
}

#[test]
fn delete_removes_row_and_detaches_instance() {
    let conn = open_db_in_memory().unwrap();
    let mut repo = DepartmentRepository::new(&conn);
    repo.create_table().unwrap();

    let id = repo
        .create("Human Resources", "Building C")
        .unwrap()
        .id()
        .unwrap();
    let detached = repo.delete(id).unwrap();

    assert_eq!(detached.id(), None);
    assert_eq!(detached.name(), "Human Resources");
    assert!(!repo.is_tracked(id));
    assert!(repo.find_by_id(id).unwrap().is_none());
    assert_eq!(department_count(&conn), 0);

    let saved_again = repo.save(detached).unwrap();
    assert!(saved_again.is_persisted());
}

#[test]
fn get_all_length_matches_table_and_keeps_store_order() {
    let conn = open_db_in_memory().unwrap();
    let mut repo = DepartmentRepository::new(&conn);
    repo.create_table().unwrap();
    for (name, location) in [
        ("Payroll", "Building A"),
        ("Human Resources", "Building C"),
        ("Accounting", "Building B"),
    ] {
        repo.create(name, location).unwrap();
    }
    let expected = department_count(&conn);

    let all = repo.get_all().unwrap();
    assert_eq!(all.len() as i64, expected);
    let names: Vec<&str> = all.iter().map(|department| department.name()).collect();
    assert_eq!(names, ["Payroll", "Human Resources", "Accounting"]);
}

#[test]
fn blank_fields_fail_before_any_insert() {
    let conn = open_db_in_memory().unwrap();
    let mut repo = DepartmentRepository::new(&conn);
    repo.create_table().unwrap();

    let name_err = repo.create("   ", "Building A").unwrap_err();
    assert!(matches!(
        name_err,
        RepoError::Validation(DepartmentValidationError::BlankName)
    ));
    let location_err = repo.create("Payroll", "").unwrap_err();
    assert!(matches!(
        location_err,
        RepoError::Validation(DepartmentValidationError::BlankLocation)
    ));

    assert_eq!(department_count(&conn), 0);
    assert_eq!(repo.tracked_len(), 0);
}

#[test]
fn failed_setter_keeps_previous_value() {
    let conn = open_db_in_memory().unwrap();
    let mut repo = DepartmentRepository::new(&conn);
    repo.create_table().unwrap();
    let id = repo.create("Payroll", "Building A").unwrap().id().unwrap();

    let err = repo.set_location(id, " ").unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(DepartmentValidationError::BlankLocation)
    ));

    let department = repo.get(id).unwrap();
    assert_eq!(department.location(), "Building A");
    assert_eq!(department.id(), Some(id));
}

#[test]
fn setters_require_a_tracked_department() {
    let conn = open_db_in_memory().unwrap();
    let mut repo = DepartmentRepository::new(&conn);
    repo.create_table().unwrap();

    assert!(matches!(
        repo.set_name(9, "Payroll"),
        Err(RepoError::InvalidState(_))
    ));
    assert!(matches!(
        repo.set_location(9, "Building A"),
        Err(RepoError::InvalidState(_))
    ));
}

#[test]
fn in_memory_edits_keep_the_instance_registered_under_its_id() {
    let conn = open_db_in_memory().unwrap();
    let mut repo = DepartmentRepository::new(&conn);
    repo.create_table().unwrap();
    let id = repo.create("Payroll", "Building A").unwrap().id().unwrap();

    repo.set_name(id, "Payroll Ops").unwrap();
    repo.set_location(id, "Building B").unwrap();
    repo.update(repo.get(id).unwrap()).unwrap();

    let all = repo.get_all().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id(), Some(id));
    assert_eq!(all[0].name(), "Payroll Ops");
    assert_eq!(all[0].location(), "Building B");
}

#[test]
fn update_of_unsaved_department_fails_fast() {
    let conn = open_db_in_memory().unwrap();
    let repo = DepartmentRepository::new(&conn);
    repo.create_table().unwrap();

    let unsaved = deptmap_core::Department::new("Payroll", "Building A").unwrap();
    let err = repo.update(&unsaved).unwrap_err();
    assert!(matches!(err, RepoError::InvalidState(_)));
}

#[test]
fn update_after_out_of_band_delete_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let mut repo = DepartmentRepository::new(&conn);
    repo.create_table().unwrap();
    let id = repo.create("Payroll", "Building A").unwrap().id().unwrap();

    conn.execute("DELETE FROM departments;", []).unwrap();

    let err = repo.update(repo.get(id).unwrap()).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(missing) if missing == id));

    let err = repo.delete(id).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(missing) if missing == id));
    assert!(repo.is_tracked(id));
}

#[test]
fn delete_of_untracked_id_fails_fast() {
    let conn = open_db_in_memory().unwrap();
    let mut repo = DepartmentRepository::new(&conn);
    repo.create_table().unwrap();
    conn.execute(
        "INSERT INTO departments (name, location) VALUES ('Payroll', 'Building A');",
        [],
    )
    .unwrap();

    let err = repo.delete(1).unwrap_err();
    assert!(matches!(err, RepoError::InvalidState(_)));
    assert_eq!(department_count(&conn), 1);
}

#[test]
fn create_and_drop_table_are_idempotent() {
    let conn = open_db_in_memory().unwrap();
    let mut repo = DepartmentRepository::new(&conn);

    repo.create_table().unwrap();
    repo.create_table().unwrap();
    let id = repo.create("Payroll", "Building A").unwrap().id().unwrap();

    repo.drop_table().unwrap();
    repo.drop_table().unwrap();
    assert!(!repo.is_tracked(id));

    let err = repo.get_all().unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));
}
