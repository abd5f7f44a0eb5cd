use deptmap_core::db::{open_db, open_db_in_memory};
use deptmap_core::DepartmentRepository;
use rusqlite::Connection;

fn foreign_keys_enabled(conn: &Connection) -> bool {
    conn.query_row("PRAGMA foreign_keys;", [], |row| row.get::<_, i64>(0))
        .unwrap()
        == 1
}

#[test]
fn open_db_in_memory_enables_foreign_keys() {
    let conn = open_db_in_memory().unwrap();
    assert!(foreign_keys_enabled(&conn));
}

#[test]
fn departments_survive_reopening_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("departments.sqlite3");

    let id = {
        let conn = open_db(&path).unwrap();
        assert!(foreign_keys_enabled(&conn));
        let mut repo = DepartmentRepository::new(&conn);
        repo.create_table().unwrap();
        let created = repo.create("Engineering", "Building A").unwrap();
        created.id().unwrap()
    };

    let conn = open_db(&path).unwrap();
    let mut repo = DepartmentRepository::new(&conn);
    repo.create_table().unwrap();
    assert!(!repo.is_tracked(id));

    let found = repo.find_by_id(id).unwrap().unwrap();
    assert_eq!(found.name(), "Engineering");
    assert_eq!(found.location(), "Building A");
}

#[test]
fn open_db_reports_unopenable_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("nested.sqlite3");

    assert!(open_db(&path).is_err());
}
