use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn taskq(db: &Path) -> Command {
    let mut cmd = Command::cargo_bin("taskq").unwrap();
    cmd.env_remove("TASKQ_DB");
    cmd.arg("--db").arg(db);
    cmd
}

fn setup() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let db = temp_dir.path().join("tasks.db");
    taskq(&db).arg("init").assert().success();
    (temp_dir, db)
}

#[test]
fn test_init_is_idempotent() {
    let temp_dir = TempDir::new().unwrap();
    let db = temp_dir.path().join("tasks.db");

    taskq(&db)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("users, status, tasks"))
        .stdout(predicate::str::contains("Seeded 3 status(es)"));

    taskq(&db)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Seeded 0 status(es)"));

    assert!(db.exists());
}

#[test]
fn test_commands_require_init() {
    let temp_dir = TempDir::new().unwrap();
    let db = temp_dir.path().join("empty.db");

    taskq(&db)
        .args(["task", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not initialized"));
}

#[test]
fn test_task_workflow() {
    let (_temp, db) = setup();

    taskq(&db)
        .args(["user", "add", "Ada Lovelace", "ada@example.com"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created user #1"));

    taskq(&db)
        .args(["task", "add", "Write notes", "--user", "1", "--status", "new"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created task #1"));

    taskq(&db)
        .args(["task", "list", "--status", "new"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Write notes"));

    taskq(&db)
        .args(["task", "set-status", "1", "completed"])
        .assert()
        .success();

    taskq(&db)
        .args(["task", "list", "--not-completed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No tasks found."));

    taskq(&db)
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("completed"));
}

#[test]
fn test_unknown_status_is_an_error() {
    let (_temp, db) = setup();

    taskq(&db)
        .args(["user", "add", "Ada", "ada@example.com"])
        .assert()
        .success();

    taskq(&db)
        .args(["task", "add", "Write", "--user", "1", "--status", "archived"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Status 'archived' not found"));
}

#[test]
fn test_deleting_user_removes_tasks() {
    let (_temp, db) = setup();

    taskq(&db)
        .args(["user", "add", "Ada", "ada@example.com"])
        .assert()
        .success();
    taskq(&db)
        .args(["task", "add", "One", "--user", "1"])
        .assert()
        .success();
    taskq(&db)
        .args(["task", "add", "Two", "--user", "1"])
        .assert()
        .success();

    taskq(&db)
        .args(["user", "delete", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 task(s)"));

    taskq(&db)
        .args(["--json", "task", "list"])
        .assert()
        .success()
        .stdout(predicate::str::diff("[]\n"));
}

#[test]
fn test_missing_task_fails() {
    let (_temp, db) = setup();

    taskq(&db)
        .args(["task", "delete", "9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Task #9 not found"));
}

#[test]
fn test_raw_query() {
    let (_temp, db) = setup();

    taskq(&db)
        .args([
            "query",
            "INSERT INTO users (fullname, email) VALUES (?, ?)",
            "Grace",
            "grace@example.com",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 change(s)"));

    taskq(&db)
        .args(["query", "SELECT * FROM users WHERE email LIKE ?", "%@example.com"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(1, 'Grace', 'grace@example.com')"));

    taskq(&db)
        .args(["query", "SELECT * FROM nowhere"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no such table"));
}

#[test]
fn test_query_rejects_several_statements() {
    let (_temp, db) = setup();

    taskq(&db)
        .args([
            "query",
            "INSERT INTO status (name) VALUES ('a'); INSERT INTO status (name) VALUES ('b')",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("single SQL statement"));

    taskq(&db)
        .args(["status", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#4").not());
}

#[test]
fn test_init_reports_each_failed_table_once() {
    let temp_dir = TempDir::new().unwrap();
    let db = temp_dir.path().join("clash.db");
    // Indexes named like the tables make their CREATE TABLE fail
    let conn = rusqlite::Connection::open(&db).unwrap();
    conn.execute_batch(
        "CREATE TABLE x (a);
         CREATE INDEX users ON x (a);
         CREATE INDEX status ON x (a);",
    )
    .unwrap();
    drop(conn);

    taskq(&db)
        .env_remove("RUST_LOG")
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("index named status"))
        .stderr(predicate::function(|stderr: &str| {
            stderr.matches("index named users").count() == 1
        }));
}

#[test]
fn test_demo_rolls_back() {
    let (_temp, db) = setup();

    taskq(&db)
        .args(["user", "add", "Ada", "ada@example.com"])
        .assert()
        .success();
    taskq(&db)
        .args(["task", "add", "Existing", "--user", "1", "--status", "new"])
        .assert()
        .success();

    taskq(&db)
        .arg("demo")
        .assert()
        .success()
        .stdout(predicate::str::contains("Inserted task #2"))
        .stdout(predicate::str::contains("All changes rolled back."));

    taskq(&db)
        .args(["task", "show", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Existing"))
        .stdout(predicate::str::contains("Status:       new"));

    taskq(&db)
        .args(["user", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ada <ada@example.com>"));
}
