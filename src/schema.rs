//! Table definitions and idempotent schema setup.

use crate::error::{QueryError, Result};
use crate::models::DEFAULT_STATUSES;
use rusqlite::Connection;
use tracing::{debug, info, warn};

pub const CREATE_USERS: &str = "CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    fullname VARCHAR(100),
    email VARCHAR(100) UNIQUE
)";

pub const CREATE_STATUS: &str = "CREATE TABLE IF NOT EXISTS status (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name VARCHAR(50) UNIQUE
)";

pub const CREATE_TASKS: &str = "CREATE TABLE IF NOT EXISTS tasks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title VARCHAR(100),
    description TEXT,
    status_id INTEGER,
    user_id INTEGER,
    FOREIGN KEY (status_id) REFERENCES status (id) ON DELETE SET NULL ON UPDATE CASCADE,
    FOREIGN KEY (user_id) REFERENCES users (id) ON DELETE CASCADE ON UPDATE CASCADE
)";

/// Tables in creation order; `tasks` references the other two
pub const TABLES: [(&str, &str); 3] = [
    ("users", CREATE_USERS),
    ("status", CREATE_STATUS),
    ("tasks", CREATE_TASKS),
];

/// A table whose definition the engine refused
#[derive(Debug)]
pub struct TableFailure {
    pub table: String,
    pub error: rusqlite::Error,
}

/// Outcome of a schema run: which tables are in place and which failed
#[derive(Debug, Default)]
pub struct SchemaReport {
    pub ready: Vec<String>,
    pub failures: Vec<TableFailure>,
}

impl SchemaReport {
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }

    /// Turn the first failure, if any, into an error
    pub fn into_result(self) -> Result<Vec<String>> {
        match self.failures.into_iter().next() {
            Some(failure) => Err(QueryError::Schema {
                table: failure.table,
                source: failure.error,
            }),
            None => Ok(self.ready),
        }
    }
}

/// Create the users, status and tasks tables if they are missing
pub fn init(conn: &Connection) -> SchemaReport {
    let report = apply(conn, &TABLES);
    info!(
        ready = report.ready.len(),
        failed = report.failures.len(),
        "schema initialized"
    );
    report
}

/// Run each table statement on its own. A failure is recorded and the
/// remaining statements still run.
pub fn apply(conn: &Connection, statements: &[(&str, &str)]) -> SchemaReport {
    let mut report = SchemaReport::default();

    for (table, sql) in statements {
        debug!(table, "creating table");
        match conn.execute_batch(sql) {
            Ok(()) => report.ready.push(table.to_string()),
            Err(error) => {
                warn!(table, %error, "table creation failed");
                report.failures.push(TableFailure {
                    table: table.to_string(),
                    error,
                });
            }
        }
    }

    report
}

/// Insert the reference statuses that are not there yet
pub fn seed_statuses(conn: &Connection) -> Result<usize> {
    let mut stmt = conn.prepare("INSERT OR IGNORE INTO status (name) VALUES (?1)")?;
    let mut inserted = 0;
    for name in DEFAULT_STATUSES {
        inserted += stmt.execute([name])?;
    }
    debug!(inserted, "seeded statuses");
    Ok(inserted)
}

/// Names of the user tables present, sorted
pub fn table_names(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT name FROM sqlite_master
         WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
         ORDER BY name",
    )?;
    let names = stmt.query_map([], |row| row.get(0))?;
    names
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| e.into())
}

/// Check if all three tables exist
pub fn is_initialized(conn: &Connection) -> Result<bool> {
    let present = table_names(conn)?;
    Ok(TABLES
        .iter()
        .all(|(table, _)| present.iter().any(|name| name == table)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Session;

    fn schema_sql(conn: &Connection) -> Vec<String> {
        let mut stmt = conn
            .prepare("SELECT sql FROM sqlite_master WHERE type = 'table' ORDER BY name")
            .unwrap();
        let rows = stmt.query_map([], |row| row.get(0)).unwrap();
        rows.collect::<std::result::Result<Vec<_>, _>>().unwrap()
    }

    #[test]
    fn test_init_creates_tables() {
        let session = Session::open_in_memory().unwrap();
        let report = init(&session);

        assert!(report.is_ok());
        assert_eq!(report.ready, vec!["users", "status", "tasks"]);
        let names = table_names(&session).unwrap();
        assert_eq!(names, vec!["status", "tasks", "users"]);
        assert!(is_initialized(&session).unwrap());
    }

    #[test]
    fn test_init_is_idempotent() {
        let session = Session::open_in_memory().unwrap();
        init(&session).into_result().unwrap();
        let before = schema_sql(&session);

        let report = init(&session);
        assert!(report.is_ok());
        assert_eq!(schema_sql(&session), before);
    }

    #[test]
    fn test_failed_statement_does_not_stop_the_rest() {
        let session = Session::open_in_memory().unwrap();
        let statements = [
            ("users", CREATE_USERS),
            ("broken", "CREATE TABLE broken ("),
            ("status", CREATE_STATUS),
        ];

        let report = apply(&session, &statements);
        assert!(!report.is_ok());
        assert_eq!(report.ready, vec!["users", "status"]);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].table, "broken");
        assert!(!table_names(&session).unwrap().contains(&"broken".to_string()));

        match report.into_result() {
            Err(QueryError::Schema { table, .. }) => assert_eq!(table, "broken"),
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn test_not_initialized_on_empty_database() {
        let session = Session::open_in_memory().unwrap();
        assert!(!is_initialized(&session).unwrap());
    }

    #[test]
    fn test_seed_statuses_is_idempotent() {
        let session = Session::open_in_memory().unwrap();
        init(&session).into_result().unwrap();

        assert_eq!(seed_statuses(&session).unwrap(), 3);
        assert_eq!(seed_statuses(&session).unwrap(), 0);

        let count: i64 = session
            .query_row("SELECT COUNT(*) FROM status", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 3);
    }
}
