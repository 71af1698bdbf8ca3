use rusqlite::types::Value;
use serde::Serialize;

/// Status names every fresh database is seeded with
pub const DEFAULT_STATUSES: [&str; 3] = ["new", "in progress", "completed"];

/// Name of the status that marks a task as finished
pub const COMPLETED_STATUS: &str = "completed";

/// One result row from the untyped executor, columns in select order
pub type Row = Vec<Value>;

/// A user who owns tasks
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: i64,
    pub fullname: Option<String>,
    pub email: Option<String>,
}

/// A row of the status reference table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Status {
    pub id: i64,
    pub name: Option<String>,
}

/// A task in the system
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    pub id: i64,
    pub title: Option<String>,
    pub description: Option<String>,
    pub status_id: Option<i64>,
    pub user_id: Option<i64>,
}

/// New task input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub status_id: Option<i64>,
    pub user_id: i64,
}

impl NewTask {
    pub fn new(title: impl Into<String>, user_id: i64) -> Self {
        NewTask {
            title: title.into(),
            user_id,
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_status(mut self, status_id: i64) -> Self {
        self.status_id = Some(status_id);
        self
    }
}

/// Number of tasks carrying a given status
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: Option<String>,
    pub count: i64,
}
