//! The sample session: a fixed sequence of reads and writes that exercises
//! every query. It runs inside a transaction that is never committed, so
//! the database is left exactly as it was found.

use crate::db::Session;
use crate::error::Result;
use crate::models::{NewTask, StatusCount, Task, User};
use crate::queries;
use rusqlite::Connection;
use serde::Serialize;
use tracing::info;

/// Inputs of the sample session
#[derive(Debug, Clone)]
pub struct DemoParams {
    pub user_id: i64,
    pub task_id: i64,
    pub email_pattern: String,
    pub new_fullname: String,
}

impl Default for DemoParams {
    fn default() -> Self {
        DemoParams {
            user_id: 1,
            task_id: 1,
            email_pattern: "%@example.com".to_string(),
            new_fullname: "Updated Name".to_string(),
        }
    }
}

/// Everything the sample session read or wrote, in the order it happened
#[derive(Debug, Clone, Serialize)]
pub struct DemoReport {
    pub tasks_for_user: Vec<Task>,
    pub tasks_with_status_new: Vec<Task>,
    pub status_updated: usize,
    pub users_without_tasks: Vec<User>,
    pub inserted_task_id: i64,
    pub tasks_not_completed: Vec<Task>,
    pub tasks_deleted: usize,
    pub users_with_email: Vec<User>,
    pub users_renamed: usize,
    pub task_count_by_status: Vec<StatusCount>,
    pub tasks_for_email_domain: Vec<Task>,
}

/// Run the sample session and roll all of its writes back
pub fn run(session: &mut Session, params: &DemoParams) -> Result<DemoReport> {
    let tx = session.transaction()?;
    let report = run_on(&tx, params)?;
    // tx drops here without commit
    info!("sample session finished, rolling back");
    Ok(report)
}

/// The sample session's steps on an arbitrary connection
pub fn run_on(conn: &Connection, params: &DemoParams) -> Result<DemoReport> {
    let tasks_for_user = queries::tasks_for_user(conn, params.user_id)?;

    let new_status = queries::require_status_id(conn, "new")?;
    let tasks_with_status_new = queries::tasks_by_status(conn, new_status)?;

    let in_progress = queries::require_status_id(conn, "in progress")?;
    let status_updated = queries::set_task_status(conn, params.task_id, in_progress)?;

    let users_without_tasks = queries::users_without_tasks(conn)?;

    let new_task = NewTask::new("New Task Title", params.user_id)
        .with_description("Task Description")
        .with_status(in_progress);
    let inserted_task_id = queries::insert_task(conn, &new_task)?;

    let tasks_not_completed = queries::tasks_not_completed(conn)?;

    let tasks_deleted = queries::delete_task(conn, params.task_id)?;

    let users_with_email = queries::users_by_email(conn, &params.email_pattern)?;

    let users_renamed = queries::rename_user(conn, params.user_id, &params.new_fullname)?;

    let task_count_by_status = queries::task_count_by_status(conn)?;

    let tasks_for_email_domain = queries::tasks_for_email_domain(conn, &params.email_pattern)?;

    Ok(DemoReport {
        tasks_for_user,
        tasks_with_status_new,
        status_updated,
        users_without_tasks,
        inserted_task_id,
        tasks_not_completed,
        tasks_deleted,
        users_with_email,
        users_renamed,
        task_count_by_status,
        tasks_for_email_domain,
    })
}
