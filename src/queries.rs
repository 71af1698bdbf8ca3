use crate::error::{QueryError, Result};
use crate::executor::{self, execute_insert, execute_update, query_map};
use crate::models::{COMPLETED_STATUS, NewTask, Status, StatusCount, Task, User};
use rusqlite::types::Value;
use rusqlite::{Connection, Row};

// ==================== Users ====================

pub fn insert_user(conn: &Connection, fullname: &str, email: &str) -> Result<i64> {
    execute_insert(
        conn,
        "INSERT INTO users (fullname, email) VALUES (?, ?)",
        (fullname, email),
    )
}

pub fn get_user(conn: &Connection, id: i64) -> Result<Option<User>> {
    let users = query_map(conn, "SELECT * FROM users WHERE id=?", [id], user_from_row)?;
    Ok(users.into_iter().next())
}

/// Users matching a `LIKE` pattern such as `%@example.com`
pub fn users_by_email(conn: &Connection, pattern: &str) -> Result<Vec<User>> {
    query_map(
        conn,
        "SELECT * FROM users WHERE email LIKE ?",
        [pattern],
        user_from_row,
    )
}

pub fn users_without_tasks(conn: &Connection) -> Result<Vec<User>> {
    query_map(
        conn,
        "SELECT * FROM users WHERE id NOT IN (SELECT user_id FROM tasks)",
        [],
        user_from_row,
    )
}

pub fn all_users(conn: &Connection) -> Result<Vec<User>> {
    query_map(conn, "SELECT * FROM users ORDER BY id", [], user_from_row)
}

pub fn rename_user(conn: &Connection, user_id: i64, fullname: &str) -> Result<usize> {
    execute_update(
        conn,
        "UPDATE users SET fullname=? WHERE id=?",
        (fullname, user_id),
    )
}

/// Removes the user; their tasks go with them
pub fn delete_user(conn: &Connection, user_id: i64) -> Result<usize> {
    execute_update(conn, "DELETE FROM users WHERE id=?", [user_id])
}

// ==================== Statuses ====================

pub fn insert_status(conn: &Connection, name: &str) -> Result<i64> {
    execute_insert(conn, "INSERT INTO status (name) VALUES (?)", [name])
}

pub fn status_id_by_name(conn: &Connection, name: &str) -> Result<Option<i64>> {
    let id = executor::query_scalar(conn, "SELECT id FROM status WHERE name=?", [name])?;
    match id {
        Some(Value::Integer(id)) => Ok(Some(id)),
        Some(other) => Err(QueryError::InvalidParam(format!(
            "status id for '{name}' is not an integer: {other:?}"
        ))),
        None => Ok(None),
    }
}

/// Like [`status_id_by_name`] but a missing status is an error
pub fn require_status_id(conn: &Connection, name: &str) -> Result<i64> {
    status_id_by_name(conn, name)?
        .ok_or_else(|| QueryError::StatusNotFound(name.to_string()))
}

pub fn list_statuses(conn: &Connection) -> Result<Vec<Status>> {
    query_map(conn, "SELECT * FROM status ORDER BY id", [], |row| {
        Ok(Status {
            id: row.get(0)?,
            name: row.get(1)?,
        })
    })
}

/// Removes the status; tasks that carried it keep existing with no status
pub fn delete_status(conn: &Connection, status_id: i64) -> Result<usize> {
    execute_update(conn, "DELETE FROM status WHERE id=?", [status_id])
}

// ==================== Tasks ====================

pub fn insert_task(conn: &Connection, task: &NewTask) -> Result<i64> {
    execute_insert(
        conn,
        "INSERT INTO tasks (title, description, status_id, user_id) VALUES (?, ?, ?, ?)",
        (
            &task.title,
            &task.description,
            task.status_id,
            task.user_id,
        ),
    )
}

pub fn get_task(conn: &Connection, id: i64) -> Result<Option<Task>> {
    let tasks = query_map(conn, "SELECT * FROM tasks WHERE id=?", [id], task_from_row)?;
    Ok(tasks.into_iter().next())
}

pub fn all_tasks(conn: &Connection) -> Result<Vec<Task>> {
    query_map(conn, "SELECT * FROM tasks ORDER BY id", [], task_from_row)
}

pub fn tasks_for_user(conn: &Connection, user_id: i64) -> Result<Vec<Task>> {
    query_map(
        conn,
        "SELECT * FROM tasks WHERE user_id=?",
        [user_id],
        task_from_row,
    )
}

pub fn tasks_by_status(conn: &Connection, status_id: i64) -> Result<Vec<Task>> {
    query_map(
        conn,
        "SELECT * FROM tasks WHERE status_id=?",
        [status_id],
        task_from_row,
    )
}

/// Tasks whose status is anything but `completed`. Tasks without a status
/// are not included.
pub fn tasks_not_completed(conn: &Connection) -> Result<Vec<Task>> {
    query_map(
        conn,
        "SELECT * FROM tasks
         WHERE status_id IN (SELECT id FROM status WHERE name != ?)",
        [COMPLETED_STATUS],
        task_from_row,
    )
}

/// Tasks owned by users whose email matches a `LIKE` pattern
pub fn tasks_for_email_domain(conn: &Connection, pattern: &str) -> Result<Vec<Task>> {
    query_map(
        conn,
        "SELECT t.* FROM tasks t
         JOIN users u ON t.user_id = u.id
         WHERE u.email LIKE ?",
        [pattern],
        task_from_row,
    )
}

pub fn set_task_status(conn: &Connection, task_id: i64, status_id: i64) -> Result<usize> {
    execute_update(
        conn,
        "UPDATE tasks SET status_id=? WHERE id=?",
        (status_id, task_id),
    )
}

pub fn delete_task(conn: &Connection, task_id: i64) -> Result<usize> {
    execute_update(conn, "DELETE FROM tasks WHERE id=?", [task_id])
}

/// Number of tasks per status; statuses with no tasks are left out
pub fn task_count_by_status(conn: &Connection) -> Result<Vec<StatusCount>> {
    query_map(
        conn,
        "SELECT s.name, COUNT(t.id) FROM tasks t
         JOIN status s ON t.status_id = s.id
         GROUP BY t.status_id",
        [],
        |row| {
            Ok(StatusCount {
                status: row.get(0)?,
                count: row.get(1)?,
            })
        },
    )
}

// ==================== Row Parsers ====================

fn user_from_row(row: &Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        fullname: row.get(1)?,
        email: row.get(2)?,
    })
}

fn task_from_row(row: &Row) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        status_id: row.get(3)?,
        user_id: row.get(4)?,
    })
}
