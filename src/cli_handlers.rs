use crate::cli::{StatusCommand, TaskCommand, UserCommand};
use crate::config::Config;
use crate::db::Session;
use crate::demo::{self, DemoParams};
use crate::error::{QueryError, Result};
use crate::executor;
use crate::models::{NewTask, Row, Task, User};
use crate::queries;
use crate::schema;
use rusqlite::types::Value;
use serde::Serialize;
use serde_json::json;
use std::collections::HashMap;

/// Handle the init command
pub fn handle_init(config: &Config, no_seed: bool) -> Result<()> {
    let session = Session::open(config.db_path())?;

    let report = schema::init(&session);
    // The first failure becomes the returned error; report the others here.
    for failure in report.failures.iter().skip(1) {
        eprintln!("Failed to create {}: {}", failure.table, failure.error);
    }
    let tables = report.into_result()?;

    let seeded = if no_seed {
        0
    } else {
        schema::seed_statuses(&session)?
    };

    if config.is_json() {
        return print_json(&json!({
            "database": config.db_path().display().to_string(),
            "tables": tables,
            "statuses_seeded": seeded,
        }));
    }

    println!("Initialized database at {}", config.db_path().display());
    println!("  - Tables: {}", tables.join(", "));
    if !no_seed {
        println!("  - Seeded {seeded} status(es)");
    }

    Ok(())
}

/// Handle the user subcommands
pub fn handle_user(config: &Config, command: UserCommand) -> Result<()> {
    let session = open_initialized(config)?;

    match command {
        UserCommand::Add { fullname, email } => {
            let id = queries::insert_user(&session, &fullname, &email)?;
            if config.is_json() {
                return print_json(&json!({ "id": id }));
            }
            println!("Created user #{id}: {fullname} <{email}>");
        }
        UserCommand::Rename { id, fullname } => {
            if queries::rename_user(&session, id, &fullname)? == 0 {
                return Err(QueryError::user_not_found(id));
            }
            if config.is_json() {
                return print_json(&json!({ "id": id, "fullname": fullname }));
            }
            println!("Renamed user #{id} to {fullname}");
        }
        UserCommand::Delete { id } => {
            let tasks = queries::tasks_for_user(&session, id)?.len();
            if queries::delete_user(&session, id)? == 0 {
                return Err(QueryError::user_not_found(id));
            }
            if config.is_json() {
                return print_json(&json!({ "id": id, "tasks_deleted": tasks }));
            }
            println!("Deleted user #{id} and {tasks} task(s)");
        }
        UserCommand::List {
            email,
            without_tasks,
        } => {
            let users = match (email, without_tasks) {
                (Some(pattern), _) => queries::users_by_email(&session, &pattern)?,
                (None, true) => queries::users_without_tasks(&session)?,
                (None, false) => queries::all_users(&session)?,
            };
            if config.is_json() {
                return print_json(&users);
            }
            print_users(&users);
        }
    }

    Ok(())
}

/// Handle the status subcommands
pub fn handle_status(config: &Config, command: StatusCommand) -> Result<()> {
    let session = open_initialized(config)?;

    match command {
        StatusCommand::Add { name } => {
            let id = queries::insert_status(&session, &name)?;
            if config.is_json() {
                return print_json(&json!({ "id": id }));
            }
            println!("Created status #{id}: {name}");
        }
        StatusCommand::Delete { id } => {
            let orphaned = queries::tasks_by_status(&session, id)?.len();
            if queries::delete_status(&session, id)? == 0 {
                return Err(QueryError::status_not_found(id));
            }
            if config.is_json() {
                return print_json(&json!({ "id": id, "tasks_cleared": orphaned }));
            }
            println!("Deleted status #{id}; {orphaned} task(s) now have no status");
        }
        StatusCommand::List => {
            let statuses = queries::list_statuses(&session)?;
            if config.is_json() {
                return print_json(&statuses);
            }
            if statuses.is_empty() {
                println!("No statuses found.");
            }
            for status in &statuses {
                println!(
                    "#{} {}",
                    status.id,
                    status.name.as_deref().unwrap_or("-")
                );
            }
        }
    }

    Ok(())
}

/// Handle the task subcommands
pub fn handle_task(config: &Config, command: TaskCommand) -> Result<()> {
    let session = open_initialized(config)?;

    match command {
        TaskCommand::Add {
            title,
            user,
            desc,
            status,
        } => {
            if queries::get_user(&session, user)?.is_none() {
                return Err(QueryError::user_not_found(user));
            }
            let mut new_task = NewTask::new(&title, user);
            if let Some(desc) = desc {
                new_task = new_task.with_description(desc);
            }
            if let Some(name) = status {
                let status_id = queries::require_status_id(&session, &name)?;
                new_task = new_task.with_status(status_id);
            }
            let id = queries::insert_task(&session, &new_task)?;
            if config.is_json() {
                return print_json(&json!({ "id": id }));
            }
            println!("Created task #{id}: {title}");
        }
        TaskCommand::Show { id } => {
            let task = queries::get_task(&session, id)?
                .ok_or(QueryError::task_not_found(id))?;
            if config.is_json() {
                return print_json(&task);
            }
            let names = status_names(&session)?;
            println!(
                "[#{}] {}",
                task.id,
                task.title.as_deref().unwrap_or("-")
            );
            println!("Status:       {}", status_label(&names, task.status_id));
            println!(
                "Owner:        {}",
                task.user_id
                    .map_or("-".to_string(), |id| format!("#{id}"))
            );
            if let Some(ref desc) = task.description {
                println!("Description:  {desc}");
            }
        }
        TaskCommand::SetStatus { id, status } => {
            let status_id = queries::require_status_id(&session, &status)?;
            if queries::set_task_status(&session, id, status_id)? == 0 {
                return Err(QueryError::task_not_found(id));
            }
            if config.is_json() {
                return print_json(&json!({ "id": id, "status_id": status_id }));
            }
            println!("Task #{id} is now '{status}'");
        }
        TaskCommand::Delete { id } => {
            if queries::delete_task(&session, id)? == 0 {
                return Err(QueryError::task_not_found(id));
            }
            if config.is_json() {
                return print_json(&json!({ "id": id }));
            }
            println!("Deleted task #{id}");
        }
        TaskCommand::List {
            user,
            status,
            not_completed,
            email_domain,
        } => {
            let tasks = if let Some(user_id) = user {
                queries::tasks_for_user(&session, user_id)?
            } else if let Some(name) = status {
                let status_id = queries::require_status_id(&session, &name)?;
                queries::tasks_by_status(&session, status_id)?
            } else if not_completed {
                queries::tasks_not_completed(&session)?
            } else if let Some(pattern) = email_domain {
                queries::tasks_for_email_domain(&session, &pattern)?
            } else {
                queries::all_tasks(&session)?
            };
            if config.is_json() {
                return print_json(&tasks);
            }
            let names = status_names(&session)?;
            print_tasks(&tasks, &names);
        }
    }

    Ok(())
}

/// Handle the stats command
pub fn handle_stats(config: &Config) -> Result<()> {
    let session = open_initialized(config)?;
    let counts = queries::task_count_by_status(&session)?;

    if config.is_json() {
        return print_json(&counts);
    }

    if counts.is_empty() {
        println!("No tasks with a status.");
    }
    for entry in &counts {
        println!(
            "{:<14} {}",
            entry.status.as_deref().unwrap_or("-"),
            entry.count
        );
    }

    Ok(())
}

/// Handle the query command
pub fn handle_query(config: &Config, sql: &str, params: &[String]) -> Result<()> {
    let session = Session::open(config.db_path())?;
    let values: Vec<Value> = params.iter().map(|p| parse_param(p)).collect();

    let rows = executor::execute_values(&session, sql, &values)?;

    if config.is_json() {
        let rows: Vec<Vec<serde_json::Value>> = rows
            .iter()
            .map(|row| row.iter().map(value_to_json).collect())
            .collect();
        return print_json(&rows);
    }

    for row in &rows {
        println!("{}", format_row(row));
    }
    if rows.is_empty() {
        println!("(no rows, {} change(s))", session.changes());
    }

    Ok(())
}

/// Handle the demo command
pub fn handle_demo(config: &Config, params: DemoParams) -> Result<()> {
    let mut session = open_initialized(config)?;
    let report = demo::run(&mut session, &params)?;

    if config.is_json() {
        return print_json(&report);
    }

    println!(
        "Tasks for user {}: {}",
        params.user_id,
        task_ids(&report.tasks_for_user)
    );
    println!(
        "Tasks with status 'new': {}",
        task_ids(&report.tasks_with_status_new)
    );
    println!(
        "Moved task #{} to 'in progress': {} row(s)",
        params.task_id, report.status_updated
    );
    println!(
        "Users without tasks: {}",
        user_ids(&report.users_without_tasks)
    );
    println!("Inserted task #{}", report.inserted_task_id);
    println!(
        "Tasks not completed: {}",
        task_ids(&report.tasks_not_completed)
    );
    println!(
        "Deleted task #{}: {} row(s)",
        params.task_id, report.tasks_deleted
    );
    println!(
        "Users with specific email: {}",
        user_ids(&report.users_with_email)
    );
    println!(
        "Renamed user {}: {} row(s)",
        params.user_id, report.users_renamed
    );
    let counts = report
        .task_count_by_status
        .iter()
        .map(|c| {
            format!("{}={}", c.status.as_deref().unwrap_or("-"), c.count)
        })
        .collect::<Vec<_>>()
        .join(", ");
    println!("Task count by status: [{counts}]");
    println!(
        "Tasks for specific email domain: {}",
        task_ids(&report.tasks_for_email_domain)
    );
    println!("All changes rolled back.");

    Ok(())
}

// Helper functions

fn open_initialized(config: &Config) -> Result<Session> {
    let session = Session::open(config.db_path())?;
    if !schema::is_initialized(&session)? {
        return Err(QueryError::NotInitialized);
    }
    Ok(session)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn status_names(session: &Session) -> Result<HashMap<i64, String>> {
    Ok(queries::list_statuses(session)?
        .into_iter()
        .filter_map(|s| s.name.map(|name| (s.id, name)))
        .collect())
}

fn status_label(names: &HashMap<i64, String>, status_id: Option<i64>) -> String {
    match status_id {
        Some(id) => names
            .get(&id)
            .cloned()
            .unwrap_or_else(|| format!("#{id}")),
        None => "(none)".to_string(),
    }
}

fn print_tasks(tasks: &[Task], names: &HashMap<i64, String>) {
    if tasks.is_empty() {
        println!("No tasks found.");
        return;
    }
    for task in tasks {
        println!(
            "#{:<4} {:<12} {}{}",
            task.id,
            status_label(names, task.status_id),
            task.title.as_deref().unwrap_or("-"),
            task.user_id
                .map_or(String::new(), |id| format!(" (user #{id})"))
        );
    }
}

fn print_users(users: &[User]) {
    if users.is_empty() {
        println!("No users found.");
        return;
    }
    for user in users {
        println!(
            "#{:<4} {} <{}>",
            user.id,
            user.fullname.as_deref().unwrap_or("-"),
            user.email.as_deref().unwrap_or("-")
        );
    }
}

fn task_ids(tasks: &[Task]) -> String {
    let ids = tasks
        .iter()
        .map(|t| format!("#{}", t.id))
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{ids}]")
}

fn user_ids(users: &[User]) -> String {
    let ids = users
        .iter()
        .map(|u| format!("#{}", u.id))
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{ids}]")
}

/// Integer, then real, then `null`; anything else binds as text
pub fn parse_param(raw: &str) -> Value {
    if raw.eq_ignore_ascii_case("null") {
        return Value::Null;
    }
    if let Ok(i) = raw.parse::<i64>() {
        return Value::Integer(i);
    }
    if let Ok(f) = raw.parse::<f64>() {
        if f.is_finite() {
            return Value::Real(f);
        }
    }
    Value::Text(raw.to_string())
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Integer(i) => i.to_string(),
        Value::Real(f) => f.to_string(),
        Value::Text(s) => format!("'{s}'"),
        Value::Blob(b) => format!("<{} bytes>", b.len()),
    }
}

/// Render a row as a tuple, e.g. `(1, 'Ada', NULL)`
pub fn format_row(row: &Row) -> String {
    let cols = row.iter().map(format_value).collect::<Vec<_>>().join(", ");
    format!("({cols})")
}

fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Integer(i) => json!(i),
        Value::Real(f) => json!(f),
        Value::Text(s) => json!(s),
        Value::Blob(b) => json!(b),
    }
}
