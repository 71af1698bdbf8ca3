use crate::config::{Config, DEFAULT_DB_PATH};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "taskq")]
#[command(about = "Users, statuses and tasks on SQLite")]
#[command(version)]
pub struct Cli {
    /// Path to the database file
    #[arg(long, global = true, env = "TASKQ_DB", default_value = DEFAULT_DB_PATH)]
    pub db: PathBuf,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn config(&self) -> Config {
        Config::new(&self.db, self.json)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the tables if they do not exist
    Init {
        /// Do not insert the default statuses
        #[arg(long)]
        no_seed: bool,
    },

    /// Manage users
    #[command(subcommand)]
    User(UserCommand),

    /// Manage statuses
    #[command(subcommand)]
    Status(StatusCommand),

    /// Manage tasks
    #[command(subcommand)]
    Task(TaskCommand),

    /// Count tasks per status
    Stats,

    /// Run a raw SQL statement with positional parameters
    Query {
        /// SQL statement using `?` placeholders
        sql: String,
        /// Values for the placeholders (integer, real, `null` or text)
        #[arg(allow_hyphen_values = true)]
        params: Vec<String>,
    },

    /// Run the sample session and roll it back
    Demo {
        /// User the sample session works with
        #[arg(long, default_value_t = 1)]
        user: i64,
        /// Task the sample session updates and deletes
        #[arg(long, default_value_t = 1)]
        task: i64,
        /// Email LIKE pattern
        #[arg(long, default_value = "%@example.com")]
        email: String,
    },
}

#[derive(Subcommand)]
pub enum UserCommand {
    /// Add a user
    Add {
        /// Full name
        fullname: String,
        /// Email address (unique)
        email: String,
    },

    /// Change a user's full name
    Rename {
        /// User ID
        id: i64,
        /// New full name
        fullname: String,
    },

    /// Delete a user and all of their tasks
    Delete {
        /// User ID
        id: i64,
    },

    /// List users
    List {
        /// Only users whose email matches this LIKE pattern
        #[arg(long)]
        email: Option<String>,
        /// Only users without any task
        #[arg(long, conflicts_with = "email")]
        without_tasks: bool,
    },
}

#[derive(Subcommand)]
pub enum StatusCommand {
    /// Add a status
    Add {
        /// Status name (unique)
        name: String,
    },

    /// Delete a status; its tasks lose their status
    Delete {
        /// Status ID
        id: i64,
    },

    /// List statuses
    List,
}

#[derive(Subcommand)]
pub enum TaskCommand {
    /// Add a task
    Add {
        /// Task title
        title: String,
        /// Owner user ID
        #[arg(long)]
        user: i64,
        /// Optional description
        #[arg(long)]
        desc: Option<String>,
        /// Status name
        #[arg(long)]
        status: Option<String>,
    },

    /// Show a task
    Show {
        /// Task ID
        id: i64,
    },

    /// Change a task's status
    SetStatus {
        /// Task ID
        id: i64,
        /// Status name
        status: String,
    },

    /// Delete a task
    Delete {
        /// Task ID
        id: i64,
    },

    /// List tasks
    List {
        /// Only tasks of this user
        #[arg(long, group = "filter")]
        user: Option<i64>,
        /// Only tasks with this status name
        #[arg(long, group = "filter")]
        status: Option<String>,
        /// Only tasks whose status is not `completed`
        #[arg(long, group = "filter")]
        not_completed: bool,
        /// Only tasks of users whose email matches this LIKE pattern
        #[arg(long, group = "filter")]
        email_domain: Option<String>,
    },
}
