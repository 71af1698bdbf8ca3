use thiserror::Error;

/// All possible errors in the query layer
#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Failed to create table `{table}`: {source}")]
    Schema {
        table: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("{entity} #{id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("Status '{0}' not found")]
    StatusNotFound(String),

    #[error("Invalid parameter: {0}")]
    InvalidParam(String),

    #[error("Database not initialized. Run `taskq init` first.")]
    NotInitialized,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl QueryError {
    pub fn user_not_found(id: i64) -> Self {
        QueryError::NotFound { entity: "User", id }
    }

    pub fn task_not_found(id: i64) -> Self {
        QueryError::NotFound { entity: "Task", id }
    }

    pub fn status_not_found(id: i64) -> Self {
        QueryError::NotFound {
            entity: "Status",
            id,
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, QueryError>;
