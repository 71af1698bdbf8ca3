//! Runtime settings resolved from the command line.

use std::path::{Path, PathBuf};

/// Database file used when neither `--db` nor `TASKQ_DB` is given
pub const DEFAULT_DB_PATH: &str = "./task_management.db";

/// How results are written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Settings shared by every command
#[derive(Debug, Clone)]
pub struct Config {
    db_path: PathBuf,
    pub output: OutputFormat,
}

impl Config {
    pub fn new<P: AsRef<Path>>(db_path: P, json: bool) -> Self {
        Config {
            db_path: db_path.as_ref().to_path_buf(),
            output: if json {
                OutputFormat::Json
            } else {
                OutputFormat::Text
            },
        }
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    pub fn is_json(&self) -> bool {
        self.output == OutputFormat::Json
    }
}
