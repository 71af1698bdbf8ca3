pub mod cli;
pub mod cli_handlers;
pub mod config;
pub mod db;
pub mod demo;
pub mod error;
pub mod executor;
pub mod models;
pub mod queries;
pub mod schema;

pub use db::Session;
pub use error::{QueryError, Result};
pub use models::*;
