//! Statement execution with positional parameters.
//!
//! Statements run on whatever connection they are given. On a plain
//! [`Session`](crate::db::Session) SQLite is in autocommit mode, so every call
//! commits as soon as it returns. Inside a transaction the statement joins it
//! and is committed or rolled back with the rest.
//!
//! Failures are logged and returned. An empty `Vec` always means the
//! statement succeeded and produced no rows.

use crate::error::{QueryError, Result};
use crate::models::Row;
use rusqlite::types::Value;
use rusqlite::fallible_iterator::FallibleIterator;
use rusqlite::{Batch, Connection, Params, Statement};
use tracing::{debug, warn};

/// Run a statement and return every result row as a tuple of values.
/// Statements that return nothing yield an empty `Vec`.
pub fn execute<P: Params>(conn: &Connection, sql: &str, params: P) -> Result<Vec<Row>> {
    query_map(conn, sql, params, |row| {
        let width = row.as_ref().column_count();
        (0..width).map(|i| row.get::<_, Value>(i)).collect()
    })
}

/// Same as [`execute`] with a parameter list built at runtime
pub fn execute_values(conn: &Connection, sql: &str, params: &[Value]) -> Result<Vec<Row>> {
    execute(conn, sql, rusqlite::params_from_iter(params.iter()))
}

/// First column of the first row, if there is one
pub fn query_scalar<P: Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> Result<Option<Value>> {
    let rows = execute(conn, sql, params)?;
    Ok(rows.into_iter().next().and_then(|row| row.into_iter().next()))
}

/// Run a statement and map each result row with `f`
pub fn query_map<T, P, F>(conn: &Connection, sql: &str, params: P, f: F) -> Result<Vec<T>>
where
    P: Params,
    F: FnMut(&rusqlite::Row<'_>) -> rusqlite::Result<T>,
{
    debug!(sql, "executing query");
    collect_rows(conn, sql, params, f).inspect_err(|error| {
        warn!(sql, %error, "query failed");
    })
}

/// Run a data-changing statement and return how many rows it touched
pub fn execute_update<P: Params>(conn: &Connection, sql: &str, params: P) -> Result<usize> {
    debug!(sql, "executing statement");
    single_statement(conn, sql)
        .and_then(|mut stmt| Ok(stmt.execute(params)?))
        .inspect_err(|error| {
            warn!(sql, %error, "statement failed");
        })
}

/// Run an `INSERT` and return the rowid it assigned
pub fn execute_insert<P: Params>(conn: &Connection, sql: &str, params: P) -> Result<i64> {
    execute_update(conn, sql, params)?;
    Ok(conn.last_insert_rowid())
}

fn collect_rows<T, P, F>(conn: &Connection, sql: &str, params: P, mut f: F) -> Result<Vec<T>>
where
    P: Params,
    F: FnMut(&rusqlite::Row<'_>) -> rusqlite::Result<T>,
{
    let mut stmt = single_statement(conn, sql)?;
    let mut rows = stmt.query(params)?;
    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        out.push(f(row)?);
    }
    Ok(out)
}

/// Prepare `sql`, refusing input that holds more than one statement.
/// A plain `prepare` compiles the first statement and drops the rest.
fn single_statement<'conn>(conn: &'conn Connection, sql: &str) -> Result<Statement<'conn>> {
    let mut batch = Batch::new(conn, sql);
    let stmt = batch
        .next()?
        .ok_or_else(|| QueryError::InvalidParam("no SQL statement given".to_string()))?;
    if batch.next()?.is_some() {
        return Err(QueryError::InvalidParam(
            "expected a single SQL statement, found several".to_string(),
        ));
    }
    Ok(stmt)
}
