use crate::error::Result;
use rusqlite::{Connection, Transaction};
use std::ops::Deref;
use std::path::Path;
use tracing::{debug, warn};

/// A connection scoped to one unit of work.
///
/// Dropping the session rolls back whatever is still uncommitted and closes
/// the connection. Statements run directly on the session are in autocommit
/// mode, so each of them is already durable by the time the session ends;
/// only work done inside [`Session::transaction`] (or an explicit `BEGIN`)
/// is discarded without a commit.
pub struct Session {
    conn: Connection,
}

impl Session {
    /// Open a session on the database file at `path`, creating it if needed
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "opening session");
        let conn = Connection::open(path)?;
        Self::configure(conn)
    }

    /// Open a session on a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        Self::configure(Connection::open_in_memory()?)
    }

    fn configure(conn: Connection) -> Result<Self> {
        // Cascade and set-null rules are only honoured with this on
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Session { conn })
    }

    /// Start a transaction that rolls back when dropped unless committed
    pub fn transaction(&mut self) -> Result<Transaction<'_>> {
        Ok(self.conn.transaction()?)
    }

    /// Roll back anything left open by an explicit `BEGIN`
    pub fn rollback_pending(&self) -> Result<bool> {
        if self.conn.is_autocommit() {
            return Ok(false);
        }
        debug!("rolling back uncommitted work");
        self.conn.execute_batch("ROLLBACK")?;
        Ok(true)
    }
}

impl Deref for Session {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        &self.conn
    }
}

impl Drop for Session {
    // The connection itself is closed when the field drops right after this
    fn drop(&mut self) {
        if let Err(e) = self.rollback_pending() {
            warn!(error = %e, "failed to roll back on session exit");
        }
    }
}
