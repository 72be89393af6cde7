use log::debug;
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

use crate::error::{Result, SyncError};

/// How long a statement waits on a locked database before failing
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// VM instructions between deadline checks
const PROGRESS_OPS: i32 = 1000;

/// One detail upsert statement per continent plus the location/lookup ones
const STATEMENT_CACHE_CAPACITY: usize = 64;

/// The single shared connection used for a sync run
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the database file at `dsn` and check it answers
    pub fn open(dsn: impl AsRef<Path>) -> Result<Self> {
        let path = dsn.as_ref();
        debug!("Opening database {:?}", path);
        let conn = Connection::open(path).map_err(SyncError::Connection)?;
        Self::configure(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(SyncError::Connection)?;
        Self::configure(conn)
    }

    fn configure(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(SyncError::Connection)?;
        conn.busy_timeout(BUSY_TIMEOUT)
            .map_err(SyncError::Connection)?;
        conn.set_prepared_statement_cache_capacity(STATEMENT_CACHE_CAPACITY);

        let db = Self { conn };
        db.ping()?;
        Ok(db)
    }

    /// Round-trip a trivial query
    pub fn ping(&self) -> Result<()> {
        self.conn
            .query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
            .map_err(SyncError::Connection)?;
        Ok(())
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

/// Run `op`, interrupting any statement still running once `timeout` has
/// elapsed. Interrupted statements fail with `SQLITE_INTERRUPT`.
pub fn with_deadline<T>(
    conn: &Connection,
    timeout: Duration,
    op: impl FnOnce(&Connection) -> rusqlite::Result<T>,
) -> rusqlite::Result<T> {
    let deadline = Instant::now() + timeout;
    conn.progress_handler(PROGRESS_OPS, Some(move || Instant::now() >= deadline));
    let result = op(conn);
    conn.progress_handler(0, None::<fn() -> bool>);
    result
}
