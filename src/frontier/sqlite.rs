//! SQLite frontier store
//!
//! Keeps the dedup set on disk so large crawls are not bounded by
//! available memory. The on-disk layout is a single table:
//!
//! ```sql
//! frontier (url TEXT UNIQUE, priority INTEGER, parsed BOOLEAN)
//! ```
//!
//! `parsed = 0` covers Pending and InFlight records; the in-flight
//! claims live in process memory because a fetch claim does not need to
//! survive a crash — unclaimed rows simply return to Pending on
//! restart.

use crate::frontier::{FrontierResult, FrontierStore, LinkPriority, RecordState, UrlRecord};
use rusqlite::{params, Connection};
use std::collections::HashSet;
use std::path::Path;

/// SQLite frontier backing store
pub struct SqliteStore {
    conn: Connection,
    claimed: HashSet<String>,
}

impl SqliteStore {
    /// Opens or creates a frontier database at the given path
    pub fn new(path: &Path) -> FrontierResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        Self::with_connection(conn)
    }

    /// Creates an in-memory database (for testing)
    pub fn new_in_memory() -> FrontierResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> FrontierResult<Self> {
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS frontier (
                url      TEXT UNIQUE NOT NULL,
                priority INTEGER NOT NULL,
                parsed   BOOLEAN NOT NULL DEFAULT 0
            );
            CREATE INDEX IF NOT EXISTS idx_frontier_pending
                ON frontier (parsed, priority);
        ",
        )?;

        Ok(Self {
            conn,
            claimed: HashSet::new(),
        })
    }
}

impl FrontierStore for SqliteStore {
    fn insert_if_absent(&mut self, url: &str, priority: LinkPriority) -> FrontierResult<bool> {
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO frontier (url, priority, parsed) VALUES (?1, ?2, 0)",
            params![url, priority.rank()],
        )?;
        Ok(inserted == 1)
    }

    fn claim_batch(&mut self, n: usize) -> FrontierResult<Vec<UrlRecord>> {
        // Over-fetch by the number of outstanding claims, which are
        // still parsed = 0 in the table, then filter them out here.
        let limit = (n + self.claimed.len()) as i64;

        let mut stmt = self.conn.prepare(
            "SELECT url, priority FROM frontier
             WHERE parsed = 0
             ORDER BY priority ASC, rowid ASC
             LIMIT ?1",
        )?;

        let rows = stmt.query_map(params![limit], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;

        let mut claimed = Vec::new();
        for row in rows {
            let (url, rank) = row?;
            if claimed.len() >= n {
                break;
            }
            if self.claimed.contains(&url) {
                continue;
            }

            self.claimed.insert(url.clone());
            claimed.push(UrlRecord {
                url,
                priority: LinkPriority::from_rank(rank).unwrap_or(LinkPriority::Low),
                state: RecordState::InFlight,
            });
        }

        Ok(claimed)
    }

    fn mark_done(&mut self, url: &str) -> FrontierResult<()> {
        self.conn.execute(
            "UPDATE frontier SET parsed = 1 WHERE url = ?1",
            params![url],
        )?;
        self.claimed.remove(url);
        Ok(())
    }

    fn contains(&self, url: &str) -> FrontierResult<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM frontier WHERE url = ?1",
            params![url],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn pending_count(&self) -> FrontierResult<usize> {
        let unparsed: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM frontier WHERE parsed = 0", [], |row| {
                    row.get(0)
                })?;
        Ok(unparsed as usize - self.claimed.len())
    }

    fn in_flight_count(&self) -> FrontierResult<usize> {
        Ok(self.claimed.len())
    }

    fn done_count(&self) -> FrontierResult<usize> {
        let parsed: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM frontier WHERE parsed = 1", [], |row| {
                    row.get(0)
                })?;
        Ok(parsed as usize)
    }
}
