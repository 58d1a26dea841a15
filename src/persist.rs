//! Snapshot storage: one key/value row in a workspace sqlite file. The
//! whole state tree is rewritten on every transition; there are no partial
//! writes. Read/write failures degrade to in-memory operation; the caller
//! logs and continues.

use std::path::Path;

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};

use crate::model::AppState;
use crate::normalize;

pub const SNAPSHOT_KEY: &str = "state";

pub struct SnapshotDb {
    conn: Connection,
}

impl SnapshotDb {
    pub fn open(workspace: &Path) -> anyhow::Result<Self> {
        std::fs::create_dir_all(workspace)?;
        let db_path = workspace.join("wellbeing.sqlite3");
        let conn = Connection::open(db_path)?;
        Self::init(conn)
    }

    pub fn open_in_memory() -> anyhow::Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> anyhow::Result<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS snapshot(
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                saved_at TEXT NOT NULL
            )",
            [],
        )?;
        Ok(Self { conn })
    }

    pub fn load_raw(&self) -> anyhow::Result<Option<String>> {
        let raw = self
            .conn
            .query_row(
                "SELECT value FROM snapshot WHERE key = ?",
                [SNAPSHOT_KEY],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(raw)
    }

    pub fn save_raw(&self, value: &str) -> anyhow::Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO snapshot(key, value, saved_at) VALUES (?, ?, ?)",
            (SNAPSHOT_KEY, value, Utc::now().to_rfc3339()),
        )?;
        Ok(())
    }
}

/// Loads and normalizes the stored snapshot; an unreadable row counts as "no
/// saved state" and yields the seed.
pub fn load_state(db: &SnapshotDb) -> AppState {
    match db.load_raw() {
        Ok(raw) => normalize::load_or_seed(raw.as_deref()),
        Err(error) => {
            tracing::warn!(%error, "snapshot read failed, starting from seed");
            normalize::load_or_seed(None)
        }
    }
}

pub fn save_state(db: &SnapshotDb, state: &AppState) -> anyhow::Result<()> {
    let raw = serde_json::to_string(state)?;
    db.save_raw(&raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;

    #[test]
    fn save_then_load_reconstructs_the_tree() {
        let db = SnapshotDb::open_in_memory().expect("open");
        let state = seed::initial_state();
        save_state(&db, &state).expect("save");
        assert_eq!(load_state(&db), state);
    }

    #[test]
    fn empty_db_loads_the_seed() {
        let db = SnapshotDb::open_in_memory().expect("open");
        assert_eq!(load_state(&db), seed::initial_state());
    }

    #[test]
    fn corrupt_row_loads_the_seed() {
        let db = SnapshotDb::open_in_memory().expect("open");
        db.save_raw("{{{ not json").expect("save raw");
        assert_eq!(load_state(&db), seed::initial_state());
    }
}
