// SQLite persistence for logged matches.

use std::sync::{Mutex, MutexGuard};

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};

use mlbb_draft_core::draft::MatchMeta;
use mlbb_draft_core::payload::DraftPayload;

/// A saved match as listed back from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSummary {
    pub id: i64,
    pub played_on: Option<NaiveDate>,
    pub blue_team: String,
    pub red_team: String,
    pub winner: String,
    pub created_at: String,
}

/// A saved match with its draft payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMatch {
    pub id: i64,
    pub meta: MatchMeta,
    pub payload: DraftPayload,
}

/// SQLite-backed store for finalized drafts.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) a SQLite database at `path` and ensure the schema
    /// exists. Pass `":memory:"` for an ephemeral database.
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open database at {path}"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;
             PRAGMA foreign_keys = ON;",
        )
        .context("failed to set database pragmas")?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS matches (
                id         INTEGER PRIMARY KEY AUTOINCREMENT,
                played_on  TEXT,
                blue_team  TEXT NOT NULL,
                red_team   TEXT NOT NULL,
                winner     TEXT NOT NULL,
                meta       TEXT NOT NULL,
                payload    TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
            );

            CREATE INDEX IF NOT EXISTS idx_matches_played_on ON matches(played_on);
            ",
        )
        .context("failed to create database schema")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow!("database mutex poisoned"))
    }

    /// Store a finalized draft. Returns the new row id.
    pub fn save_match(&self, meta: &MatchMeta, payload: &DraftPayload) -> Result<i64> {
        let conn = self.conn()?;
        let meta_json = serde_json::to_string(meta).context("failed to serialize match meta")?;
        let payload_json =
            serde_json::to_string(payload).context("failed to serialize draft payload")?;
        conn.execute(
            "INSERT INTO matches (played_on, blue_team, red_team, winner, meta, payload)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                meta.played_on.map(|d| d.to_string()),
                meta.blue_team,
                meta.red_team,
                meta.winner,
                meta_json,
                payload_json,
            ],
        )
        .context("failed to save match")?;
        Ok(conn.last_insert_rowid())
    }

    /// Load one match by id. Returns `None` if no such row exists.
    pub fn load_match(&self, id: i64) -> Result<Option<StoredMatch>> {
        let conn = self.conn()?;
        let row = conn
            .query_row(
                "SELECT meta, payload FROM matches WHERE id = ?1",
                params![id],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()
            .context("failed to query match")?;

        let Some((meta_json, payload_json)) = row else {
            return Ok(None);
        };
        let meta: MatchMeta =
            serde_json::from_str(&meta_json).context("failed to deserialize match meta")?;
        let payload: DraftPayload =
            serde_json::from_str(&payload_json).context("failed to deserialize draft payload")?;
        Ok(Some(StoredMatch { id, meta, payload }))
    }

    /// All saved matches, most recently played first. Undated matches sort
    /// last; ties fall back to insertion order.
    pub fn list_matches(&self) -> Result<Vec<MatchSummary>> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT id, played_on, blue_team, red_team, winner, created_at
                 FROM matches
                 ORDER BY played_on IS NULL, played_on DESC, id DESC",
            )
            .context("failed to prepare list_matches query")?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, Option<String>>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, String>(5)?,
                ))
            })
            .context("failed to query matches")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("failed to map match rows")?;

        rows.into_iter()
            .map(|(id, played_on, blue_team, red_team, winner, created_at)| {
                let played_on = played_on
                    .map(|s| {
                        NaiveDate::parse_from_str(&s, "%Y-%m-%d")
                            .with_context(|| format!("bad played_on `{s}` in match {id}"))
                    })
                    .transpose()?;
                Ok(MatchSummary {
                    id,
                    played_on,
                    blue_team,
                    red_team,
                    winner,
                    created_at,
                })
            })
            .collect()
    }

    /// Remove a match. Returns whether a row was deleted.
    pub fn delete_match(&self, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let n = conn
            .execute("DELETE FROM matches WHERE id = ?1", params![id])
            .context("failed to delete match")?;
        Ok(n > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mlbb_draft_core::payload::{PickEntry, TeamPayload};

    fn test_db() -> Database {
        Database::open(":memory:").expect("in-memory database should open")
    }

    fn meta(blue: &str, red: &str, played_on: Option<&str>) -> MatchMeta {
        MatchMeta {
            played_on: played_on.map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()),
            blue_team: blue.into(),
            red_team: red.into(),
            winner: blue.into(),
            ..Default::default()
        }
    }

    fn payload() -> DraftPayload {
        DraftPayload {
            blue: TeamPayload {
                banning_phase1: vec![Some("Ling".into()), None, Some("Fanny".into())],
                picks1: vec![PickEntry {
                    lane: Some("jungler".into()),
                    hero: Some("Joy".into()),
                    player: Some("Kairi".into()),
                }],
                ..Default::default()
            },
            red: TeamPayload::default(),
        }
    }

    #[test]
    fn open_creates_matches_table() {
        let db = test_db();
        let conn = db.conn().unwrap();
        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert!(tables.contains(&"matches".to_string()));
    }

    #[test]
    fn save_and_load_round_trip() {
        let db = test_db();
        let m = meta("ONIC", "RRQ", Some("2024-03-09"));
        let id = db.save_match(&m, &payload()).unwrap();

        let stored = db.load_match(id).unwrap().expect("match should exist");
        assert_eq!(stored.id, id);
        assert_eq!(stored.meta, m);
        assert_eq!(stored.payload, payload());
        assert_eq!(stored.payload.blue.banning_phase1[1], None);
    }

    #[test]
    fn load_missing_match_is_none() {
        let db = test_db();
        assert!(db.load_match(42).unwrap().is_none());
    }

    #[test]
    fn list_orders_by_date_then_undated() {
        let db = test_db();
        let a = db.save_match(&meta("A", "B", Some("2024-01-01")), &payload()).unwrap();
        let b = db.save_match(&meta("C", "D", None), &payload()).unwrap();
        let c = db.save_match(&meta("E", "F", Some("2024-02-01")), &payload()).unwrap();

        let ids: Vec<i64> = db.list_matches().unwrap().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![c, a, b]);

        let first = &db.list_matches().unwrap()[0];
        assert_eq!(first.blue_team, "E");
        assert_eq!(first.winner, "E");
        assert!(!first.created_at.is_empty());
    }

    #[test]
    fn delete_match_removes_row() {
        let db = test_db();
        let id = db.save_match(&meta("A", "B", None), &payload()).unwrap();
        assert!(db.delete_match(id).unwrap());
        assert!(!db.delete_match(id).unwrap());
        assert!(db.list_matches().unwrap().is_empty());
    }
}
