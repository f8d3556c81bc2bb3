//! Full-replace persistence of streak records.

use super::{StorageError, StreakRecord};
use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

/// Writer for the precomputed streak tiers.
///
/// Each call replaces a tier's contents wholesale inside one transaction:
/// after it returns, the table holds exactly the given records. Since the
/// records carry no timestamps, rerunning a pass over unchanged inputs
/// lands byte-identical rows.
#[async_trait]
pub trait StreakWriter: Send + Sync {
    /// Clears and repopulates the primary `streaks` table.
    async fn replace_primary(&self, records: &[StreakRecord]) -> Result<(), StorageError>;

    /// Clears and repopulates the secondary `streaks_sensitive` table.
    async fn replace_sensitive(&self, records: &[StreakRecord]) -> Result<(), StorageError>;
}

/// SQLite implementation of [`StreakWriter`].
///
/// Does not create the schema; callers run [`crate::store::init_schema`]
/// first.
pub struct SqliteStreakWriter {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStreakWriter {
    pub fn new(db_path: &str) -> Result<Self, StorageError> {
        let conn = Connection::open(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }
}

#[async_trait]
impl StreakWriter for SqliteStreakWriter {
    async fn replace_primary(&self, records: &[StreakRecord]) -> Result<(), StorageError> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;

        tx.execute("DELETE FROM streaks", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO streaks (player_id, season, start_date, end_date, num_games,
                                      batting_avg, obp, slg, ops, home_runs, hits, at_bats,
                                      walks, strikeouts, performance)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
            )?;
            for record in records {
                stmt.execute(params![
                    record.player_id,
                    record.season,
                    record.start_date.to_string(),
                    record.end_date.to_string(),
                    record.num_games,
                    record.batting_avg,
                    record.obp,
                    record.slg,
                    record.ops,
                    record.home_runs,
                    record.hits,
                    record.at_bats,
                    record.walks,
                    record.strikeouts,
                    record.performance.as_str(),
                ])?;
            }
        }
        tx.commit()?;

        log::debug!("replaced streaks with {} records", records.len());
        Ok(())
    }

    async fn replace_sensitive(&self, records: &[StreakRecord]) -> Result<(), StorageError> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;

        tx.execute("DELETE FROM streaks_sensitive", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO streaks_sensitive (player_id, season, start_date, end_date, num_games,
                                      batting_avg, obp, slg, ops, home_runs, hits, at_bats,
                                      walks, strikeouts, performance, season_ops)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
            )?;
            for record in records {
                stmt.execute(params![
                    record.player_id,
                    record.season,
                    record.start_date.to_string(),
                    record.end_date.to_string(),
                    record.num_games,
                    record.batting_avg,
                    record.obp,
                    record.slg,
                    record.ops,
                    record.home_runs,
                    record.hits,
                    record.at_bats,
                    record.walks,
                    record.strikeouts,
                    record.performance.as_str(),
                    record.season_ops,
                ])?;
            }
        }
        tx.commit()?;

        log::debug!("replaced streaks_sensitive with {} records", records.len());
        Ok(())
    }
}
