//! Schema bootstrap for the streak tables.

use super::StorageError;
use rusqlite::Connection;

/// Enables WAL and creates the two streak tables and their indexes when
/// missing. The upstream tables (`players`, `season_batting_stats`,
/// `game_batting_logs`) belong to the stat-ingestion collaborator and are
/// never created here.
pub fn init_schema(conn: &Connection) -> Result<(), StorageError> {
    conn.pragma_update(None, "journal_mode", "WAL")?;

    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS streaks (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            player_id TEXT NOT NULL,
            season INTEGER NOT NULL,
            start_date TEXT NOT NULL,
            end_date TEXT NOT NULL,
            num_games INTEGER NOT NULL,
            batting_avg REAL,
            obp REAL,
            slg REAL,
            ops REAL,
            home_runs INTEGER,
            hits INTEGER,
            at_bats INTEGER,
            walks INTEGER,
            strikeouts INTEGER,
            performance TEXT,
            FOREIGN KEY (player_id) REFERENCES players(player_id)
        );

        CREATE INDEX IF NOT EXISTS idx_streaks_player ON streaks(player_id);
        CREATE INDEX IF NOT EXISTS idx_streaks_player_season ON streaks(player_id, season);
        CREATE INDEX IF NOT EXISTS idx_streaks_performance ON streaks(performance);

        CREATE TABLE IF NOT EXISTS streaks_sensitive (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            player_id TEXT NOT NULL,
            season INTEGER NOT NULL,
            start_date TEXT NOT NULL,
            end_date TEXT NOT NULL,
            num_games INTEGER NOT NULL,
            batting_avg REAL,
            obp REAL,
            slg REAL,
            ops REAL,
            home_runs INTEGER,
            hits INTEGER,
            at_bats INTEGER,
            walks INTEGER,
            strikeouts INTEGER,
            performance TEXT,
            season_ops REAL,
            FOREIGN KEY (player_id) REFERENCES players(player_id)
        );

        CREATE INDEX IF NOT EXISTS idx_streaks_sens_player ON streaks_sensitive(player_id);
        CREATE INDEX IF NOT EXISTS idx_streaks_sens_player_season ON streaks_sensitive(player_id, season);
        CREATE INDEX IF NOT EXISTS idx_streaks_sens_performance ON streaks_sensitive(performance);
        ",
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_init_schema_is_idempotent() {
        let db_file = NamedTempFile::new().unwrap();
        let conn = Connection::open(db_file.path()).unwrap();

        init_schema(&conn).unwrap();
        init_schema(&conn).unwrap();

        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'
                 AND name IN ('streaks', 'streaks_sensitive')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 2);

        let mode: String = conn
            .query_row("PRAGMA journal_mode", [], |row| row.get(0))
            .unwrap();
        assert_eq!(mode.to_lowercase(), "wal");
    }
}
