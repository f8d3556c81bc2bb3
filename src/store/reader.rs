//! Read access to upstream stats and precomputed streak tiers.

use super::{StorageError, StreakRecord};
use crate::streaks::{GameLine, Performance};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};

/// SQLite reader for everything the detection passes and the resolver
/// consume: upstream game logs and season stats, plus both streak tiers.
pub struct StatsReader {
    conn: Connection,
}

impl StatsReader {
    pub fn open(db_path: &str) -> Result<Self, StorageError> {
        let conn = Connection::open(db_path)?;
        Ok(Self { conn })
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    /// Every (player_id, season) with game logs, ordered by season then
    /// player for stable batch progress.
    pub fn player_seasons(&self) -> Result<Vec<(String, i64)>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT player_id, season FROM game_batting_logs
             ORDER BY season, player_id",
        )?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;

        let mut seasons = Vec::new();
        for row in rows {
            seasons.push(row?);
        }
        Ok(seasons)
    }

    /// Game lines for one player-season in ascending date order, NULL
    /// counting stats coalesced to zero.
    pub fn game_lines(&self, player_id: &str, season: i64) -> Result<Vec<GameLine>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT date, plate_appearances, at_bats, hits, doubles, triples,
                    home_runs, walks, strikeouts
             FROM game_batting_logs
             WHERE player_id = ?1 AND season = ?2
             ORDER BY date ASC",
        )?;
        let rows = stmt.query_map(params![player_id, season], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, Option<i64>>(1)?.unwrap_or(0),
                row.get::<_, Option<i64>>(2)?.unwrap_or(0),
                row.get::<_, Option<i64>>(3)?.unwrap_or(0),
                row.get::<_, Option<i64>>(4)?.unwrap_or(0),
                row.get::<_, Option<i64>>(5)?.unwrap_or(0),
                row.get::<_, Option<i64>>(6)?.unwrap_or(0),
                row.get::<_, Option<i64>>(7)?.unwrap_or(0),
                row.get::<_, Option<i64>>(8)?.unwrap_or(0),
            ))
        })?;

        let mut games = Vec::new();
        for row in rows {
            let (date, pa, ab, h, d2, d3, hr, bb, so) = row?;
            games.push(GameLine {
                date: parse_stored_date(&date)?,
                plate_appearances: pa,
                at_bats: ab,
                hits: h,
                doubles: d2,
                triples: d3,
                home_runs: hr,
                walks: bb,
                strikeouts: so,
            });
        }
        Ok(games)
    }

    /// Precomputed season OPS from the season stats table.
    ///
    /// Traded players have one row per team; the fullest stat line (most
    /// plate appearances) wins. `None` when the season row is missing or
    /// its OPS is NULL.
    pub fn season_ops(&self, player_id: &str, season: i64) -> Result<Option<f64>, StorageError> {
        let ops: Option<Option<f64>> = self
            .conn
            .query_row(
                "SELECT ops FROM season_batting_stats
                 WHERE player_id = ?1 AND season = ?2
                 ORDER BY plate_appearances DESC
                 LIMIT 1",
                params![player_id, season],
                |row| row.get(0),
            )
            .optional()?;
        Ok(ops.flatten())
    }

    /// Player-seasons whose primary pass produced exactly one segment, the
    /// quiet seasons the sensitive pass re-examines.
    pub fn single_segment_seasons(&self) -> Result<Vec<(String, i64)>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT player_id, season FROM streaks
             GROUP BY player_id, season
             HAVING COUNT(*) = 1
             ORDER BY season, player_id",
        )?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;

        let mut seasons = Vec::new();
        for row in rows {
            seasons.push(row?);
        }
        Ok(seasons)
    }

    /// Primary-tier records for a player-season, earliest first.
    pub fn primary_streaks(
        &self,
        player_id: &str,
        season: i64,
    ) -> Result<Vec<StreakRecord>, StorageError> {
        // NULL stands in for the season_ops column the primary table lacks,
        // so both tiers share one row shape.
        self.streak_records(
            "SELECT player_id, season, start_date, end_date, num_games,
                    batting_avg, obp, slg, ops, home_runs, hits, at_bats,
                    walks, strikeouts, performance, NULL
             FROM streaks
             WHERE player_id = ?1 AND season = ?2
             ORDER BY start_date",
            player_id,
            season,
        )
    }

    /// Sensitive-tier records for a player-season, earliest first.
    pub fn sensitive_streaks(
        &self,
        player_id: &str,
        season: i64,
    ) -> Result<Vec<StreakRecord>, StorageError> {
        self.streak_records(
            "SELECT player_id, season, start_date, end_date, num_games,
                    batting_avg, obp, slg, ops, home_runs, hits, at_bats,
                    walks, strikeouts, performance, season_ops
             FROM streaks_sensitive
             WHERE player_id = ?1 AND season = ?2
             ORDER BY start_date",
            player_id,
            season,
        )
    }

    /// First player whose name contains the given substring.
    pub fn find_player(&self, name: &str) -> Result<Option<(String, String)>, StorageError> {
        let pattern = format!("%{}%", name);
        let found = self
            .conn
            .query_row(
                "SELECT player_id, name FROM players
                 WHERE name LIKE ?1
                 ORDER BY name
                 LIMIT 1",
                params![pattern],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;
        Ok(found)
    }

    fn streak_records(
        &self,
        sql: &str,
        player_id: &str,
        season: i64,
    ) -> Result<Vec<StreakRecord>, StorageError> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params![player_id, season], |row| {
            Ok(RawStreakRow {
                player_id: row.get(0)?,
                season: row.get(1)?,
                start_date: row.get(2)?,
                end_date: row.get(3)?,
                num_games: row.get(4)?,
                batting_avg: row.get(5)?,
                obp: row.get(6)?,
                slg: row.get(7)?,
                ops: row.get(8)?,
                home_runs: row.get(9)?,
                hits: row.get(10)?,
                at_bats: row.get(11)?,
                walks: row.get(12)?,
                strikeouts: row.get(13)?,
                performance: row.get(14)?,
                season_ops: row.get(15)?,
            })
        })?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?.into_record()?);
        }
        Ok(records)
    }
}

/// Stored row before dates and labels are parsed back into domain types.
struct RawStreakRow {
    player_id: String,
    season: i64,
    start_date: String,
    end_date: String,
    num_games: i64,
    batting_avg: f64,
    obp: f64,
    slg: f64,
    ops: f64,
    home_runs: i64,
    hits: i64,
    at_bats: i64,
    walks: i64,
    strikeouts: i64,
    performance: String,
    season_ops: Option<f64>,
}

impl RawStreakRow {
    fn into_record(self) -> Result<StreakRecord, StorageError> {
        let performance = Performance::parse(&self.performance)
            .ok_or_else(|| StorageError::InvalidLabel(self.performance.clone()))?;
        Ok(StreakRecord {
            player_id: self.player_id,
            season: self.season,
            start_date: parse_stored_date(&self.start_date)?,
            end_date: parse_stored_date(&self.end_date)?,
            num_games: self.num_games,
            batting_avg: self.batting_avg,
            obp: self.obp,
            slg: self.slg,
            ops: self.ops,
            home_runs: self.home_runs,
            hits: self.hits,
            at_bats: self.at_bats,
            walks: self.walks,
            strikeouts: self.strikeouts,
            performance,
            season_ops: self.season_ops,
        })
    }
}

fn parse_stored_date(raw: &str) -> Result<NaiveDate, StorageError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| StorageError::InvalidDate(raw.to_string()))
}
