//! SQLite Persistence - Streak Tables and Upstream Stat Access
//!
//! The database file is shared with the stat-ingestion collaborator that
//! owns `players`, `season_batting_stats`, and `game_batting_logs`. This
//! crate reads those and owns exactly two tables:
//!
//! ```text
//! streaks            primary tier  (penalty ~3.0, every processed season)
//! streaks_sensitive  secondary tier (penalty ~1.5, quiet seasons only,
//!                                    carries the season_ops baseline)
//! ```
//!
//! Both tiers are maintained with full-replace batch semantics and carry no
//! timestamps, so reruns over unchanged inputs land byte-identical rows.

pub mod reader;
pub mod schema;
pub mod writer;

pub use reader::StatsReader;
pub use schema::init_schema;
pub use writer::{SqliteStreakWriter, StreakWriter};

use crate::streaks::{round3, Performance, SegmentLine};
use chrono::NaiveDate;
use serde::Serialize;

/// Storage failure surfaced by the reader, writer, or schema bootstrap.
#[derive(Debug)]
pub enum StorageError {
    Database(rusqlite::Error),
    InvalidDate(String),
    InvalidLabel(String),
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        StorageError::Database(err)
    }
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::Database(e) => write!(f, "Database error: {}", e),
            StorageError::InvalidDate(d) => write!(f, "Invalid stored date: {}", d),
            StorageError::InvalidLabel(l) => write!(f, "Invalid performance label: {}", l),
        }
    }
}

impl std::error::Error for StorageError {}

/// One persisted streak segment for a player-season.
///
/// Rate stats are rounded to three decimals here, at the storage boundary;
/// everything upstream of this type compares unrounded values.
/// `season_ops` is `None` on the primary tier and carries the labeling
/// baseline on the sensitive tier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreakRecord {
    pub player_id: String,
    pub season: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub num_games: i64,
    pub batting_avg: f64,
    pub obp: f64,
    pub slg: f64,
    pub ops: f64,
    pub home_runs: i64,
    pub hits: i64,
    pub at_bats: i64,
    pub walks: i64,
    pub strikeouts: i64,
    pub performance: Performance,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season_ops: Option<f64>,
}

impl StreakRecord {
    pub fn from_segment(
        player_id: &str,
        season: i64,
        line: &SegmentLine,
        performance: Performance,
    ) -> Self {
        Self {
            player_id: player_id.to_string(),
            season,
            start_date: line.start_date,
            end_date: line.end_date,
            num_games: line.num_games as i64,
            batting_avg: round3(line.batting_avg),
            obp: round3(line.obp),
            slg: round3(line.slg),
            ops: round3(line.ops),
            home_runs: line.home_runs,
            hits: line.hits,
            at_bats: line.at_bats,
            walks: line.walks,
            strikeouts: line.strikeouts,
            performance,
            season_ops: None,
        }
    }

    /// Attaches the season baseline a sensitive-tier record was labeled
    /// against, rounded like every other stored rate.
    pub fn with_season_ops(mut self, season_ops: f64) -> Self {
        self.season_ops = Some(round3(season_ops));
        self
    }
}
