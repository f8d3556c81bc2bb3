//! Per-game performance signal construction.
//!
//! Converts one player-season's ordered box-score lines into a per-game OPS
//! sequence for change-point detection. OBP uses the simplified game-log
//! form (H + BB) / PA since game logs carry neither hit-by-pitch nor
//! sacrifice flies.

use chrono::NaiveDate;

/// One player's box-score line for a single game.
///
/// The storage layer guarantees at most one line per (player, season, date)
/// and coalesces NULL counting stats to zero on read.
#[derive(Debug, Clone, PartialEq)]
pub struct GameLine {
    pub date: NaiveDate,
    pub plate_appearances: i64,
    pub at_bats: i64,
    pub hits: i64,
    pub doubles: i64,
    pub triples: i64,
    pub home_runs: i64,
    pub walks: i64,
    pub strikeouts: i64,
}

/// Game logs handed to the signal builder were not in date order.
///
/// The builder never re-sorts: out-of-order input means the upstream query
/// or the stored data is wrong, and a silently reordered signal would
/// misplace every breakpoint after the swap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderingError {
    /// Index of the offending game within the slice.
    pub position: usize,
    pub previous: NaiveDate,
    pub date: NaiveDate,
}

impl std::fmt::Display for OrderingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "game logs out of order at index {}: {} follows {}",
            self.position, self.date, self.previous
        )
    }
}

impl std::error::Error for OrderingError {}

/// Builds the per-game OPS signal for a player-season.
///
/// Games must already be in ascending date order; the signal has one value
/// per game. Zero-AB and zero-PA games contribute an OPS of 0.0, which is a
/// deliberately low observation rather than missing data.
pub fn build_ops_signal(games: &[GameLine]) -> Result<Vec<f64>, OrderingError> {
    for (i, pair) in games.windows(2).enumerate() {
        if pair[1].date < pair[0].date {
            return Err(OrderingError {
                position: i + 1,
                previous: pair[0].date,
                date: pair[1].date,
            });
        }
    }
    Ok(games.iter().map(game_ops).collect())
}

/// Single-game OPS: simplified OBP plus SLG, 0.0 when AB or PA is zero.
pub fn game_ops(game: &GameLine) -> f64 {
    if game.at_bats <= 0 || game.plate_appearances <= 0 {
        return 0.0;
    }
    let singles = game.hits - game.doubles - game.triples - game.home_runs;
    let total_bases = singles + 2 * game.doubles + 3 * game.triples + 4 * game.home_runs;
    let slg = total_bases as f64 / game.at_bats as f64;
    let obp = (game.hits + game.walks) as f64 / game.plate_appearances as f64;
    obp + slg
}

/// Arithmetic mean of a signal, 0.0 when empty. The sensitive tiers use
/// this as the season baseline.
pub fn signal_mean(signal: &[f64]) -> f64 {
    if signal.is_empty() {
        return 0.0;
    }
    signal.iter().sum::<f64>() / signal.len() as f64
}
