//! Aggregate stat lines over contiguous game ranges.

use super::signal::GameLine;
use chrono::NaiveDate;
use serde::Serialize;

/// Aggregate batting line over a contiguous run of games.
///
/// Counting stats are plain sums over the range; rate stats are recomputed
/// from those sums, never averaged from per-game values. All rates here are
/// unrounded; rounding to three decimals belongs to the storage and display
/// boundary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentLine {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub num_games: usize,
    pub at_bats: i64,
    pub hits: i64,
    pub home_runs: i64,
    pub walks: i64,
    pub strikeouts: i64,
    pub batting_avg: f64,
    pub obp: f64,
    pub slg: f64,
    pub ops: f64,
}

/// Sums counting stats over `games[start..end)` and recomputes the rates.
///
/// Divisions guard against zero denominators (a stretch of zero-AB games
/// reads as all-zero rates, not NaN).
pub fn aggregate_segment(games: &[GameLine], start: usize, end: usize) -> SegmentLine {
    assert!(start < end, "empty segment [{}, {})", start, end);
    assert!(end <= games.len(), "segment end {} past game count {}", end, games.len());

    let segment = &games[start..end];

    let mut plate_appearances = 0i64;
    let mut at_bats = 0i64;
    let mut hits = 0i64;
    let mut doubles = 0i64;
    let mut triples = 0i64;
    let mut home_runs = 0i64;
    let mut walks = 0i64;
    let mut strikeouts = 0i64;
    for game in segment {
        plate_appearances += game.plate_appearances;
        at_bats += game.at_bats;
        hits += game.hits;
        doubles += game.doubles;
        triples += game.triples;
        home_runs += game.home_runs;
        walks += game.walks;
        strikeouts += game.strikeouts;
    }

    let singles = hits - doubles - triples - home_runs;
    let total_bases = singles + 2 * doubles + 3 * triples + 4 * home_runs;

    let batting_avg = if at_bats > 0 { hits as f64 / at_bats as f64 } else { 0.0 };
    let slg = if at_bats > 0 { total_bases as f64 / at_bats as f64 } else { 0.0 };
    let obp = if plate_appearances > 0 {
        (hits + walks) as f64 / plate_appearances as f64
    } else {
        0.0
    };

    SegmentLine {
        start_date: segment[0].date,
        end_date: segment[segment.len() - 1].date,
        num_games: segment.len(),
        at_bats,
        hits,
        home_runs,
        walks,
        strikeouts,
        batting_avg,
        obp,
        slg,
        ops: obp + slg,
    }
}

/// Rounds to three decimals for stored and displayed rate stats.
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
