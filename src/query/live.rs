//! On-demand sensitive detection, the resolver's last real tier.

use crate::streaks::{self, GameLine, OrderingError, PeltDetector, SegmentLine};
use serde::Serialize;

/// Hottest and coldest bounded stretches from a live detection run.
///
/// Computed for seasons neither precomputed tier covers; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StretchReport {
    /// Season baseline (signal mean), context for the narration layer.
    pub season_ops: f64,
    pub hottest: SegmentLine,
    /// `None` when the coldest stretch is the same segment as the hottest.
    pub coldest: Option<SegmentLine>,
}

/// Re-runs detection with sensitive parameters and picks the highest- and
/// lowest-OPS segments within the game-count bounds.
///
/// Returns `None` below the minimum game threshold or when no segment
/// qualifies (a quiet season longer than `max_games` detects as one
/// oversized segment and stays empty here).
pub fn find_best_worst_stretches(
    games: &[GameLine],
    detector: &PeltDetector,
    max_games: usize,
) -> Result<Option<StretchReport>, OrderingError> {
    if games.len() < detector.min_segment() * 2 {
        return Ok(None);
    }

    let signal = streaks::build_ops_signal(games)?;
    let season_ops = streaks::signal_mean(&signal);

    let mut segments: Vec<SegmentLine> = Vec::new();
    let mut start = 0usize;
    for end in detector.detect(&signal) {
        let num_games = end - start;
        if num_games >= detector.min_segment() && num_games <= max_games {
            segments.push(streaks::aggregate_segment(games, start, end));
        }
        start = end;
    }

    if segments.is_empty() {
        return Ok(None);
    }

    // First maximal and minimal OPS win ties, compared unrounded.
    let mut hot_idx = 0usize;
    let mut cold_idx = 0usize;
    for (i, segment) in segments.iter().enumerate() {
        if segment.ops > segments[hot_idx].ops {
            hot_idx = i;
        }
        if segment.ops < segments[cold_idx].ops {
            cold_idx = i;
        }
    }

    let coldest = if cold_idx != hot_idx {
        Some(segments[cold_idx].clone())
    } else {
        None
    };

    Ok(Some(StretchReport {
        season_ops,
        hottest: segments[hot_idx].clone(),
        coldest,
    }))
}
