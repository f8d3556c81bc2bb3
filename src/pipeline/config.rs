//! Detection and storage parameters from environment variables.

use crate::streaks::PeltDetector;
use std::env;

/// Configuration for the batch passes and the query-time fallback.
///
/// Detection parameters are threaded explicitly into each pass through the
/// detector constructors below; nothing reads the environment after
/// startup.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// SQLite database path
    pub db_path: String,
    /// Minimum games in a streak segment
    pub min_segment: usize,
    /// Primary-pass penalty (higher buys fewer change points)
    pub primary_penalty: f64,
    /// Penalty for the sensitive pass and the live fallback
    pub sensitive_penalty: f64,
    /// Centered moving-average window applied before detection
    pub smoothing_window: usize,
    /// Longest segment the sensitive tiers will surface
    pub sensitive_max_games: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            db_path: "data/baseball_stats.db".to_string(),
            min_segment: 7,
            primary_penalty: 3.0,
            sensitive_penalty: 1.5,
            smoothing_window: 5,
            sensitive_max_games: 30,
        }
    }
}

impl PipelineConfig {
    /// Loads configuration from environment variables, falling back to the
    /// defaults above:
    /// - `STREAKLINE_DB_PATH` - SQLite database path (default: data/baseball_stats.db)
    /// - `STREAK_MIN_SEGMENT` - minimum games per segment (default: 7)
    /// - `STREAK_PRIMARY_PENALTY` - primary-pass penalty (default: 3.0)
    /// - `STREAK_SENSITIVE_PENALTY` - sensitive penalty (default: 1.5)
    /// - `STREAK_SMOOTHING_WINDOW` - moving-average window (default: 5)
    /// - `STREAK_SENSITIVE_MAX_GAMES` - longest sensitive segment (default: 30)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            db_path: env::var("STREAKLINE_DB_PATH").unwrap_or(defaults.db_path),
            min_segment: env::var("STREAK_MIN_SEGMENT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.min_segment),
            primary_penalty: env::var("STREAK_PRIMARY_PENALTY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.primary_penalty),
            sensitive_penalty: env::var("STREAK_SENSITIVE_PENALTY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.sensitive_penalty),
            smoothing_window: env::var("STREAK_SMOOTHING_WINDOW")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.smoothing_window),
            sensitive_max_games: env::var("STREAK_SENSITIVE_MAX_GAMES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.sensitive_max_games),
        }
    }

    /// Low-sensitivity detector for the primary pass.
    pub fn primary_detector(&self) -> PeltDetector {
        PeltDetector::new(self.primary_penalty, self.min_segment, self.smoothing_window)
    }

    /// High-sensitivity detector for the quiet-season pass and the live
    /// query fallback.
    pub fn sensitive_detector(&self) -> PeltDetector {
        PeltDetector::new(self.sensitive_penalty, self.min_segment, self.smoothing_window)
    }
}
