//! Streak Math - Signal, Detection, Aggregation, Labels
//!
//! Everything between a player-season's raw game logs and its labeled
//! streak segments, storage-free and deterministic.
//!
//! # Flow
//!
//! ```text
//! Vec<GameLine> → build_ops_signal → Vec<f64>
//!     ↓
//! centered_moving_average (width 5, zero padded)
//!     ↓
//! PeltDetector (L2 cost, penalty, min segment) → segment ends
//!     ↓
//! aggregate_segment (raw games, never smoothed) → SegmentLine
//!     ↓
//! classify (OPS vs baseline) → hot | cold | average
//! ```

pub mod classify;
pub mod cost;
pub mod pelt;
pub mod segment;
pub mod signal;
pub mod smoothing;

pub use classify::{classify, Performance, COLD_RATIO, HOT_RATIO};
pub use cost::L2Cost;
pub use pelt::PeltDetector;
pub use segment::{aggregate_segment, round3, SegmentLine};
pub use signal::{build_ops_signal, game_ops, signal_mean, GameLine, OrderingError};
pub use smoothing::centered_moving_average;
