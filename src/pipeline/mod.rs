//! Batch Detection - Tiered Passes over Player-Seasons
//!
//! ```text
//! game_batting_logs → primary pass (penalty ~3.0) → streaks
//!     ↓
//! quiet seasons (exactly one primary segment)
//!     ↓
//! sensitive pass (penalty ~1.5) → streaks_sensitive
//! ```
//!
//! Both passes isolate failures per player-season and replace their tier's
//! table wholesale, so a rerun over unchanged inputs is a no-op.

pub mod config;
pub mod engine;

pub use config::PipelineConfig;
pub use engine::{PassSummary, StreakPipeline};
