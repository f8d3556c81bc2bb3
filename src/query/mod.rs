//! Query-Time Resolution - Tier Walk with Live Fallback
//!
//! ```text
//! (player, season, label?) → primary, label filtered
//!     ↓
//! primary, unfiltered
//!     ↓
//! streaks_sensitive
//!     ↓
//! live recompute (sensitive parameters, not persisted)
//!     ↓
//! "no data"
//! ```
//!
//! Each arrow fires only when the tier above came back empty.

pub mod live;
pub mod resolver;

pub use live::{find_best_worst_stretches, StretchReport};
pub use resolver::{StreakAnswer, StreakResolver};
