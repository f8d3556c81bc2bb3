//! Relative performance labels.

use serde::Serialize;

/// Hot at 1.20x the baseline or better.
pub const HOT_RATIO: f64 = 1.20;
/// Cold at 0.80x the baseline or worse.
pub const COLD_RATIO: f64 = 0.80;

/// Performance label for a segment relative to a player's own baseline.
///
/// The band is player-relative, not an absolute OPS cutoff: a .700 stretch
/// is hot for a .550 hitter and cold for a .900 one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Performance {
    Hot,
    Cold,
    Average,
}

impl Performance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Performance::Hot => "hot",
            Performance::Cold => "cold",
            Performance::Average => "average",
        }
    }

    pub fn parse(value: &str) -> Option<Performance> {
        match value {
            "hot" => Some(Performance::Hot),
            "cold" => Some(Performance::Cold),
            "average" => Some(Performance::Average),
            _ => None,
        }
    }
}

impl std::fmt::Display for Performance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Labels a segment OPS against a baseline OPS.
///
/// Both inputs are unrounded. A baseline of zero cannot anchor a ratio and
/// labels as average without dividing.
pub fn classify(segment_ops: f64, baseline_ops: f64) -> Performance {
    if baseline_ops <= 0.0 {
        return Performance::Average;
    }
    let ratio = segment_ops / baseline_ops;
    if ratio >= HOT_RATIO {
        Performance::Hot
    } else if ratio <= COLD_RATIO {
        Performance::Cold
    } else {
        Performance::Average
    }
}
