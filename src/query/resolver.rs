//! Tier-walking lookup of streak data for a player-season.

use crate::pipeline::config::PipelineConfig;
use crate::query::live::{self, StretchReport};
use crate::store::{StatsReader, StorageError, StreakRecord};
use crate::streaks::Performance;
use serde::Serialize;

/// What a streak lookup resolved to, tagged by the tier that answered.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum StreakAnswer {
    /// Primary records for a season with change points.
    Primary {
        records: Vec<StreakRecord>,
        /// True when the requested label matched nothing and the filter was
        /// dropped: the season has streaks, just not that kind.
        label_filter_dropped: bool,
    },
    /// Precomputed sensitive records for a quiet season.
    Sensitive { records: Vec<StreakRecord> },
    /// Live recomputation output; nothing was persisted.
    Live { report: StretchReport },
    /// Below the minimum game threshold, or no qualifying segment anywhere.
    NoData,
}

/// Walks the precomputed tiers and falls back to live recomputation.
///
/// A lone whole-season primary segment is the no-change-points marker, not
/// a streak answer, so seasons with fewer than two primary records fall
/// through to the sensitive tiers whatever the label filter says.
pub struct StreakResolver<'a> {
    reader: &'a StatsReader,
    config: &'a PipelineConfig,
}

impl<'a> StreakResolver<'a> {
    pub fn new(reader: &'a StatsReader, config: &'a PipelineConfig) -> Self {
        Self { reader, config }
    }

    pub fn resolve(
        &self,
        player_id: &str,
        season: i64,
        label: Option<Performance>,
    ) -> Result<StreakAnswer, StorageError> {
        let primary = self.reader.primary_streaks(player_id, season)?;

        if primary.len() > 1 {
            if let Some(wanted) = label {
                let matching: Vec<StreakRecord> = primary
                    .iter()
                    .filter(|r| r.performance == wanted)
                    .cloned()
                    .collect();
                if !matching.is_empty() {
                    return Ok(StreakAnswer::Primary {
                        records: matching,
                        label_filter_dropped: false,
                    });
                }
                log::debug!(
                    "{} season {}: no {} segments, dropping label filter",
                    player_id,
                    season,
                    wanted
                );
                return Ok(StreakAnswer::Primary {
                    records: primary,
                    label_filter_dropped: true,
                });
            }
            return Ok(StreakAnswer::Primary {
                records: primary,
                label_filter_dropped: false,
            });
        }

        let sensitive = self.reader.sensitive_streaks(player_id, season)?;
        if !sensitive.is_empty() {
            return Ok(StreakAnswer::Sensitive { records: sensitive });
        }

        // Last tier with data: recompute with sensitive parameters on the
        // spot. Ordering errors have nowhere further to fall.
        let games = self.reader.game_lines(player_id, season)?;
        let detector = self.config.sensitive_detector();
        match live::find_best_worst_stretches(&games, &detector, self.config.sensitive_max_games) {
            Ok(Some(report)) => Ok(StreakAnswer::Live { report }),
            Ok(None) => Ok(StreakAnswer::NoData),
            Err(e) => {
                log::warn!("{} season {}: live recompute failed: {}", player_id, season, e);
                Ok(StreakAnswer::NoData)
            }
        }
    }
}
