//! Two-pass batch detection over every player-season.
//!
//! The primary pass runs low-sensitivity detection across all player-seasons
//! and labels against the precomputed season OPS. The sensitive pass then
//! re-examines the quiet seasons (single primary segment) with a lower
//! penalty, keeping only bounded-length segments labeled against the
//! signal's own mean. Each pass replaces its tier's table wholesale, so
//! reruns over unchanged inputs are idempotent.

use crate::pipeline::config::PipelineConfig;
use crate::store::{StatsReader, StorageError, StreakRecord, StreakWriter};
use crate::streaks::{self, OrderingError, PeltDetector};
use std::sync::Arc;

/// Outcome counts for one batch pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassSummary {
    /// Player-seasons examined
    pub player_seasons: usize,
    /// Player-seasons that went through detection
    pub processed: usize,
    /// Player-seasons below the minimum game count
    pub skipped: usize,
    /// Player-seasons dropped by ordering or storage failures
    pub failed: usize,
    /// Records handed to the writer
    pub records: usize,
}

// Per-player-season failure: logged and counted, never fatal to the run.
#[derive(Debug)]
enum PassError {
    Ordering(OrderingError),
    Storage(StorageError),
}

impl From<OrderingError> for PassError {
    fn from(err: OrderingError) -> Self {
        PassError::Ordering(err)
    }
}

impl From<StorageError> for PassError {
    fn from(err: StorageError) -> Self {
        PassError::Storage(err)
    }
}

impl std::fmt::Display for PassError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PassError::Ordering(e) => write!(f, "{}", e),
            PassError::Storage(e) => write!(f, "{}", e),
        }
    }
}

/// Runs the tiered detection passes with full-replace persistence.
pub struct StreakPipeline {
    reader: StatsReader,
    writer: Arc<dyn StreakWriter>,
    config: PipelineConfig,
}

impl StreakPipeline {
    pub fn new(reader: StatsReader, writer: Arc<dyn StreakWriter>, config: PipelineConfig) -> Self {
        Self {
            reader,
            writer,
            config,
        }
    }

    /// Primary pass over every player-season with enough games.
    ///
    /// Returns the pass summary; only the final full-replace write (or the
    /// player-season listing itself) can fail the whole pass.
    pub async fn run_primary_pass(&self) -> Result<PassSummary, StorageError> {
        let detector = self.config.primary_detector();
        let player_seasons = self.reader.player_seasons()?;
        log::info!(
            "Primary pass: {} player-seasons (penalty {})",
            player_seasons.len(),
            detector.penalty()
        );

        let mut summary = PassSummary {
            player_seasons: player_seasons.len(),
            ..PassSummary::default()
        };
        let mut records = Vec::new();

        for (i, (player_id, season)) in player_seasons.iter().enumerate() {
            match self.detect_primary(&detector, player_id, *season) {
                Ok(Some(rows)) => {
                    summary.processed += 1;
                    summary.records += rows.len();
                    records.extend(rows);
                }
                Ok(None) => summary.skipped += 1,
                Err(e) => {
                    summary.failed += 1;
                    log::warn!("skipping {} season {}: {}", player_id, season, e);
                }
            }
            if (i + 1) % 100 == 0 {
                log::info!("  {}/{} player-seasons", i + 1, player_seasons.len());
            }
        }

        self.writer.replace_primary(&records).await?;
        log::info!(
            "Primary pass complete: {} records from {} seasons ({} skipped, {} failed)",
            summary.records,
            summary.processed,
            summary.skipped,
            summary.failed
        );
        Ok(summary)
    }

    /// Sensitive pass over the quiet seasons the primary pass left as one
    /// whole-season segment.
    pub async fn run_sensitive_pass(&self) -> Result<PassSummary, StorageError> {
        let detector = self.config.sensitive_detector();
        let quiet_seasons = self.reader.single_segment_seasons()?;
        log::info!(
            "Sensitive pass: {} quiet seasons (penalty {})",
            quiet_seasons.len(),
            detector.penalty()
        );

        let mut summary = PassSummary {
            player_seasons: quiet_seasons.len(),
            ..PassSummary::default()
        };
        let mut records = Vec::new();

        for (i, (player_id, season)) in quiet_seasons.iter().enumerate() {
            match self.detect_sensitive(&detector, player_id, *season) {
                Ok(Some(rows)) => {
                    summary.processed += 1;
                    summary.records += rows.len();
                    records.extend(rows);
                }
                Ok(None) => summary.skipped += 1,
                Err(e) => {
                    summary.failed += 1;
                    log::warn!("skipping {} season {}: {}", player_id, season, e);
                }
            }
            if (i + 1) % 100 == 0 {
                log::info!("  {}/{} quiet seasons", i + 1, quiet_seasons.len());
            }
        }

        self.writer.replace_sensitive(&records).await?;
        log::info!(
            "Sensitive pass complete: {} records from {} seasons ({} skipped, {} failed)",
            summary.records,
            summary.processed,
            summary.skipped,
            summary.failed
        );
        Ok(summary)
    }

    fn detect_primary(
        &self,
        detector: &PeltDetector,
        player_id: &str,
        season: i64,
    ) -> Result<Option<Vec<StreakRecord>>, PassError> {
        let games = self.reader.game_lines(player_id, season)?;
        if games.len() < detector.min_segment() * 2 {
            return Ok(None);
        }

        let signal = streaks::build_ops_signal(&games)?;
        // Label against the precomputed season rate stat; the per-game mean
        // only stands in when the season row is missing.
        let baseline = match self.reader.season_ops(player_id, season)? {
            Some(ops) => ops,
            None => {
                log::debug!("{} season {}: no season stats row, using signal mean", player_id, season);
                streaks::signal_mean(&signal)
            }
        };

        let mut records = Vec::new();
        let mut start = 0usize;
        for end in detector.detect(&signal) {
            let line = streaks::aggregate_segment(&games, start, end);
            let label = streaks::classify(line.ops, baseline);
            records.push(StreakRecord::from_segment(player_id, season, &line, label));
            start = end;
        }
        Ok(Some(records))
    }

    fn detect_sensitive(
        &self,
        detector: &PeltDetector,
        player_id: &str,
        season: i64,
    ) -> Result<Option<Vec<StreakRecord>>, PassError> {
        let games = self.reader.game_lines(player_id, season)?;
        if games.len() < detector.min_segment() * 2 {
            return Ok(None);
        }

        let signal = streaks::build_ops_signal(&games)?;
        let season_ops = streaks::signal_mean(&signal);

        // Only bounded stretches are worth surfacing here: a whole-season
        // segment is exactly what the primary tier already said.
        let mut records = Vec::new();
        let mut start = 0usize;
        for end in detector.detect(&signal) {
            let num_games = end - start;
            if num_games >= detector.min_segment() && num_games <= self.config.sensitive_max_games {
                let line = streaks::aggregate_segment(&games, start, end);
                let label = streaks::classify(line.ops, season_ops);
                records.push(
                    StreakRecord::from_segment(player_id, season, &line, label)
                        .with_season_ops(season_ops),
                );
            }
            start = end;
        }
        Ok(Some(records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{init_schema, SqliteStreakWriter};
    use crate::streaks::Performance;
    use chrono::{Days, NaiveDate};
    use rusqlite::{params, Connection};
    use tempfile::NamedTempFile;

    fn create_test_db() -> (NamedTempFile, Connection) {
        let db_file = NamedTempFile::new().unwrap();
        let conn = Connection::open(db_file.path()).unwrap();
        conn.execute_batch(
            "CREATE TABLE players (
                player_id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                team TEXT,
                positions TEXT
            );
            CREATE TABLE season_batting_stats (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                player_id TEXT NOT NULL,
                season INTEGER NOT NULL,
                team TEXT,
                plate_appearances INTEGER,
                ops REAL,
                UNIQUE(player_id, season, team)
            );
            CREATE TABLE game_batting_logs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                player_id TEXT NOT NULL,
                season INTEGER NOT NULL,
                date TEXT NOT NULL,
                opponent TEXT,
                plate_appearances INTEGER,
                at_bats INTEGER,
                hits INTEGER,
                doubles INTEGER,
                triples INTEGER,
                home_runs INTEGER,
                walks INTEGER,
                strikeouts INTEGER,
                UNIQUE(player_id, season, date)
            );
            INSERT INTO players (player_id, name, team, positions) VALUES
                ('streaky', 'Streaky Bat', 'NYY', 'RF'),
                ('subtle', 'Subtle Bat', 'NYY', 'RF'),
                ('loud', 'Loud Bat', 'NYY', 'RF'),
                ('steady', 'Steady Bat', 'NYY', 'RF'),
                ('healthy', 'Healthy Bat', 'NYY', 'RF'),
                ('corrupt', 'Corrupt Bat', 'NYY', 'RF'),
                ('cup_of_coffee', 'September Cup', 'NYY', 'RF');",
        )
        .unwrap();
        init_schema(&conn).unwrap();
        (db_file, conn)
    }

    fn make_pipeline(db_file: &NamedTempFile, config: PipelineConfig) -> StreakPipeline {
        let path = db_file.path().to_str().unwrap();
        let reader = StatsReader::open(path).unwrap();
        let writer = Arc::new(SqliteStreakWriter::new(path).unwrap());
        StreakPipeline::new(reader, writer, config)
    }

    // Uniform 4 PA / 4 AB games; per-game OPS follows from the hit shape:
    // (1, 0, 0) -> 0.500, (2, 1, 0) -> 1.250, (2, 0, 1) -> 1.750.
    fn seed_uniform_games(
        conn: &Connection,
        player_id: &str,
        season: i64,
        start: &str,
        count: usize,
        hits: i64,
        doubles: i64,
        home_runs: i64,
    ) {
        let first = NaiveDate::parse_from_str(start, "%Y-%m-%d").unwrap();
        for i in 0..count {
            let date = first + Days::new(i as u64);
            conn.execute(
                "INSERT INTO game_batting_logs
                 (player_id, season, date, plate_appearances, at_bats, hits,
                  doubles, triples, home_runs, walks, strikeouts)
                 VALUES (?1, ?2, ?3, 4, 4, ?4, ?5, 0, ?6, 0, 1)",
                params![player_id, season, date.to_string(), hits, doubles, home_runs],
            )
            .unwrap();
        }
    }

    #[tokio::test]
    async fn test_primary_pass_splits_and_labels_a_streaky_season() {
        let (db_file, conn) = create_test_db();
        // Ten 0.500-OPS games then ten 1.750-OPS games; no season stats row,
        // so the baseline falls back to the signal mean (1.125).
        seed_uniform_games(&conn, "streaky", 2024, "2024-04-01", 10, 1, 0, 0);
        seed_uniform_games(&conn, "streaky", 2024, "2024-04-11", 10, 2, 0, 1);

        let pipeline = make_pipeline(&db_file, PipelineConfig::default());
        let summary = pipeline.run_primary_pass().await.unwrap();

        assert_eq!(summary.player_seasons, 1);
        assert_eq!(summary.processed, 1);
        assert_eq!(summary.records, 2);

        let records = pipeline.reader.primary_streaks("streaky", 2024).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].num_games, 10);
        assert_eq!(records[0].performance, Performance::Cold);
        assert_eq!(records[0].start_date.to_string(), "2024-04-01");
        assert_eq!(records[0].end_date.to_string(), "2024-04-10");
        assert_eq!(records[0].ops, 0.5);
        assert_eq!(records[1].num_games, 10);
        assert_eq!(records[1].performance, Performance::Hot);
        assert_eq!(records[1].start_date.to_string(), "2024-04-11");
        assert_eq!(records[1].ops, 1.75);
        // Primary tier carries no baseline.
        assert_eq!(records[0].season_ops, None);
    }

    #[tokio::test]
    async fn test_primary_pass_prefers_precomputed_season_ops() {
        let (db_file, conn) = create_test_db();
        seed_uniform_games(&conn, "streaky", 2024, "2024-04-01", 10, 1, 0, 0);
        seed_uniform_games(&conn, "streaky", 2024, "2024-04-11", 10, 2, 0, 1);
        // A 2.000 season OPS drags the hot stretch back inside the band:
        // 1.75 / 2.0 = 0.875 -> average.
        conn.execute(
            "INSERT INTO season_batting_stats (player_id, season, team, plate_appearances, ops)
             VALUES ('streaky', 2024, 'NYY', 600, 2.0)",
            [],
        )
        .unwrap();

        let pipeline = make_pipeline(&db_file, PipelineConfig::default());
        pipeline.run_primary_pass().await.unwrap();

        let records = pipeline.reader.primary_streaks("streaky", 2024).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].performance, Performance::Cold);
        assert_eq!(records[1].performance, Performance::Average);
    }

    #[tokio::test]
    async fn test_short_seasons_are_skipped_not_failed() {
        let (db_file, conn) = create_test_db();
        // 13 games < 2 * min_segment.
        seed_uniform_games(&conn, "cup_of_coffee", 2024, "2024-09-01", 13, 1, 0, 0);

        let pipeline = make_pipeline(&db_file, PipelineConfig::default());
        let summary = pipeline.run_primary_pass().await.unwrap();

        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.processed, 0);
        assert_eq!(summary.failed, 0);
        assert!(pipeline.reader.primary_streaks("cup_of_coffee", 2024).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_uniform_season_is_one_average_segment() {
        let (db_file, conn) = create_test_db();
        seed_uniform_games(&conn, "steady", 2024, "2024-04-01", 30, 1, 0, 0);

        let pipeline = make_pipeline(&db_file, PipelineConfig::default());
        pipeline.run_primary_pass().await.unwrap();

        let records = pipeline.reader.primary_streaks("steady", 2024).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].num_games, 30);
        assert_eq!(records[0].performance, Performance::Average);
    }

    #[tokio::test]
    async fn test_sensitive_pass_covers_only_quiet_seasons() {
        let (db_file, conn) = create_test_db();
        // 0.75 of OPS step: invisible at penalty 3.0, found at 1.5.
        seed_uniform_games(&conn, "subtle", 2024, "2024-04-01", 10, 1, 0, 0);
        seed_uniform_games(&conn, "subtle", 2024, "2024-04-11", 10, 2, 1, 0);
        // A loud season that the primary pass already splits.
        seed_uniform_games(&conn, "loud", 2024, "2024-04-01", 10, 1, 0, 0);
        seed_uniform_games(&conn, "loud", 2024, "2024-04-11", 10, 2, 0, 1);

        let pipeline = make_pipeline(&db_file, PipelineConfig::default());
        pipeline.run_primary_pass().await.unwrap();

        // Primary: subtle's season stays whole, loud's splits.
        assert_eq!(pipeline.reader.primary_streaks("subtle", 2024).unwrap().len(), 1);
        assert_eq!(pipeline.reader.primary_streaks("loud", 2024).unwrap().len(), 2);

        let summary = pipeline.run_sensitive_pass().await.unwrap();
        assert_eq!(summary.player_seasons, 1, "only the quiet season re-runs");

        let sensitive = pipeline.reader.sensitive_streaks("subtle", 2024).unwrap();
        assert_eq!(sensitive.len(), 2);
        assert_eq!(sensitive[0].performance, Performance::Cold);
        assert_eq!(sensitive[1].performance, Performance::Hot);
        // Signal mean of ten 0.5s and ten 1.25s.
        assert_eq!(sensitive[0].season_ops, Some(0.875));
        assert!(pipeline.reader.sensitive_streaks("loud", 2024).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_passes_are_idempotent() {
        let (db_file, conn) = create_test_db();
        seed_uniform_games(&conn, "streaky", 2024, "2024-04-01", 10, 1, 0, 0);
        seed_uniform_games(&conn, "streaky", 2024, "2024-04-11", 10, 2, 0, 1);
        seed_uniform_games(&conn, "subtle", 2023, "2023-04-01", 10, 1, 0, 0);
        seed_uniform_games(&conn, "subtle", 2023, "2023-04-11", 10, 2, 1, 0);

        let pipeline = make_pipeline(&db_file, PipelineConfig::default());

        pipeline.run_primary_pass().await.unwrap();
        pipeline.run_sensitive_pass().await.unwrap();
        let primary_first = pipeline.reader.primary_streaks("streaky", 2024).unwrap();
        let sensitive_first = pipeline.reader.sensitive_streaks("subtle", 2023).unwrap();

        let second = pipeline.run_primary_pass().await.unwrap();
        pipeline.run_sensitive_pass().await.unwrap();

        assert_eq!(second.failed, 0);
        assert_eq!(
            pipeline.reader.primary_streaks("streaky", 2024).unwrap(),
            primary_first
        );
        assert_eq!(
            pipeline.reader.sensitive_streaks("subtle", 2023).unwrap(),
            sensitive_first
        );
    }

    #[tokio::test]
    async fn test_ordering_failure_isolates_the_player_season() {
        let (db_file, conn) = create_test_db();
        // Unpadded month: '2024-4-20' sorts after every padded May date as
        // TEXT but parses to April, so the built signal runs backwards.
        seed_uniform_games(&conn, "corrupt", 2024, "2024-05-01", 13, 1, 0, 0);
        conn.execute(
            "INSERT INTO game_batting_logs
             (player_id, season, date, plate_appearances, at_bats, hits,
              doubles, triples, home_runs, walks, strikeouts)
             VALUES ('corrupt', 2024, '2024-4-20', 4, 4, 1, 0, 0, 0, 0, 1)",
            [],
        )
        .unwrap();
        seed_uniform_games(&conn, "healthy", 2024, "2024-04-01", 30, 1, 0, 0);

        let pipeline = make_pipeline(&db_file, PipelineConfig::default());
        let summary = pipeline.run_primary_pass().await.unwrap();

        assert_eq!(summary.failed, 1);
        assert_eq!(summary.processed, 1);
        assert!(pipeline.reader.primary_streaks("corrupt", 2024).unwrap().is_empty());
        assert_eq!(pipeline.reader.primary_streaks("healthy", 2024).unwrap().len(), 1);
    }
}
