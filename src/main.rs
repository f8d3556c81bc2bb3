pub mod pipeline;
pub mod query;
pub mod store;
pub mod streaks;

use {
    pipeline::{PipelineConfig, StreakPipeline},
    rusqlite::Connection,
    std::sync::Arc,
    store::{init_schema, SqliteStreakWriter, StatsReader},
};

#[tokio::main]
pub async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    dotenv::dotenv().ok();

    let config = PipelineConfig::from_env();

    log::info!("🚀 Starting streak detection batch");
    log::info!("📊 Configuration:");
    log::info!("   Database: {}", config.db_path);
    log::info!("   Min segment: {} games", config.min_segment);
    log::info!(
        "   Penalties: {} primary / {} sensitive",
        config.primary_penalty,
        config.sensitive_penalty
    );
    log::info!("   Smoothing window: {} games", config.smoothing_window);

    // Bootstrap our own tables; the upstream stat tables are ingested by a
    // separate collaborator and must already be in the file.
    let conn = Connection::open(&config.db_path)?;
    init_schema(&conn)?;
    let writer = Arc::new(SqliteStreakWriter::from_connection(conn));
    let reader = StatsReader::open(&config.db_path)?;

    let pipeline = StreakPipeline::new(reader, writer, config);

    let primary = pipeline.run_primary_pass().await?;
    log::info!(
        "✅ Primary tier: {} records ({}/{} player-seasons processed)",
        primary.records,
        primary.processed,
        primary.player_seasons
    );

    let sensitive = pipeline.run_sensitive_pass().await?;
    log::info!(
        "✅ Sensitive tier: {} records ({}/{} quiet seasons processed)",
        sensitive.records,
        sensitive.processed,
        sensitive.player_seasons
    );

    Ok(())
}
