//! Streak Report - Tier-Walk Lookup Tool
//!
//! Resolves one player-season against the precomputed streak tiers and
//! prints whichever tier answered: primary streaks, sensitive stretches,
//! a live recomputation, or nothing. Useful for spot-checking what a
//! downstream consumer of the streak tables would see.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release --bin streak_report -- --player judge --season 2024
//! cargo run --release --bin streak_report -- --player soto --season 2024 --label cold --json
//! ```
//!
//! ## Environment Variables
//!
//! - STREAKLINE_DB_PATH - SQLite database path (default: data/baseball_stats.db)
//! - STREAK_SENSITIVE_PENALTY - penalty for the live fallback (default: 1.5)
//! - STREAK_MIN_SEGMENT - minimum games per segment (default: 7)
//! - RUST_LOG - Logging level (optional, default: info)

use dotenv::dotenv;
use streakline::pipeline::PipelineConfig;
use streakline::query::{StreakAnswer, StreakResolver};
use streakline::store::{StatsReader, StreakRecord};
use streakline::streaks::{Performance, SegmentLine};

const USAGE: &str =
    "Usage: streak_report --player <name> --season <year> [--label hot|cold|average] [--json]";

struct ReportArgs {
    player: String,
    season: i64,
    label: Option<Performance>,
    json: bool,
}

impl ReportArgs {
    fn from_args() -> Result<Self, Box<dyn std::error::Error>> {
        let args: Vec<String> = std::env::args().collect();

        let player = args
            .windows(2)
            .find(|w| w[0] == "--player")
            .map(|w| w[1].clone())
            .ok_or(USAGE)?;

        let season = args
            .windows(2)
            .find(|w| w[0] == "--season")
            .map(|w| w[1].clone())
            .ok_or(USAGE)?
            .parse::<i64>()
            .map_err(|_| format!("Season must be a year. {}", USAGE))?;

        let label = match args.windows(2).find(|w| w[0] == "--label") {
            Some(w) => Some(Performance::parse(&w[1]).ok_or_else(|| {
                format!("Unknown label '{}': expected hot, cold, or average", w[1])
            })?),
            None => None,
        };

        let json = args.iter().any(|a| a == "--json");

        Ok(Self {
            player,
            season,
            label,
            json,
        })
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    dotenv().ok();

    let args = ReportArgs::from_args()?;
    let config = PipelineConfig::from_env();

    let reader = StatsReader::open(&config.db_path)?;
    let (player_id, name) = match reader.find_player(&args.player)? {
        Some(found) => found,
        None => {
            eprintln!("No player matching '{}'", args.player);
            std::process::exit(1);
        }
    };

    let resolver = StreakResolver::new(&reader, &config);
    let answer = resolver.resolve(&player_id, args.season, args.label)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&answer)?);
        return Ok(());
    }

    print_answer(&name, args.season, &answer);
    Ok(())
}

fn print_answer(name: &str, season: i64, answer: &StreakAnswer) {
    match answer {
        StreakAnswer::Primary {
            records,
            label_filter_dropped,
        } => {
            if *label_filter_dropped {
                println!(
                    "No segments with that label; all streaks for {} ({}):",
                    name, season
                );
            } else {
                println!("Streaks for {} ({}):", name, season);
            }
            for record in records {
                println!("  {}", record_line(record));
            }
        }
        StreakAnswer::Sensitive { records } => {
            println!(
                "No major shifts for {} ({}); subtler stretches:",
                name, season
            );
            if let Some(season_ops) = records.first().and_then(|r| r.season_ops) {
                println!("  Season OPS: {:.3}", season_ops);
            }
            for record in records {
                println!("  {}", record_line(record));
            }
        }
        StreakAnswer::Live { report } => {
            println!(
                "No precomputed streaks for {} ({}); live detection:",
                name, season
            );
            println!("  Season OPS: {:.3}", report.season_ops);
            println!("  Hottest: {}", stretch_line(&report.hottest));
            if let Some(coldest) = &report.coldest {
                println!("  Coldest: {}", stretch_line(coldest));
            }
        }
        StreakAnswer::NoData => {
            println!("No streak data for {} ({}).", name, season);
        }
    }
}

fn record_line(record: &StreakRecord) -> String {
    format!(
        "{} to {} ({} games) - {:.3}/{:.3}/{:.3} ({:.3} OPS), {} HR, {} H in {} AB [{}]",
        record.start_date,
        record.end_date,
        record.num_games,
        record.batting_avg,
        record.obp,
        record.slg,
        record.ops,
        record.home_runs,
        record.hits,
        record.at_bats,
        record.performance,
    )
}

fn stretch_line(segment: &SegmentLine) -> String {
    format!(
        "{} to {} ({} games) - {:.3}/{:.3}/{:.3} ({:.3} OPS), {} HR, {} H in {} AB",
        segment.start_date,
        segment.end_date,
        segment.num_games,
        segment.batting_avg,
        segment.obp,
        segment.slg,
        segment.ops,
        segment.home_runs,
        segment.hits,
        segment.at_bats,
    )
}
