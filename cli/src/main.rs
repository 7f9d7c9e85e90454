use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Local};
use clap::Parser;

use arklog_core::context::lookup;
use arklog_core::encounter::Session;
use arklog_core::encounter::entity::{Entity, EntityKind};
use arklog_core::game_data::class_name;
use arklog_core::{LogReader, load_tables, segment_lines};
use arklog_types::EncounterTables;

#[derive(Parser)]
#[command(version, about = "Extract encounter statistics from a combat telemetry log")]
struct Cli {
    /// Telemetry log file to parse
    path: PathBuf,

    /// Classification tables (TOML); built-in tables are used when omitted
    #[arg(short, long)]
    tables: Option<PathBuf>,

    /// Emit accepted encounters as JSON instead of a text summary
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), String> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let tables = match &cli.tables {
        Some(path) => load_tables(path).map_err(|e| e.to_string())?,
        None => EncounterTables::builtin(),
    };

    let reader = LogReader::open(&cli.path).map_err(|e| e.to_string())?;
    let result = segment_lines(reader.lines(), Arc::new(tables));

    tracing::info!(
        found = result.windows_found,
        parsed = result.windows_parsed,
        dropped = result.windows_dropped,
        "segmentation complete"
    );

    if cli.json {
        let out = serde_json::to_string_pretty(&result.encounters).map_err(|e| e.to_string())?;
        println!("{out}");
        return Ok(());
    }

    if result.encounters.is_empty() {
        println!(
            "no encounters found ({} windows scanned, {} dropped)",
            result.windows_found, result.windows_dropped
        );
        return Ok(());
    }

    for encounter in &result.encounters {
        print_encounter(encounter);
    }
    println!(
        "{} encounters ({} windows scanned, {} dropped)",
        result.windows_parsed, result.windows_found, result.windows_dropped
    );
    Ok(())
}

fn print_encounter(encounter: &Session) {
    let boss_name = encounter
        .primary_boss()
        .map(|boss| lookup(boss.name).to_string())
        .unwrap_or_else(|| "Unknown".to_string());

    let started = DateTime::from_timestamp_millis(encounter.first_packet)
        .map(|utc| {
            utc.with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
        })
        .unwrap_or_else(|| "-".to_string());

    println!(
        "== {boss_name} | {started} | {:.0}s | party DPS {:.0}",
        encounter.duration_secs(),
        encounter.damage_stats.dps
    );

    let mut players: Vec<&Entity> = encounter
        .entities()
        .filter(|e| e.kind == EntityKind::Player)
        .collect();
    players.sort_by(|a, b| b.stats.damage_dealt.cmp(&a.stats.damage_dealt));

    for player in players {
        println!(
            "  {:<16} {:<14} dmg {:>12}  dps {:>10.0}  crit {:>5.1}%  back {:>5.1}%  front {:>5.1}%  deaths {}",
            lookup(player.name),
            class_name(player.class_id),
            player.stats.damage_dealt,
            player.stats.dps,
            player.stats.crit_rate(),
            player.stats.back_attack_rate(),
            player.stats.front_attack_rate(),
            player.stats.deaths,
        );
    }
    println!();
}
