use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use serde::Serialize;

use derby_terminal::forecast::{Forecast, ForecastConfig, forecast};
use derby_terminal::ingest::{read_stats_csv, read_times_csv};
use derby_terminal::intervals::{GoalEvent, aggregate};
use derby_terminal::tables::{StatsTable, TeamPair, TeamRecord, TimeSeriesTable};

/// A self-contained forecast scenario: a stats table inline, the pairing to
/// forecast, optional knobs, and optional goal-timing rows.
#[derive(Debug, serde::Deserialize)]
struct ScenarioFile {
    records: Vec<TeamRecord>,
    home: String,
    away: String,
    #[serde(default)]
    goal_bound: Option<usize>,
    #[serde(default)]
    top_n: Option<usize>,
    #[serde(default)]
    events: Vec<GoalEvent>,
}

#[derive(Debug, Serialize)]
struct ReportPayload {
    forecast: Forecast,
    timeline: Option<TimeSeriesTable>,
}

// This binary is intentionally simple: it runs the pipeline once on a
// scenario file or a pair of CSVs and prints the result, for quick
// iteration without the full terminal UI.
fn main() -> Result<()> {
    let mut args: Vec<String> = std::env::args().skip(1).collect();

    let json_output = if let Some(pos) = args.iter().position(|a| a == "--json") {
        args.remove(pos);
        true
    } else {
        false
    };

    let (table, pair, config, events) = match args.as_slice() {
        [flag, path] if flag == "--scenario" => load_scenario(&PathBuf::from(path))?,
        [stats_path, times_path, rest @ ..] => {
            let table = read_stats_csv(&PathBuf::from(stats_path))?;
            let events = read_times_csv(&PathBuf::from(times_path))?;
            let pair = match rest {
                [] => default_pair(&table)?,
                [home, away] => TeamPair::new(home.clone(), away.clone()),
                _ => bail!("usage: report [--json] <stats.csv> <times.csv> [home away]"),
            };
            (table, pair, ForecastConfig::default(), events)
        }
        _ => bail!("usage: report [--json] --scenario <file.json> | <stats.csv> <times.csv> [home away]"),
    };

    let forecast = forecast(&table, &pair.first, &pair.second, &config)?;
    let timeline = if events.is_empty() {
        None
    } else {
        Some(aggregate(&events, &pair)?)
    };

    if json_output {
        let payload = ReportPayload { forecast, timeline };
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    print_report(&forecast, timeline.as_ref());
    Ok(())
}

fn load_scenario(path: &PathBuf) -> Result<(StatsTable, TeamPair, ForecastConfig, Vec<GoalEvent>)> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read scenario file {}", path.display()))?;
    let scenario: ScenarioFile = serde_json::from_str(&raw)
        .with_context(|| format!("parse scenario file {}", path.display()))?;

    let table = StatsTable::from_records(scenario.records)?;
    let pair = TeamPair::new(scenario.home, scenario.away);
    let defaults = ForecastConfig::default();
    let config = ForecastConfig {
        goal_bound: scenario.goal_bound.unwrap_or(defaults.goal_bound),
        top_n: scenario.top_n.unwrap_or(defaults.top_n),
    };
    Ok((table, pair, config, scenario.events))
}

fn default_pair(table: &StatsTable) -> Result<TeamPair> {
    let names = table.team_names();
    match names.as_slice() {
        [first, second, ..] => Ok(TeamPair::new(*first, *second)),
        _ => bail!("stats table needs at least two teams (got {})", names.len()),
    }
}

fn print_report(forecast: &Forecast, timeline: Option<&TimeSeriesTable>) {
    let bar = "=".repeat(50);
    println!("{bar}");
    println!(
        "MATCH FORECAST ({} vs {})",
        forecast.home_team, forecast.away_team
    );
    println!("{bar}");

    for (idx, outcome) in forecast.ranked.iter().enumerate() {
        println!(
            "{}. {} {} - {} {}  ({:.2}%)",
            idx + 1,
            forecast.home_team,
            outcome.home_goals,
            outcome.away_goals,
            forecast.away_team,
            outcome.probability * 100.0
        );
    }

    println!("{}", "-".repeat(50));
    println!(
        "Expected goals: {} {:.2} - {:.2} {}",
        forecast.home_team, forecast.lambda_home, forecast.lambda_away, forecast.away_team
    );
    println!(
        "Grid mass within {} goals: {:.1}%",
        forecast.grid.bound() - 1,
        forecast.grid.sum() * 100.0
    );
    println!("{bar}");

    let Some(timeline) = timeline else {
        return;
    };

    println!();
    println!(
        "{:<10} {:>10} {:>10} {:>10} {:>10}",
        "Interval",
        format!("{} GF", timeline.teams.first),
        format!("{} GA", timeline.teams.first),
        format!("{} GF", timeline.teams.second),
        format!("{} GA", timeline.teams.second),
    );
    for bucket in &timeline.buckets {
        println!(
            "{:<10} {:>10} {:>10} {:>10} {:>10}",
            bucket.interval,
            bucket.team1_scored,
            bucket.team1_conceded,
            bucket.team2_scored,
            bucket.team2_conceded
        );
    }
}
