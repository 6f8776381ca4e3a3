use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use once_cell::sync::Lazy;

use crate::error::AnalysisError;
use crate::intervals::{GoalEvent, STATUS_CONCEDED, STATUS_SCORED};
use crate::tables::{StatsTable, TeamRecord};

/// Source status labels (upper-cased) mapped onto the canonical vocabulary.
/// Labels missing from this map pass through untouched; the aggregator is
/// the single place that rejects them.
static STATUS_LABELS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("ATILAN", STATUS_SCORED),
        ("YENILEN", STATUS_CONCEDED),
        ("SCORED", STATUS_SCORED),
        ("CONCEDED", STATUS_CONCEDED),
    ])
});

pub fn read_stats_csv(path: &Path) -> Result<StatsTable> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read stats file {}", path.display()))?;
    parse_stats_csv(&raw).with_context(|| format!("parse stats file {}", path.display()))
}

pub fn read_times_csv(path: &Path) -> Result<Vec<GoalEvent>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read times file {}", path.display()))?;
    parse_times_csv(&raw).with_context(|| format!("parse times file {}", path.display()))
}

/// Parse the season stats table from CSV text.
///
/// The delimiter is sniffed from the header line, a UTF-8 BOM is tolerated,
/// and header cells match after trimming and upper-casing. A required
/// column that is still missing after that cleanup is a hard
/// `SchemaMismatch`; this boundary fails loudly rather than guessing.
pub fn parse_stats_csv(raw: &str) -> Result<StatsTable> {
    let mut lines = non_empty_lines(raw);
    let Some(header_line) = lines.next() else {
        bail!("stats data has no header line");
    };
    let delimiter = sniff_delimiter(header_line);
    let header = split_row(header_line, delimiter);

    let team = required_column(&header, &["TEAM"])?;
    let matches_played = required_column(&header, &["MATCHES_PLAYED", "MATCHES"])?;
    let goals_scored = required_column(&header, &["GOALS_SCORED"])?;
    let goals_conceded = required_column(&header, &["GOALS_CONCEDED"])?;
    let xg_total = required_column(&header, &["XG_TOTAL", "XG"])?;
    let possession = required_column(&header, &["POSSESSION_PERCENTAGE", "POSSESSION"])?;
    let pass_accuracy = required_column(&header, &["PASS_ACCURACY"])?;
    let sot_per_match =
        required_column(&header, &["SOT_PER_MATCH", "SHOTS_ON_TARGET_PER_MATCH"])?;
    let passes_total = required_column(&header, &["PASSES_TOTAL", "PASSES"])?;

    let mut records = Vec::new();
    for (row_idx, line) in lines.enumerate() {
        let cells = split_row(line, delimiter);
        if cells.len() != header.len() {
            bail!(
                "stats row {} has {} cells, expected {}",
                row_idx + 2,
                cells.len(),
                header.len()
            );
        }
        records.push(TeamRecord {
            team: cells[team].clone(),
            matches_played: parse_count(&cells[matches_played], row_idx, "matches played")?,
            goals_scored: parse_count(&cells[goals_scored], row_idx, "goals scored")?,
            goals_conceded: parse_count(&cells[goals_conceded], row_idx, "goals conceded")?,
            xg_total: parse_real(&cells[xg_total], row_idx, "xG total")?,
            possession_percentage: parse_real(&cells[possession], row_idx, "possession")?,
            pass_accuracy: parse_real(&cells[pass_accuracy], row_idx, "pass accuracy")?,
            shots_on_target_per_match: parse_real(&cells[sot_per_match], row_idx, "SoT per match")?,
            passes_total: parse_real(&cells[passes_total], row_idx, "passes total")?,
        });
    }

    Ok(StatsTable::from_records(records)?)
}

/// Parse raw goal-timing rows from CSV text.
///
/// Known status labels are canonicalized to scored/conceded; anything else
/// passes through for the aggregator to reject. Interval labels keep their
/// source order and spelling.
pub fn parse_times_csv(raw: &str) -> Result<Vec<GoalEvent>> {
    let mut lines = non_empty_lines(raw);
    let Some(header_line) = lines.next() else {
        bail!("times data has no header line");
    };
    let delimiter = sniff_delimiter(header_line);
    let header = split_row(header_line, delimiter);

    let interval = required_column(&header, &["DAKIKALAR", "TIME_INTERVAL", "INTERVAL"])?;
    let team = required_column(&header, &["TAKIM", "TEAM"])?;
    let status = required_column(&header, &["DURUM", "STATUS"])?;
    let goal_count = required_column(&header, &["GOL SAYISI", "GOAL_COUNT", "GOALS"])?;

    let mut events = Vec::new();
    for (row_idx, line) in lines.enumerate() {
        let cells = split_row(line, delimiter);
        if cells.len() != header.len() {
            bail!(
                "times row {} has {} cells, expected {}",
                row_idx + 2,
                cells.len(),
                header.len()
            );
        }
        events.push(GoalEvent {
            team: cells[team].clone(),
            status: canonical_status(&cells[status]),
            interval: cells[interval].clone(),
            goal_count: parse_count(&cells[goal_count], row_idx, "goal count")?,
        });
    }

    Ok(events)
}

fn canonical_status(raw: &str) -> String {
    let key = raw.trim().to_uppercase();
    match STATUS_LABELS.get(key.as_str()) {
        Some(canonical) => (*canonical).to_string(),
        None => raw.trim().to_string(),
    }
}

/// Pick the most frequent of `;`, `,`, tab in the header line. Semicolon
/// wins ties since the goal-timing exports use it.
fn sniff_delimiter(header_line: &str) -> char {
    let candidates = [';', ',', '\t'];
    let mut best = ';';
    let mut best_count = 0usize;
    for candidate in candidates {
        let count = header_line.matches(candidate).count();
        if count > best_count {
            best = candidate;
            best_count = count;
        }
    }
    best
}

fn non_empty_lines(raw: &str) -> impl Iterator<Item = &str> {
    raw.trim_start_matches('\u{feff}')
        .lines()
        .filter(|line| !line.trim().is_empty())
}

fn split_row(line: &str, delimiter: char) -> Vec<String> {
    line.split(delimiter)
        .map(|cell| cell.trim().to_string())
        .collect()
}

fn required_column(header: &[String], aliases: &[&str]) -> Result<usize> {
    for (idx, cell) in header.iter().enumerate() {
        let key = cell.to_uppercase();
        if aliases.iter().any(|alias| key == *alias) {
            return Ok(idx);
        }
    }
    Err(AnalysisError::SchemaMismatch {
        column: aliases[0].to_string(),
    }
    .into())
}

fn parse_count(raw: &str, row_idx: usize, what: &str) -> Result<u32> {
    clean_numeric(raw)
        .parse::<u32>()
        .with_context(|| format!("row {}: bad {what} value {raw:?}", row_idx + 2))
}

fn parse_real(raw: &str, row_idx: usize, what: &str) -> Result<f64> {
    clean_numeric(raw)
        .parse::<f64>()
        .with_context(|| format!("row {}: bad {what} value {raw:?}", row_idx + 2))
}

fn clean_numeric(raw: &str) -> String {
    raw.trim().trim_end_matches('%').trim().to_string()
}
