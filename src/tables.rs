use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};

/// One team's season aggregates plus the attribute set used for squad
/// comparison. Built once at ingestion and read-only afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamRecord {
    pub team: String,
    pub matches_played: u32,
    pub goals_scored: u32,
    pub goals_conceded: u32,
    pub xg_total: f64,
    pub possession_percentage: f64,
    pub pass_accuracy: f64,
    pub shots_on_target_per_match: f64,
    pub passes_total: f64,
}

/// Canonical comparison attribute names, in display order.
pub const COMPARISON_ATTRIBUTES: [&str; 6] = [
    "goals_scored",
    "xg_total",
    "possession_percentage",
    "pass_accuracy",
    "shots_on_target_per_match",
    "passes_total",
];

impl TeamRecord {
    /// Look up a comparison attribute by canonical name. Counting stats are
    /// exposed as floats so every attribute normalizes the same way.
    pub fn attribute(&self, name: &str) -> Option<f64> {
        match name {
            "goals_scored" => Some(self.goals_scored as f64),
            "goals_conceded" => Some(self.goals_conceded as f64),
            "matches_played" => Some(self.matches_played as f64),
            "xg_total" => Some(self.xg_total),
            "possession_percentage" => Some(self.possession_percentage),
            "pass_accuracy" => Some(self.pass_accuracy),
            "shots_on_target_per_match" => Some(self.shots_on_target_per_match),
            "passes_total" => Some(self.passes_total),
            _ => None,
        }
    }
}

/// Validated, ordered collection of per-team season records.
///
/// Construction enforces the unique-team invariant. Rows with
/// `matches_played == 0` are representable; the strength and forecast paths
/// fail with `DivisionByZero` when they touch one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsTable {
    records: Vec<TeamRecord>,
}

impl StatsTable {
    pub fn from_records(records: Vec<TeamRecord>) -> Result<Self> {
        let mut seen: HashSet<&str> = HashSet::new();
        for record in &records {
            if !seen.insert(record.team.as_str()) {
                return Err(AnalysisError::AmbiguousTeam {
                    team: record.team.clone(),
                });
            }
        }
        Ok(Self { records })
    }

    pub fn records(&self) -> &[TeamRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Unique-row lookup. The constructor guarantees uniqueness, but the
    /// lookup contract still reports a duplicate key as `AmbiguousTeam` so
    /// tables built through other paths fail the same way.
    pub fn get(&self, team: &str) -> Result<&TeamRecord> {
        let mut found: Option<&TeamRecord> = None;
        for record in &self.records {
            if record.team == team {
                if found.is_some() {
                    return Err(AnalysisError::AmbiguousTeam {
                        team: team.to_string(),
                    });
                }
                found = Some(record);
            }
        }
        found.ok_or_else(|| AnalysisError::TeamNotFound {
            team: team.to_string(),
        })
    }

    pub fn team_names(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.team.as_str()).collect()
    }
}

/// The two teams a timeline tracks. Order matters: `first` fills the
/// `team1_*` series, `second` the `team2_*` series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamPair {
    pub first: String,
    pub second: String,
}

impl TeamPair {
    pub fn new(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self {
            first: first.into(),
            second: second.into(),
        }
    }
}

/// Goals bucketed by one chronological interval label for both tracked
/// teams. Missing (team, status) combinations hold 0, not absence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntervalBucket {
    pub interval: String,
    pub team1_scored: u32,
    pub team1_conceded: u32,
    pub team2_scored: u32,
    pub team2_conceded: u32,
}

/// Goal counts per time interval for the tracked pair, ordered by interval
/// appearance in the source data. Interval labels are chronological
/// ("0-15", "16-30", ...) so insertion order is semantically load-bearing
/// and the table is never re-sorted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSeriesTable {
    pub teams: TeamPair,
    pub buckets: Vec<IntervalBucket>,
}

impl TimeSeriesTable {
    pub fn interval_labels(&self) -> Vec<&str> {
        self.buckets.iter().map(|b| b.interval.as_str()).collect()
    }
}
