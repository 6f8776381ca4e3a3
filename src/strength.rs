use crate::error::{AnalysisError, Result};
use crate::tables::StatsTable;

/// Per-team scoring and conceding rates relative to the league average.
/// 1.0 is league average on both axes. Recomputed per forecast call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrengthEstimate {
    pub attack: f64,
    pub defense: f64,
}

/// League-wide goals-per-match baseline: mean goals scored over mean
/// matches played across every row in the table.
pub fn league_average_goal_rate(table: &StatsTable) -> Result<f64> {
    if table.is_empty() {
        return Err(AnalysisError::EmptyTable);
    }

    let n = table.len() as f64;
    let mean_goals: f64 = table
        .records()
        .iter()
        .map(|r| r.goals_scored as f64)
        .sum::<f64>()
        / n;
    let mean_matches: f64 = table
        .records()
        .iter()
        .map(|r| r.matches_played as f64)
        .sum::<f64>()
        / n;

    if mean_matches == 0.0 {
        return Err(AnalysisError::DivisionByZero {
            what: "league mean matches played".to_string(),
        });
    }

    Ok(mean_goals / mean_matches)
}

/// Attack and defense strength for one team against the league baseline.
///
/// `league_avg_rate` must be non-zero; callers obtain it from
/// [`league_average_goal_rate`] first, which already rejects the degenerate
/// table, so it is not re-validated here.
pub fn team_strength(
    table: &StatsTable,
    team: &str,
    league_avg_rate: f64,
) -> Result<StrengthEstimate> {
    let record = table.get(team)?;
    if record.matches_played == 0 {
        return Err(AnalysisError::DivisionByZero {
            what: format!("matches played for team {:?}", record.team),
        });
    }

    let matches = record.matches_played as f64;
    Ok(StrengthEstimate {
        attack: (record.goals_scored as f64 / matches) / league_avg_rate,
        defense: (record.goals_conceded as f64 / matches) / league_avg_rate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::TeamRecord;

    fn record(team: &str, matches: u32, scored: u32, conceded: u32) -> TeamRecord {
        TeamRecord {
            team: team.to_string(),
            matches_played: matches,
            goals_scored: scored,
            goals_conceded: conceded,
            xg_total: 0.0,
            possession_percentage: 0.0,
            pass_accuracy: 0.0,
            shots_on_target_per_match: 0.0,
            passes_total: 0.0,
        }
    }

    #[test]
    fn league_rate_is_mean_goals_over_mean_matches() {
        let table =
            StatsTable::from_records(vec![record("FB", 20, 36, 27), record("GS", 20, 24, 33)])
                .unwrap();
        let rate = league_average_goal_rate(&table).unwrap();
        assert!((rate - 1.5).abs() < 1e-12);
    }

    #[test]
    fn empty_table_is_rejected() {
        let table = StatsTable::from_records(Vec::new()).unwrap();
        assert_eq!(
            league_average_goal_rate(&table).unwrap_err(),
            AnalysisError::EmptyTable
        );
    }

    #[test]
    fn all_zero_matches_reports_division_by_zero() {
        let table =
            StatsTable::from_records(vec![record("FB", 0, 0, 0), record("GS", 0, 0, 0)]).unwrap();
        let err = league_average_goal_rate(&table).unwrap_err();
        assert!(matches!(err, AnalysisError::DivisionByZero { .. }));
    }

    #[test]
    fn average_team_has_unit_attack() {
        // FB scores at exactly the league rate: 30 goals in 20 matches vs 1.5.
        let table =
            StatsTable::from_records(vec![record("FB", 20, 30, 20), record("GS", 20, 30, 40)])
                .unwrap();
        let rate = league_average_goal_rate(&table).unwrap();
        let s = team_strength(&table, "FB", rate).unwrap();
        assert!((s.attack - 1.0).abs() < 1e-12);
    }

    #[test]
    fn derby_strengths_match_hand_computation() {
        let table =
            StatsTable::from_records(vec![record("FB", 20, 36, 27), record("GS", 20, 24, 33)])
                .unwrap();
        let rate = league_average_goal_rate(&table).unwrap();
        let fb = team_strength(&table, "FB", rate).unwrap();
        let gs = team_strength(&table, "GS", rate).unwrap();
        assert!((fb.attack - 1.2).abs() < 1e-12);
        assert!((fb.defense - 0.9).abs() < 1e-12);
        assert!((gs.attack - 0.8).abs() < 1e-12);
        assert!((gs.defense - 1.1).abs() < 1e-12);
    }

    #[test]
    fn zero_match_team_is_reported_by_name() {
        let table =
            StatsTable::from_records(vec![record("FB", 0, 0, 0), record("GS", 20, 30, 30)])
                .unwrap();
        let err = team_strength(&table, "FB", 1.5).unwrap_err();
        match err {
            AnalysisError::DivisionByZero { what } => assert!(what.contains("FB")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_team_propagates_lookup_error() {
        let table = StatsTable::from_records(vec![record("FB", 20, 30, 30)]).unwrap();
        assert_eq!(
            team_strength(&table, "BJK", 1.5).unwrap_err(),
            AnalysisError::TeamNotFound {
                team: "BJK".to_string()
            }
        );
    }
}
