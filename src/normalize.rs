use crate::error::{AnalysisError, Result};
use crate::tables::StatsTable;

/// One team's normalized attribute values, aligned index-for-index with the
/// attribute list of the owning [`NormalizedTable`].
#[derive(Debug, Clone)]
pub struct NormalizedRow {
    pub team: String,
    pub values: Vec<f64>,
}

/// Min-max normalized view of a stats table, ready for multi-axis display.
/// Row order matches the source table; the source is never mutated.
#[derive(Debug, Clone)]
pub struct NormalizedTable {
    pub attributes: Vec<String>,
    pub rows: Vec<NormalizedRow>,
}

impl NormalizedTable {
    pub fn row(&self, team: &str) -> Option<&NormalizedRow> {
        self.rows.iter().find(|r| r.team == team)
    }
}

/// Rescale each requested attribute to [0,1] across all rows independently.
///
/// When an attribute has zero range (single team, or all values equal) every
/// row maps to exactly 1.0. That is a policy, not an artifact: it reads as
/// "at baseline" and keeps the denominator away from zero.
pub fn normalize(table: &StatsTable, attributes: &[&str]) -> Result<NormalizedTable> {
    let mut columns: Vec<Vec<f64>> = Vec::with_capacity(attributes.len());
    for attribute in attributes {
        let mut column = Vec::with_capacity(table.len());
        for record in table.records() {
            let value = record
                .attribute(attribute)
                .ok_or_else(|| AnalysisError::InvalidAttribute {
                    attribute: attribute.to_string(),
                })?;
            column.push(value);
        }
        columns.push(column);
    }

    let mut rows: Vec<NormalizedRow> = table
        .records()
        .iter()
        .map(|r| NormalizedRow {
            team: r.team.clone(),
            values: Vec::with_capacity(attributes.len()),
        })
        .collect();

    for column in &columns {
        let min = column.iter().copied().fold(f64::INFINITY, f64::min);
        let max = column.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        for (row, value) in rows.iter_mut().zip(column) {
            let scaled = if max == min {
                1.0
            } else {
                (value - min) / (max - min)
            };
            row.values.push(scaled);
        }
    }

    Ok(NormalizedTable {
        attributes: attributes.iter().map(|a| a.to_string()).collect(),
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::TeamRecord;

    fn record(team: &str, goals: u32, possession: f64) -> TeamRecord {
        TeamRecord {
            team: team.to_string(),
            matches_played: 10,
            goals_scored: goals,
            goals_conceded: 9,
            xg_total: 12.0,
            possession_percentage: possession,
            pass_accuracy: 80.0,
            shots_on_target_per_match: 4.0,
            passes_total: 3000.0,
        }
    }

    fn table() -> StatsTable {
        StatsTable::from_records(vec![
            record("FB", 20, 58.0),
            record("GS", 14, 52.0),
            record("AVG", 11, 50.0),
        ])
        .unwrap()
    }

    #[test]
    fn extremes_map_to_unit_interval_bounds() {
        let out = normalize(&table(), &["goals_scored", "possession_percentage"]).unwrap();
        let fb = out.row("FB").unwrap();
        let avg = out.row("AVG").unwrap();
        assert_eq!(fb.values[0], 1.0);
        assert_eq!(avg.values[0], 0.0);
        assert_eq!(fb.values[1], 1.0);
        assert_eq!(avg.values[1], 0.0);
        for row in &out.rows {
            for v in &row.values {
                assert!((0.0..=1.0).contains(v));
            }
        }
    }

    #[test]
    fn interior_value_scales_linearly() {
        let out = normalize(&table(), &["goals_scored"]).unwrap();
        let gs = out.row("GS").unwrap();
        assert!((gs.values[0] - (14.0 - 11.0) / (20.0 - 11.0)).abs() < 1e-12);
    }

    #[test]
    fn zero_range_attribute_maps_to_one() {
        // pass_accuracy is identical across every row above.
        let out = normalize(&table(), &["pass_accuracy"]).unwrap();
        for row in &out.rows {
            assert_eq!(row.values[0], 1.0);
        }
    }

    #[test]
    fn single_team_table_maps_to_one() {
        let table = StatsTable::from_records(vec![record("FB", 20, 58.0)]).unwrap();
        let out = normalize(&table, &["goals_scored", "xg_total"]).unwrap();
        assert_eq!(out.rows[0].values, vec![1.0, 1.0]);
    }

    #[test]
    fn unknown_attribute_is_reported_by_name() {
        let err = normalize(&table(), &["corner_count"]).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::InvalidAttribute {
                attribute: "corner_count".to_string()
            }
        );
    }

    #[test]
    fn source_table_is_untouched() {
        let table = table();
        let before = table.records()[0].goals_scored;
        let _ = normalize(&table, &["goals_scored"]).unwrap();
        assert_eq!(table.records()[0].goals_scored, before);
    }
}
