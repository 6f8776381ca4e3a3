use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::forecast::Forecast;
use crate::normalize::NormalizedTable;
use crate::tables::TimeSeriesTable;

pub struct ExportReport {
    pub comparison_rows: usize,
    pub forecast_rows: usize,
    pub timeline_rows: usize,
}

/// Write the three analysis artifacts to an xlsx workbook: one sheet per
/// artifact plus a summary sheet with the headline numbers.
pub fn export_workbook(
    path: &Path,
    comparison: &NormalizedTable,
    forecast: &Forecast,
    timeline: &TimeSeriesTable,
) -> Result<ExportReport> {
    let summary_rows = summary_rows(forecast);
    let comparison_rows = comparison_rows(comparison);
    let forecast_rows = forecast_rows(forecast);
    let timeline_rows = timeline_rows(timeline);

    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Summary")?;
        write_rows(sheet, &summary_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Comparison")?;
        write_rows(sheet, &comparison_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Forecast")?;
        write_rows(sheet, &forecast_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Timeline")?;
        write_rows(sheet, &timeline_rows)?;
    }

    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;

    Ok(ExportReport {
        comparison_rows: comparison_rows.len().saturating_sub(1),
        forecast_rows: forecast_rows.len().saturating_sub(1),
        timeline_rows: timeline_rows.len().saturating_sub(1),
    })
}

fn summary_rows(forecast: &Forecast) -> Vec<Vec<String>> {
    let mut rows = vec![
        vec!["Home".to_string(), forecast.home_team.clone()],
        vec!["Away".to_string(), forecast.away_team.clone()],
        vec![
            "Expected Goals (Home)".to_string(),
            format!("{:.2}", forecast.lambda_home),
        ],
        vec![
            "Expected Goals (Away)".to_string(),
            format!("{:.2}", forecast.lambda_away),
        ],
        vec![
            "Generated".to_string(),
            Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        ],
    ];
    for (idx, outcome) in forecast.ranked.iter().enumerate() {
        rows.push(vec![
            format!("Scenario {}", idx + 1),
            format!(
                "{}-{} ({:.2}%)",
                outcome.home_goals,
                outcome.away_goals,
                outcome.probability * 100.0
            ),
        ]);
    }
    rows
}

fn comparison_rows(comparison: &NormalizedTable) -> Vec<Vec<String>> {
    let mut header = vec!["Team".to_string()];
    header.extend(comparison.attributes.iter().cloned());
    let mut rows = vec![header];
    for row in &comparison.rows {
        let mut cells = vec![row.team.clone()];
        cells.extend(row.values.iter().map(|v| format!("{v:.4}")));
        rows.push(cells);
    }
    rows
}

fn forecast_rows(forecast: &Forecast) -> Vec<Vec<String>> {
    let bound = forecast.grid.bound();
    let mut header = vec![format!("{} \\ {}", forecast.home_team, forecast.away_team)];
    header.extend((0..bound).map(|j| j.to_string()));
    let mut rows = vec![header];
    for (i, grid_row) in forecast.grid.rows().iter().enumerate() {
        let mut cells = vec![i.to_string()];
        cells.extend(grid_row.iter().map(|p| format!("{:.2}%", p * 100.0)));
        rows.push(cells);
    }
    rows
}

fn timeline_rows(timeline: &TimeSeriesTable) -> Vec<Vec<String>> {
    let mut rows = vec![vec![
        "Interval".to_string(),
        format!("{} Scored", timeline.teams.first),
        format!("{} Conceded", timeline.teams.first),
        format!("{} Scored", timeline.teams.second),
        format!("{} Conceded", timeline.teams.second),
    ]];
    for bucket in &timeline.buckets {
        rows.push(vec![
            bucket.interval.clone(),
            bucket.team1_scored.to_string(),
            bucket.team1_conceded.to_string(),
            bucket.team2_scored.to_string(),
            bucket.team2_conceded.to_string(),
        ]);
    }
    rows
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::{DEMO_AWAY, DEMO_HOME, demo_goal_events, demo_stats_table, demo_team_pair};
    use crate::forecast::{ForecastConfig, forecast};
    use crate::intervals::aggregate;
    use crate::normalize::normalize;
    use crate::tables::COMPARISON_ATTRIBUTES;

    #[test]
    fn row_shapes_match_their_artifacts() {
        let table = demo_stats_table();
        let comparison = normalize(&table, &COMPARISON_ATTRIBUTES).unwrap();
        let f = forecast(&table, DEMO_HOME, DEMO_AWAY, &ForecastConfig::default()).unwrap();
        let timeline = aggregate(&demo_goal_events(), &demo_team_pair()).unwrap();

        let rows = comparison_rows(&comparison);
        assert_eq!(rows.len(), table.len() + 1);
        assert_eq!(rows[0].len(), COMPARISON_ATTRIBUTES.len() + 1);

        let rows = forecast_rows(&f);
        assert_eq!(rows.len(), 7);
        assert_eq!(rows[1].len(), 7);

        let rows = timeline_rows(&timeline);
        assert_eq!(rows.len(), timeline.buckets.len() + 1);
    }
}
