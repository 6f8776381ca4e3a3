use std::path::PathBuf;

use derby_terminal::forecast::{ForecastConfig, forecast};
use derby_terminal::ingest::{read_stats_csv, read_times_csv};
use derby_terminal::intervals::{STATUS_CONCEDED, STATUS_SCORED, aggregate};
use derby_terminal::tables::TeamPair;

fn fixture_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

#[test]
fn stats_fixture_parses_and_forecasts() {
    let table = read_stats_csv(&fixture_path("stats.csv")).expect("fixture should parse");
    assert_eq!(table.len(), 2);

    let fb = table.get("Fenerbahce").unwrap();
    assert_eq!(fb.matches_played, 20);
    assert_eq!(fb.goals_scored, 36);
    assert!((fb.possession_percentage - 58.2).abs() < 1e-12);

    let f = forecast(&table, "Fenerbahce", "Galatasaray", &ForecastConfig::default())
        .expect("fixture teams forecast");
    assert!((f.lambda_home - 1.98).abs() < 1e-12);
    assert!((f.lambda_away - 1.08).abs() < 1e-12);
}

#[test]
fn times_fixture_handles_bom_semicolons_and_labels() {
    let events = read_times_csv(&fixture_path("times.csv")).expect("fixture should parse");
    assert_eq!(events.len(), 7);

    // BOM sits on the first header cell; the interval column must still
    // resolve, and source labels must land in canonical vocabulary.
    assert_eq!(events[0].interval, "0-15");
    assert_eq!(events[0].status, STATUS_SCORED);
    assert_eq!(events[1].status, STATUS_CONCEDED);
}

#[test]
fn times_fixture_aggregates_in_source_order() {
    let events = read_times_csv(&fixture_path("times.csv")).unwrap();
    let pair = TeamPair::new("Fenerbahce", "Galatasaray");
    let table = aggregate(&events, &pair).unwrap();

    assert_eq!(
        table.interval_labels(),
        vec!["0-15", "16-30", "31-45", "76-90"]
    );

    let first = &table.buckets[0];
    assert_eq!(first.team1_scored, 2);
    assert_eq!(first.team2_conceded, 2);
    assert_eq!(first.team2_scored, 0);

    let last = &table.buckets[3];
    assert_eq!(last.team1_scored, 3);
    assert_eq!(last.team2_conceded, 3);
}
