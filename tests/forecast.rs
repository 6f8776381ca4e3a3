use derby_terminal::error::AnalysisError;
use derby_terminal::forecast::{ForecastConfig, forecast, forecast_all_pairs};
use derby_terminal::normalize::normalize;
use derby_terminal::strength::{league_average_goal_rate, team_strength};
use derby_terminal::tables::{COMPARISON_ATTRIBUTES, StatsTable, TeamRecord};

fn record(team: &str, matches: u32, scored: u32, conceded: u32) -> TeamRecord {
    TeamRecord {
        team: team.to_string(),
        matches_played: matches,
        goals_scored: scored,
        goals_conceded: conceded,
        xg_total: scored as f64 * 0.92,
        possession_percentage: 50.0,
        pass_accuracy: 82.0,
        shots_on_target_per_match: 4.5,
        passes_total: 8000.0,
    }
}

/// League average 1.5 goals per match; Fenerbahce attack 1.2 / defense 0.9,
/// Galatasaray attack 0.8 / defense 1.1.
fn derby_table() -> StatsTable {
    StatsTable::from_records(vec![
        record("Fenerbahce", 20, 36, 27),
        record("Galatasaray", 20, 24, 33),
    ])
    .unwrap()
}

#[test]
fn derby_forecast_end_to_end() {
    let table = derby_table();

    let rate = league_average_goal_rate(&table).unwrap();
    assert!((rate - 1.5).abs() < 1e-12);

    let fb = team_strength(&table, "Fenerbahce", rate).unwrap();
    let gs = team_strength(&table, "Galatasaray", rate).unwrap();
    assert!((fb.attack - 1.2).abs() < 1e-12);
    assert!((fb.defense - 0.9).abs() < 1e-12);
    assert!((gs.attack - 0.8).abs() < 1e-12);
    assert!((gs.defense - 1.1).abs() < 1e-12);

    let f = forecast(&table, "Fenerbahce", "Galatasaray", &ForecastConfig::default()).unwrap();
    assert!((f.lambda_home - 1.98).abs() < 1e-12);
    assert!((f.lambda_away - 1.08).abs() < 1e-12);

    // The forecast reproduces exactly from the lambdas via the PMF product.
    let top = f.ranked[0];
    assert_eq!((top.home_goals, top.away_goals), (1, 1));
    let expected = 1.98 * (-1.98_f64).exp() * 1.08 * (-1.08_f64).exp();
    assert!((top.probability - expected).abs() < 1e-12);
}

#[test]
fn grid_truncation_bounds() {
    let f = forecast(
        &derby_table(),
        "Fenerbahce",
        "Galatasaray",
        &ForecastConfig::default(),
    )
    .unwrap();
    let sum = f.grid.sum();
    assert!(sum < 1.0);
    assert!(sum > 0.9);
}

#[test]
fn ranked_outcomes_are_sorted_and_deterministic() {
    let config = ForecastConfig {
        goal_bound: 6,
        top_n: 36,
    };
    let f = forecast(&derby_table(), "Fenerbahce", "Galatasaray", &config).unwrap();
    assert_eq!(f.ranked.len(), 36);
    for pair in f.ranked.windows(2) {
        assert!(pair[0].probability >= pair[1].probability);
    }

    // Same inputs, same ranking, down to the last bit.
    let again = forecast(&derby_table(), "Fenerbahce", "Galatasaray", &config).unwrap();
    assert_eq!(f.ranked, again.ranked);
}

#[test]
fn minimum_grid_still_yields_three_outcomes() {
    let config = ForecastConfig {
        goal_bound: 2,
        top_n: 3,
    };
    let f = forecast(&derby_table(), "Fenerbahce", "Galatasaray", &config).unwrap();
    assert_eq!(f.ranked.len(), 3);
}

#[test]
fn error_paths_surface_typed_failures() {
    let empty = StatsTable::from_records(Vec::new()).unwrap();
    assert_eq!(
        forecast(&empty, "A", "B", &ForecastConfig::default()).unwrap_err(),
        AnalysisError::EmptyTable
    );

    let no_matches =
        StatsTable::from_records(vec![record("A", 0, 0, 0), record("B", 0, 0, 0)]).unwrap();
    assert!(matches!(
        forecast(&no_matches, "A", "B", &ForecastConfig::default()).unwrap_err(),
        AnalysisError::DivisionByZero { .. }
    ));

    assert!(matches!(
        forecast(&derby_table(), "Fenerbahce", "Besiktas", &ForecastConfig::default())
            .unwrap_err(),
        AnalysisError::TeamNotFound { .. }
    ));
}

#[test]
fn comparison_and_forecast_share_one_table() {
    let table = derby_table();
    let comparison = normalize(&table, &COMPARISON_ATTRIBUTES).unwrap();
    let f = forecast(&table, "Fenerbahce", "Galatasaray", &ForecastConfig::default()).unwrap();

    // Fenerbahce leads every demo attribute, so it pins the top of each axis.
    let fb = comparison.row("Fenerbahce").unwrap();
    assert!(fb.values.iter().all(|v| *v == 1.0));
    assert!(f.lambda_home > f.lambda_away);
}

#[test]
fn batch_pairs_cover_every_ordered_matchup() {
    let table = StatsTable::from_records(vec![
        record("Fenerbahce", 20, 36, 27),
        record("Galatasaray", 20, 24, 33),
        record("Besiktas", 20, 30, 30),
    ])
    .unwrap();

    let pairs = forecast_all_pairs(&table, &ForecastConfig::default()).unwrap();
    assert_eq!(pairs.len(), 6);

    let direct = forecast(&table, "Fenerbahce", "Galatasaray", &ForecastConfig::default()).unwrap();
    let batch = pairs
        .iter()
        .find(|p| p.home_team == "Fenerbahce" && p.away_team == "Galatasaray")
        .unwrap();
    assert_eq!(batch.forecast.lambda_home, direct.lambda_home);
    assert_eq!(batch.forecast.ranked, direct.ranked);
}
