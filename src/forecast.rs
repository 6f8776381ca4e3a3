use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};
use crate::strength::{league_average_goal_rate, team_strength};
use crate::tables::StatsTable;

/// Forecast tuning knobs. `goal_bound` is the exclusive per-team goal cap of
/// the scoreline grid; `top_n` is how many ranked outcomes are returned.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ForecastConfig {
    pub goal_bound: usize,
    pub top_n: usize,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            goal_bound: 6,
            top_n: 3,
        }
    }
}

/// Truncated joint scoreline probability grid, row-major over
/// `(home_goals, away_goals)` in `[0, goal_bound)`.
///
/// The grid cuts off the infinite Poisson support, so its total mass is
/// deliberately below 1. Nothing here renormalizes or folds the tail back
/// in; consumers that need the truncation error can read it off `sum()`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreGrid {
    cells: Vec<Vec<f64>>,
}

impl ScoreGrid {
    pub fn bound(&self) -> usize {
        self.cells.len()
    }

    pub fn get(&self, home_goals: usize, away_goals: usize) -> f64 {
        self.cells[home_goals][away_goals]
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.cells
    }

    pub fn sum(&self) -> f64 {
        self.cells.iter().flatten().sum()
    }
}

/// One scoreline with its modeled probability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankedScore {
    pub home_goals: usize,
    pub away_goals: usize,
    pub probability: f64,
}

/// Full forecast artifact for one pairing: expected goals per side, the
/// scoreline grid, and the top-N ranked outcomes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Forecast {
    pub home_team: String,
    pub away_team: String,
    pub lambda_home: f64,
    pub lambda_away: f64,
    pub grid: ScoreGrid,
    pub ranked: Vec<RankedScore>,
}

/// Poisson probabilities for 0..bound-1 events via the multiplicative
/// recurrence p(0) = e^-lambda, p(k) = p(k-1) * lambda / k.
fn poisson_pmf(lambda: f64, bound: usize) -> Vec<f64> {
    let mut out = Vec::with_capacity(bound);
    out.push((-lambda).exp());
    for k in 1..bound {
        let prev = out[k - 1];
        out.push(prev * lambda / k as f64);
    }
    out
}

/// Scoreline forecast for `home` vs `away` over the given stats table.
///
/// Expected goals follow the attack-vs-opponent-defense cross model: each
/// side's lambda is its own attack strength times the opponent's defense
/// strength times the league baseline. The grid multiplies the two marginal
/// PMFs, treating the sides' goal counts as independent (a modeling
/// assumption, not a derived fact).
pub fn forecast(
    table: &StatsTable,
    home: &str,
    away: &str,
    config: &ForecastConfig,
) -> Result<Forecast> {
    if config.goal_bound == 0 {
        return Err(AnalysisError::InvalidGoalBound {
            bound: config.goal_bound,
        });
    }

    let league_avg = league_average_goal_rate(table)?;
    let home_strength = team_strength(table, home, league_avg)?;
    let away_strength = team_strength(table, away, league_avg)?;

    let lambda_home = home_strength.attack * away_strength.defense * league_avg;
    let lambda_away = away_strength.attack * home_strength.defense * league_avg;

    let pmf_home = poisson_pmf(lambda_home, config.goal_bound);
    let pmf_away = poisson_pmf(lambda_away, config.goal_bound);

    let cells: Vec<Vec<f64>> = pmf_home
        .iter()
        .map(|p_i| pmf_away.iter().map(|p_j| p_i * p_j).collect())
        .collect();
    let grid = ScoreGrid { cells };

    let ranked = rank_outcomes(&grid, config.top_n);

    Ok(Forecast {
        home_team: home.to_string(),
        away_team: away.to_string(),
        lambda_home,
        lambda_away,
        grid,
        ranked,
    })
}

/// All grid outcomes by descending probability. Exact probability ties keep
/// row-major enumeration order (lower home goals first, then lower away
/// goals) so symmetric pairings rank deterministically.
fn rank_outcomes(grid: &ScoreGrid, top_n: usize) -> Vec<RankedScore> {
    let mut outcomes: Vec<RankedScore> = Vec::with_capacity(grid.bound() * grid.bound());
    for (i, row) in grid.rows().iter().enumerate() {
        for (j, p) in row.iter().enumerate() {
            outcomes.push(RankedScore {
                home_goals: i,
                away_goals: j,
                probability: *p,
            });
        }
    }
    outcomes.sort_by(|a, b| {
        b.probability
            .total_cmp(&a.probability)
            .then_with(|| (a.home_goals, a.away_goals).cmp(&(b.home_goals, b.away_goals)))
    });
    outcomes.truncate(top_n);
    outcomes
}

/// Forecast for one ordered pairing out of a batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairForecast {
    pub home_team: String,
    pub away_team: String,
    pub forecast: Forecast,
}

/// Forecast every ordered pairing of distinct teams in parallel.
///
/// Each call only reads the shared table and allocates fresh outputs, so the
/// pairings fan out over rayon with no coordination. Output order is the
/// table's row order (home-major), independent of scheduling.
pub fn forecast_all_pairs(table: &StatsTable, config: &ForecastConfig) -> Result<Vec<PairForecast>> {
    let names = table.team_names();
    let mut pairings: Vec<(&str, &str)> = Vec::new();
    for home in &names {
        for away in &names {
            if home != away {
                pairings.push((*home, *away));
            }
        }
    }

    pairings
        .par_iter()
        .map(|(home, away)| {
            let forecast = forecast(table, home, away, config)?;
            Ok(PairForecast {
                home_team: home.to_string(),
                away_team: away.to_string(),
                forecast,
            })
        })
        .collect()
}
