use crate::intervals::{GoalEvent, STATUS_CONCEDED, STATUS_SCORED};
use crate::tables::{StatsTable, TeamPair, TeamRecord};

pub const DEMO_HOME: &str = "Fenerbahce";
pub const DEMO_AWAY: &str = "Galatasaray";

/// Built-in season table so the UI has something to show when no stats file
/// is passed. The league-average row anchors the comparison axes.
pub fn demo_stats_table() -> StatsTable {
    let records = vec![
        TeamRecord {
            team: DEMO_HOME.to_string(),
            matches_played: 20,
            goals_scored: 36,
            goals_conceded: 27,
            xg_total: 34.1,
            possession_percentage: 58.2,
            pass_accuracy: 86.0,
            shots_on_target_per_match: 6.1,
            passes_total: 9120.0,
        },
        TeamRecord {
            team: DEMO_AWAY.to_string(),
            matches_played: 20,
            goals_scored: 24,
            goals_conceded: 33,
            xg_total: 26.8,
            possession_percentage: 55.4,
            pass_accuracy: 84.3,
            shots_on_target_per_match: 5.2,
            passes_total: 8740.0,
        },
        TeamRecord {
            team: "League_Average".to_string(),
            matches_played: 20,
            goals_scored: 30,
            goals_conceded: 30,
            xg_total: 28.5,
            possession_percentage: 50.0,
            pass_accuracy: 82.0,
            shots_on_target_per_match: 4.8,
            passes_total: 8100.0,
        },
    ];
    StatsTable::from_records(records).expect("demo teams are distinct")
}

pub fn demo_team_pair() -> TeamPair {
    TeamPair::new(DEMO_HOME, DEMO_AWAY)
}

/// Goal-timing rows across the six 15-minute windows, already in canonical
/// vocabulary.
pub fn demo_goal_events() -> Vec<GoalEvent> {
    let rows: [(&str, &str, &str, u32); 18] = [
        (DEMO_HOME, STATUS_SCORED, "0-15", 4),
        (DEMO_HOME, STATUS_CONCEDED, "0-15", 3),
        (DEMO_AWAY, STATUS_SCORED, "0-15", 3),
        (DEMO_AWAY, STATUS_CONCEDED, "0-15", 2),
        (DEMO_HOME, STATUS_SCORED, "16-30", 5),
        (DEMO_HOME, STATUS_CONCEDED, "16-30", 4),
        (DEMO_AWAY, STATUS_SCORED, "16-30", 2),
        (DEMO_AWAY, STATUS_CONCEDED, "16-30", 5),
        (DEMO_HOME, STATUS_SCORED, "31-45", 7),
        (DEMO_HOME, STATUS_CONCEDED, "31-45", 4),
        (DEMO_AWAY, STATUS_SCORED, "31-45", 4),
        (DEMO_AWAY, STATUS_CONCEDED, "31-45", 6),
        (DEMO_HOME, STATUS_SCORED, "46-60", 6),
        (DEMO_AWAY, STATUS_SCORED, "46-60", 5),
        (DEMO_HOME, STATUS_SCORED, "61-75", 6),
        (DEMO_AWAY, STATUS_CONCEDED, "61-75", 7),
        (DEMO_HOME, STATUS_SCORED, "76-90", 8),
        (DEMO_AWAY, STATUS_SCORED, "76-90", 6),
    ];
    rows.iter()
        .map(|(team, status, interval, goals)| GoalEvent {
            team: team.to_string(),
            status: status.to_string(),
            interval: interval.to_string(),
            goal_count: *goals,
        })
        .collect()
}
