use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};
use crate::tables::{IntervalBucket, TeamPair, TimeSeriesTable};

/// Canonical status labels after ingestion mapping.
pub const STATUS_SCORED: &str = "scored";
pub const STATUS_CONCEDED: &str = "conceded";

/// One raw goal-timing row: `goal_count` goals for `team` with the given
/// status inside the labeled interval. Sources may emit one row per goal or
/// pre-aggregated counts per key; both shapes aggregate the same way.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalEvent {
    pub team: String,
    pub status: String,
    pub interval: String,
    pub goal_count: u32,
}

/// Reshape raw goal events into the fixed-interval table for the tracked
/// pair.
///
/// Buckets appear in first-seen interval order (interval labels are
/// chronological, so source order is meaningful). Duplicate
/// (team, status, interval) keys SUM into the same cell. Combinations with
/// no event stay 0. An event naming a team outside the pair or a status
/// outside scored/conceded aborts the whole aggregation; nothing is
/// silently dropped.
pub fn aggregate(events: &[GoalEvent], teams: &TeamPair) -> Result<TimeSeriesTable> {
    let mut buckets: Vec<IntervalBucket> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for event in events {
        let first = if event.team == teams.first {
            true
        } else if event.team == teams.second {
            false
        } else {
            return Err(AnalysisError::UnknownTeam {
                team: event.team.clone(),
            });
        };

        let scored = match event.status.as_str() {
            STATUS_SCORED => true,
            STATUS_CONCEDED => false,
            _ => {
                return Err(AnalysisError::UnknownStatus {
                    status: event.status.clone(),
                });
            }
        };

        let slot = match index.get(&event.interval) {
            Some(slot) => *slot,
            None => {
                index.insert(event.interval.clone(), buckets.len());
                buckets.push(IntervalBucket {
                    interval: event.interval.clone(),
                    team1_scored: 0,
                    team1_conceded: 0,
                    team2_scored: 0,
                    team2_conceded: 0,
                });
                buckets.len() - 1
            }
        };

        let bucket = &mut buckets[slot];
        let cell = match (first, scored) {
            (true, true) => &mut bucket.team1_scored,
            (true, false) => &mut bucket.team1_conceded,
            (false, true) => &mut bucket.team2_scored,
            (false, false) => &mut bucket.team2_conceded,
        };
        *cell += event.goal_count;
    }

    Ok(TimeSeriesTable {
        teams: teams.clone(),
        buckets,
    })
}
