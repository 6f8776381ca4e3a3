use thiserror::Error;

/// Failure taxonomy for the analysis core. Every variant names the offending
/// input so callers can report it without poking at internals. None of these
/// are transient; retrying with the same input fails the same way.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("stats table has no rows")]
    EmptyTable,

    #[error("team {team:?} not found in stats table")]
    TeamNotFound { team: String },

    #[error("team {team:?} appears more than once in stats table")]
    AmbiguousTeam { team: String },

    #[error("division by zero computing {what}")]
    DivisionByZero { what: String },

    #[error("attribute {attribute:?} not present in stats table")]
    InvalidAttribute { attribute: String },

    #[error("goal bound must be at least 1, got {bound}")]
    InvalidGoalBound { bound: usize },

    #[error("goal event references untracked team {team:?}")]
    UnknownTeam { team: String },

    #[error("goal event has unrecognized status {status:?}")]
    UnknownStatus { status: String },

    #[error("required column {column:?} missing from source data")]
    SchemaMismatch { column: String },
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
