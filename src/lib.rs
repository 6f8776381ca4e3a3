pub mod demo;
pub mod error;
pub mod export;
pub mod forecast;
pub mod ingest;
pub mod intervals;
pub mod normalize;
pub mod strength;
pub mod tables;

pub use error::AnalysisError;
pub use forecast::{Forecast, ForecastConfig, PairForecast, RankedScore, ScoreGrid};
pub use intervals::GoalEvent;
pub use normalize::NormalizedTable;
pub use strength::StrengthEstimate;
pub use tables::{StatsTable, TeamPair, TeamRecord, TimeSeriesTable};
