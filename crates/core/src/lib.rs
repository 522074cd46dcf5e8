//! Core types shared by every casecheck crate.
//!
//! Nothing here touches the filesystem or the network.

pub mod outcome;
pub mod record;
pub mod stats;

pub use outcome::{AnalysisOutcome, RowOutcome, VerdictKind};
pub use record::TestCaseRecord;
pub use stats::{
    group_thousands, Recommendation, RunStatistics, ScoreBand, COST_PER_TOKEN_USD,
    PROJECTION_BUDGET_USD, PROJECTION_SUITE_SIZE,
};
