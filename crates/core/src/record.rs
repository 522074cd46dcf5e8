use serde::{Deserialize, Serialize};

/// Placeholder used for text columns the author left blank.
pub const NOT_SPECIFIED: &str = "Not Specified";
/// Priority assumed when the priority column is blank.
pub const DEFAULT_PRIORITY: &str = "Medium";
/// Status assumed when the status column is blank.
pub const DEFAULT_STATUS: &str = "Not Run";

/// One manually authored test case, as read from a spreadsheet row.
///
/// Built once by the reader and never mutated afterwards. Every field is
/// plain text; blank cells are replaced by the placeholders above so the
/// prompt template never receives an empty substitution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCaseRecord {
    pub id: String,
    pub feature: String,
    pub scenario: String,
    pub priority: String,
    pub steps: String,
    pub expected_result: String,
    pub status: String,
}

impl TestCaseRecord {
    /// Build a record from raw, already-trimmed cell text.
    ///
    /// Returns `None` when the id is missing or blank: such a row is not a
    /// test case and must be skipped by the caller.
    pub fn from_cells(
        id: Option<String>,
        feature: Option<String>,
        scenario: Option<String>,
        priority: Option<String>,
        steps: Option<String>,
        expected_result: Option<String>,
        status: Option<String>,
    ) -> Option<Self> {
        let id = id.filter(|s| !s.trim().is_empty())?;
        Some(Self {
            id,
            feature: or_default(feature, NOT_SPECIFIED),
            scenario: or_default(scenario, NOT_SPECIFIED),
            priority: or_default(priority, DEFAULT_PRIORITY),
            steps: or_default(steps, NOT_SPECIFIED),
            expected_result: or_default(expected_result, NOT_SPECIFIED),
            status: or_default(status, DEFAULT_STATUS),
        })
    }
}

fn or_default(value: Option<String>, fallback: &str) -> String {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => fallback.to_string(),
    }
}

impl std::fmt::Display for TestCaseRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {} - {}", self.id, self.scenario, self.priority)
    }
}
