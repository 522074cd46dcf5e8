use serde::{Deserialize, Serialize};

/// Verdict text the model returns for a test case that needs no changes.
pub const GOOD_VERDICT: &str = "GOOD";
/// Prefix of a verdict that describes a quality problem.
pub const ISSUE_PREFIX: &str = "Issue:";
/// Prefix of a verdict produced when analysis itself failed.
pub const ERROR_PREFIX: &str = "ERROR:";

/// How a verdict string is classified for styling and statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictKind {
    /// Exactly `GOOD`.
    Good,
    /// Starts with `Issue:`.
    Issue,
    /// Starts with `ERROR:`.
    Error,
    /// Free-form text the model returned without the agreed prefix.
    Other,
}

impl VerdictKind {
    pub fn classify(verdict: &str) -> Self {
        if verdict == GOOD_VERDICT {
            VerdictKind::Good
        } else if verdict.starts_with(ISSUE_PREFIX) {
            VerdictKind::Issue
        } else if verdict.starts_with(ERROR_PREFIX) {
            VerdictKind::Error
        } else {
            VerdictKind::Other
        }
    }

    /// Whether the verdict counts as a quality issue.
    ///
    /// Free-form verdicts are counted as issues: anything that is neither
    /// `GOOD` nor a failed analysis needs a human to look at it.
    pub fn is_issue(&self) -> bool {
        matches!(self, VerdictKind::Issue | VerdictKind::Other)
    }
}

/// The result of analyzing exactly one test case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisOutcome {
    pub verdict: String,
    pub tokens_used: u32,
}

impl AnalysisOutcome {
    pub fn new(verdict: impl Into<String>, tokens_used: u32) -> Self {
        Self { verdict: verdict.into(), tokens_used }
    }

    /// A terminal failure. The verdict is always `ERROR: <message>` and no
    /// tokens are attributed to it.
    pub fn error(message: impl std::fmt::Display) -> Self {
        Self {
            verdict: format!("{} {}", ERROR_PREFIX, message),
            tokens_used: 0,
        }
    }

    pub fn kind(&self) -> VerdictKind {
        VerdictKind::classify(&self.verdict)
    }
}

/// An outcome tied to the spreadsheet row and test id it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowOutcome {
    /// 1-based spreadsheet row number.
    pub row: u32,
    pub test_id: String,
    pub outcome: AnalysisOutcome,
}

impl RowOutcome {
    pub fn kind(&self) -> VerdictKind {
        self.outcome.kind()
    }

    /// Issue text as shown in the summary sheet: the verdict with its
    /// leading `Issue: ` marker removed.
    pub fn issue_text(&self) -> &str {
        let verdict = self.outcome.verdict.as_str();
        verdict
            .strip_prefix(ISSUE_PREFIX)
            .map(str::trim_start)
            .unwrap_or(verdict)
    }
}
