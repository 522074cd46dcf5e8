//! Aggregate statistics over a finished run.

use std::time::Duration;

use serde::Serialize;

use crate::outcome::{RowOutcome, VerdictKind};

/// Estimated price of one token, in US dollars.
pub const COST_PER_TOKEN_USD: f64 = 0.000_000_15;

/// Score at or above which a suite is considered healthy.
pub const EXCELLENT_THRESHOLD: f64 = 80.0;
/// Score below which a suite is considered in critical shape.
pub const CRITICAL_THRESHOLD: f64 = 50.0;

/// Budget used for the "how many tests can I afford" projection.
pub const PROJECTION_BUDGET_USD: u64 = 10;
/// Suite size used for the "what would a full suite cost" projection.
pub const PROJECTION_SUITE_SIZE: u64 = 500;

/// Colour band of the quality score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    High,
    Medium,
    Low,
}

/// Advice printed under the statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    Critical,
    Moderate,
    Excellent,
}

impl Recommendation {
    pub fn headline(&self) -> &'static str {
        match self {
            Recommendation::Critical => "CRITICAL: Less than 50% of tests meet quality standards.",
            Recommendation::Moderate => "MODERATE: Test suite quality needs improvement.",
            Recommendation::Excellent => "EXCELLENT: Test suite quality is high!",
        }
    }

    pub fn action(&self) -> &'static str {
        match self {
            Recommendation::Critical => {
                "Action: Review 'Quality Issues Summary' sheet and prioritize fixes."
            }
            Recommendation::Moderate => "Action: Address issues in 'Quality Issues Summary' sheet.",
            Recommendation::Excellent => {
                "Action: Maintain quality standards and address remaining issues."
            }
        }
    }
}

/// Derived metrics over every outcome of a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunStatistics {
    pub total_tests: usize,
    pub good_tests: usize,
    pub issue_tests: usize,
    pub error_tests: usize,
    pub total_tokens: u64,
    pub elapsed: Duration,
}

impl RunStatistics {
    pub fn compute(outcomes: &[RowOutcome], elapsed: Duration) -> Self {
        let mut stats = Self {
            total_tests: outcomes.len(),
            good_tests: 0,
            issue_tests: 0,
            error_tests: 0,
            total_tokens: 0,
            elapsed,
        };

        for row in outcomes {
            match row.kind() {
                VerdictKind::Good => stats.good_tests += 1,
                VerdictKind::Error => stats.error_tests += 1,
                VerdictKind::Issue | VerdictKind::Other => stats.issue_tests += 1,
            }
            stats.total_tokens += u64::from(row.outcome.tokens_used);
        }

        stats
    }

    fn percent_of_total(&self, count: usize) -> f64 {
        if self.total_tests == 0 {
            0.0
        } else {
            count as f64 * 100.0 / self.total_tests as f64
        }
    }

    /// Share of tests judged `GOOD`, 0–100.
    pub fn quality_score(&self) -> f64 {
        self.percent_of_total(self.good_tests)
    }

    pub fn good_percent(&self) -> f64 {
        self.percent_of_total(self.good_tests)
    }

    pub fn issue_percent(&self) -> f64 {
        self.percent_of_total(self.issue_tests)
    }

    pub fn error_percent(&self) -> f64 {
        self.percent_of_total(self.error_tests)
    }

    /// Integer average, truncated.
    pub fn average_tokens(&self) -> u64 {
        if self.total_tests == 0 {
            0
        } else {
            self.total_tokens / self.total_tests as u64
        }
    }

    pub fn total_cost(&self) -> f64 {
        self.total_tokens as f64 * COST_PER_TOKEN_USD
    }

    pub fn average_cost(&self) -> f64 {
        if self.total_tests == 0 {
            0.0
        } else {
            self.total_cost() / self.total_tests as f64
        }
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }

    pub fn average_secs(&self) -> f64 {
        if self.total_tests == 0 {
            0.0
        } else {
            self.elapsed_secs() / self.total_tests as f64
        }
    }

    pub fn score_band(&self) -> ScoreBand {
        let score = self.quality_score();
        if score >= EXCELLENT_THRESHOLD {
            ScoreBand::High
        } else if score >= CRITICAL_THRESHOLD {
            ScoreBand::Medium
        } else {
            ScoreBand::Low
        }
    }

    pub fn recommendation(&self) -> Recommendation {
        let score = self.quality_score();
        if score < CRITICAL_THRESHOLD {
            Recommendation::Critical
        } else if score < EXCELLENT_THRESHOLD {
            Recommendation::Moderate
        } else {
            Recommendation::Excellent
        }
    }

    /// How many tests the projection budget would pay for at this run's
    /// average cost. Zero when nothing was spent.
    pub fn tests_per_budget(&self) -> u64 {
        let avg = self.average_cost();
        if avg <= 0.0 {
            return 0;
        }
        let per_dollar = (1.0 / avg) as u64;
        per_dollar * PROJECTION_BUDGET_USD
    }

    pub fn projected_suite_cost(&self) -> f64 {
        self.average_cost() * PROJECTION_SUITE_SIZE as f64
    }
}

/// Format an integer with `,` thousands separators.
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
