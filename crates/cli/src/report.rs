//! End-of-run console summary.

use std::path::Path;

use casecheck_core::{group_thousands, RunStatistics};

const RULE: &str = "===============================================";

/// Summary block printed after the summary sheets are written.
pub fn render_summary(stats: &RunStatistics, output: &Path) -> String {
    let mut lines = vec![
        RULE.to_string(),
        "ANALYSIS SUMMARY".to_string(),
        RULE.to_string(),
        format!("Tests analyzed: {}", stats.total_tests),
        format!("Good tests: {} ({:.0}%)", stats.good_tests, stats.good_percent()),
        format!("Tests with issues: {} ({:.0}%)", stats.issue_tests, stats.issue_percent()),
    ];
    if stats.error_tests > 0 {
        lines.push(format!(
            "Analysis errors: {} ({:.0}%)",
            stats.error_tests,
            stats.error_percent()
        ));
    }
    lines.push(String::new());
    lines.push(format!("Total tokens: {}", group_thousands(stats.total_tokens)));
    lines.push(format!("Total cost: ${:.6}", stats.total_cost()));
    lines.push(format!("Avg tokens/test: {}", stats.average_tokens()));
    lines.push(format!("Time: {:.1} seconds", stats.elapsed_secs()));
    lines.push(String::new());

    let file_name = output
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    lines.push(format!("Output: {}", file_name));
    if let Some(dir) = output.parent() {
        lines.push(format!("   Location: {}", dir.display()));
    }
    lines.push(RULE.to_string());

    lines.join("\n")
}
