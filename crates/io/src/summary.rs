//! Layout of the two derived sheets appended after a run.
//!
//! Both builders are pure: they turn outcomes or statistics into a fresh
//! [`Sheet`] and leave persistence to the writer.

use casecheck_core::{
    group_thousands, Recommendation, RowOutcome, RunStatistics, ScoreBand,
    PROJECTION_BUDGET_USD, PROJECTION_SUITE_SIZE,
};

use crate::workbook::{colors, Border, CellStyle, CellValue, HAlign, Sheet};

pub const ISSUES_SHEET_NAME: &str = "Quality Issues Summary";
pub const STATS_SHEET_NAME: &str = "Statistics Dashboard";

const DASHBOARD_TITLE: &str = "AI TEST SUITE ANALYZER - STATISTICS DASHBOARD";
const NEEDS_REVIEW: &str = "Needs Review";
const SECTION_FONT_SIZE: f64 = 14.0;
const TITLE_FONT_SIZE: f64 = 16.0;

/// One row per outcome flagged as an issue, then a total line.
///
/// GOOD and ERROR outcomes are left out. Anything else, including verdicts
/// that do not follow the `Issue:` convention, needs a human look.
pub fn issues_sheet(outcomes: &[RowOutcome]) -> Sheet {
    let mut sheet = Sheet::new(ISSUES_SHEET_NAME);

    let header = CellStyle {
        bold: true,
        fill: Some(colors::LIGHT_BLUE),
        border: Some(Border::Medium),
        ..Default::default()
    };
    for (col, title) in ["Test ID", "Issue Found", "Status"].into_iter().enumerate() {
        *sheet.set_value(0, col as u16, title) = header.clone();
    }

    let mut row = 1;
    for outcome in outcomes.iter().filter(|o| o.kind().is_issue()) {
        sheet.set_value(row, 0, outcome.test_id.as_str()).font_color = Some(colors::ORANGE);
        sheet.set_value(row, 1, outcome.issue_text()).wrap = true;
        sheet.set_value(row, 2, NEEDS_REVIEW);
        row += 1;
    }
    let issues = (row - 1) as usize;

    row += 1;
    sheet.set_value(row, 0, "TOTAL ISSUES:").bold = true;
    sheet.set_value(row, 1, issues);

    sheet.set_column_width(0, 15.0);
    sheet.set_column_width(1, 60.0);
    sheet.set_column_width(2, 15.0);
    sheet
}

/// Writes rows top to bottom, one section at a time.
struct Cursor {
    sheet: Sheet,
    row: u32,
}

impl Cursor {
    fn section(&mut self, title: &str) {
        *self.sheet.set_value(self.row, 0, title) = CellStyle {
            bold: true,
            font_size: Some(SECTION_FONT_SIZE),
            fill: Some(colors::LIGHT_GRAY),
            ..Default::default()
        };
        self.row += 1;
    }

    /// Label in column A, value in column B. Returns the value's style.
    fn metric(&mut self, label: &str, value: impl Into<CellValue>) -> &mut CellStyle {
        let row = self.row;
        self.row += 1;
        self.sheet.set_value(row, 0, label);
        self.sheet.set_value(row, 1, value)
    }

    fn line(&mut self, text: &str) -> &mut CellStyle {
        let row = self.row;
        self.row += 1;
        self.sheet.set_value(row, 0, text)
    }

    fn blank(&mut self) {
        self.row += 1;
    }
}

/// Free-form metrics layout: overview, breakdown, cost, advice, projection.
pub fn dashboard_sheet(stats: &RunStatistics) -> Sheet {
    let mut cursor = Cursor {
        sheet: Sheet::new(STATS_SHEET_NAME),
        row: 0,
    };

    *cursor.sheet.set_value(0, 0, DASHBOARD_TITLE) = CellStyle {
        bold: true,
        font_size: Some(TITLE_FONT_SIZE),
        font_color: Some(colors::WHITE),
        fill: Some(colors::DARK_BLUE),
        align: HAlign::Center,
        ..Default::default()
    };
    cursor.sheet.merge((0, 0), (0, 3));
    cursor.row = 2;

    cursor.section("QUALITY OVERVIEW");
    let score_color = match stats.score_band() {
        ScoreBand::High => colors::GREEN,
        ScoreBand::Medium => colors::ORANGE,
        ScoreBand::Low => colors::RED,
    };
    *cursor.metric("Overall Quality Score:", percent(stats.quality_score())) = CellStyle {
        bold: true,
        font_size: Some(12.0),
        font_color: Some(score_color),
        ..Default::default()
    };
    cursor.metric("Total Tests Analyzed:", stats.total_tests);
    cursor.blank();

    cursor.section("TEST BREAKDOWN");
    let header = CellStyle {
        bold: true,
        fill: Some(colors::LIGHT_BLUE),
        ..Default::default()
    };
    for (col, title) in ["Category", "Count", "Percentage"].into_iter().enumerate() {
        *cursor.sheet.set_value(cursor.row, col as u16, title) = header.clone();
    }
    cursor.row += 1;
    breakdown_row(&mut cursor, "Good Quality Tests", stats.good_tests, stats.good_percent(), colors::GREEN);
    breakdown_row(&mut cursor, "Tests with Issues", stats.issue_tests, stats.issue_percent(), colors::ORANGE);
    if stats.error_tests > 0 {
        breakdown_row(&mut cursor, "Analysis Errors", stats.error_tests, stats.error_percent(), colors::RED);
    }
    cursor.blank();

    cursor.section("COST & PERFORMANCE METRICS");
    cursor.metric("Total Tokens Used:", group_thousands(stats.total_tokens));
    cursor.metric("Average Tokens/Test:", stats.average_tokens());
    cursor.metric("Total Cost:", format!("${:.6}", stats.total_cost())).font_color = Some(colors::GREEN);
    cursor.metric("Average Cost/Test:", format!("${:.6}", stats.average_cost()));
    cursor.metric("Analysis Time:", format!("{:.1} seconds", stats.elapsed_secs()));
    cursor.metric("Average Time/Test:", format!("{:.2} seconds", stats.average_secs()));
    cursor.blank();

    cursor.section("RECOMMENDATIONS");
    let recommendation = stats.recommendation();
    cursor.line(recommendation.headline()).font_color = Some(match recommendation {
        Recommendation::Critical => colors::RED,
        Recommendation::Moderate => colors::ORANGE,
        Recommendation::Excellent => colors::GREEN,
    });
    cursor.line(&format!("   {}", recommendation.action()));
    cursor.blank();

    cursor.line("BUDGET PROJECTION").bold = true;
    cursor.metric(
        &format!("Tests you can analyze with ${}:", PROJECTION_BUDGET_USD),
        group_thousands(stats.tests_per_budget()),
    );
    cursor.metric(
        &format!("Cost to analyze {} tests:", PROJECTION_SUITE_SIZE),
        format!("${:.4}", stats.projected_suite_cost()),
    );

    let mut sheet = cursor.sheet;
    sheet.set_column_width(0, 40.0);
    sheet.set_column_width(1, 20.0);
    sheet.set_column_width(2, 15.0);
    sheet
}

fn breakdown_row(cursor: &mut Cursor, label: &str, count: usize, pct: f64, color: u32) {
    let row = cursor.row;
    cursor.sheet.set_value(row, 0, label).font_color = Some(color);
    cursor.sheet.set_value(row, 1, count);
    cursor.sheet.set_value(row, 2, percent(pct));
    cursor.row += 1;
}

fn percent(value: f64) -> String {
    format!("{:.1}%", value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use casecheck_core::AnalysisOutcome;
    use std::time::Duration;

    fn outcome(row: u32, id: &str, verdict: &str, tokens: u32) -> RowOutcome {
        RowOutcome {
            row,
            test_id: id.to_string(),
            outcome: AnalysisOutcome::new(verdict, tokens),
        }
    }

    fn sample() -> Vec<RowOutcome> {
        vec![
            outcome(2, "TC-1", "GOOD", 100),
            outcome(3, "TC-2", "Issue: X", 50),
            outcome(4, "TC-3", "ERROR: timeout", 0),
        ]
    }

    /// Find the row whose column A holds `label`.
    fn row_of(sheet: &Sheet, label: &str) -> u32 {
        (0..=sheet.last_row().unwrap())
            .find(|&r| sheet.text(r, 0) == Some(label))
            .unwrap_or_else(|| panic!("label {label:?} not found"))
    }

    #[test]
    fn issues_sheet_lists_only_issues() {
        let sheet = issues_sheet(&sample());
        assert_eq!(sheet.name, ISSUES_SHEET_NAME);
        assert_eq!(sheet.text(0, 1), Some("Issue Found"));
        assert_eq!(sheet.text(1, 0), Some("TC-2"));
        assert_eq!(sheet.text(1, 1), Some("X"));
        assert_eq!(sheet.text(1, 2), Some("Needs Review"));
        assert_eq!(sheet.text(2, 0), None);
        assert_eq!(sheet.text(3, 0), Some("TOTAL ISSUES:"));
        assert_eq!(sheet.value(3, 1), Some(&CellValue::Number(1.0)));
        assert_eq!(sheet.column_width(1), Some(60.0));
    }

    #[test]
    fn issues_sheet_counts_unconventional_verdicts() {
        let outcomes = vec![
            outcome(2, "TC-1", "Looks incomplete", 10),
            outcome(3, "TC-2", "GOOD", 10),
        ];
        let sheet = issues_sheet(&outcomes);
        assert_eq!(sheet.text(1, 1), Some("Looks incomplete"));
        assert_eq!(sheet.value(3, 1), Some(&CellValue::Number(1.0)));
    }

    #[test]
    fn issues_sheet_with_no_issues() {
        let sheet = issues_sheet(&[outcome(2, "TC-1", "GOOD", 10)]);
        assert_eq!(sheet.text(2, 0), Some("TOTAL ISSUES:"));
        assert_eq!(sheet.value(2, 1), Some(&CellValue::Number(0.0)));
    }

    #[test]
    fn dashboard_reports_mixed_run() {
        let stats = RunStatistics::compute(&sample(), Duration::from_secs(6));
        let sheet = dashboard_sheet(&stats);

        assert_eq!(sheet.text(0, 0), Some(DASHBOARD_TITLE));
        assert_eq!(sheet.merges().len(), 1);

        let score = row_of(&sheet, "Overall Quality Score:");
        assert_eq!(sheet.text(score, 1), Some("33.3%"));
        assert_eq!(sheet.cell(score, 1).unwrap().style.font_color, Some(colors::RED));
        assert_eq!(sheet.value(row_of(&sheet, "Total Tests Analyzed:"), 1), Some(&CellValue::Number(3.0)));

        let errors = row_of(&sheet, "Analysis Errors");
        assert_eq!(sheet.value(errors, 1), Some(&CellValue::Number(1.0)));
        assert_eq!(sheet.text(errors, 2), Some("33.3%"));

        assert_eq!(sheet.text(row_of(&sheet, "Total Tokens Used:"), 1), Some("150"));
        assert_eq!(sheet.value(row_of(&sheet, "Average Tokens/Test:"), 1), Some(&CellValue::Number(50.0)));
        let cost = sheet.text(row_of(&sheet, "Total Cost:"), 1).unwrap();
        assert!(cost.starts_with("$0.00002"), "{cost}");
        assert_eq!(sheet.text(row_of(&sheet, "Analysis Time:"), 1), Some("6.0 seconds"));
        assert_eq!(sheet.text(row_of(&sheet, "Average Time/Test:"), 1), Some("2.00 seconds"));

        row_of(&sheet, Recommendation::Critical.headline());
        assert_eq!(sheet.column_width(0), Some(40.0));
    }

    #[test]
    fn dashboard_hides_error_row_without_errors() {
        let outcomes = vec![outcome(2, "TC-1", "GOOD", 100)];
        let stats = RunStatistics::compute(&outcomes, Duration::from_secs(1));
        let sheet = dashboard_sheet(&stats);

        assert!((0..=sheet.last_row().unwrap()).all(|r| sheet.text(r, 0) != Some("Analysis Errors")));
        let score = row_of(&sheet, "Overall Quality Score:");
        assert_eq!(sheet.text(score, 1), Some("100.0%"));
        assert_eq!(sheet.cell(score, 1).unwrap().style.font_color, Some(colors::GREEN));
        row_of(&sheet, Recommendation::Excellent.headline());
    }
}
