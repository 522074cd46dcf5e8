//! Row count resolution.
//!
//! The count comes from the positional argument when it parses as an
//! integer, otherwise from an interactive answer. Both paths end in
//! [`resolve`], which clamps to the rows actually present.

use crate::error::CliError;
use crate::FIRST_DATA_ROW;

/// What the operator asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountChoice {
    /// Blank answer.
    All,
    Number(i64),
    /// Answer that is neither blank nor an integer.
    Invalid(String),
}

/// Parse the positional argument. Text that is not an integer is ignored so
/// the caller falls back to the prompt.
pub fn parse_argument(arg: Option<&str>) -> Option<CountChoice> {
    arg.and_then(|a| a.trim().parse::<i64>().ok())
        .map(CountChoice::Number)
}

/// Parse an answer typed at the prompt.
pub fn parse_answer(answer: &str) -> CountChoice {
    let answer = answer.trim();
    if answer.is_empty() {
        return CountChoice::All;
    }
    match answer.parse::<i64>() {
        Ok(n) => CountChoice::Number(n),
        Err(_) => CountChoice::Invalid(answer.to_string()),
    }
}

/// Rows selected for analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowCount {
    /// Every row through the sheet's last used row, gaps included.
    All,
    /// Rows 2 ..= n + 1.
    First(usize),
}

/// The resolved selection plus what was asked, for console reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved {
    pub rows: RowCount,
    /// The number asked for, when it exceeded the available rows.
    pub clamped_from: Option<i64>,
}

impl Resolved {
    /// 1-based rows to read, given the sheet's last used row.
    pub fn row_numbers(&self, last_row: u32) -> std::ops::RangeInclusive<u32> {
        match self.rows {
            RowCount::All => FIRST_DATA_ROW..=last_row,
            RowCount::First(n) => FIRST_DATA_ROW..=(n as u32 + FIRST_DATA_ROW - 1),
        }
    }
}

/// Resolve a choice against `available` contiguous test case rows.
pub fn resolve(choice: CountChoice, available: usize) -> Result<Resolved, CliError> {
    match choice {
        CountChoice::All => Ok(Resolved {
            rows: RowCount::All,
            clamped_from: None,
        }),
        CountChoice::Number(n) if n < 1 => Err(CliError::usage("Test count must be at least 1")
            .with_hint(format!("enter a number between 1 and {}", available))),
        CountChoice::Number(n) if n as u64 > available as u64 => Ok(Resolved {
            rows: RowCount::First(available),
            clamped_from: Some(n),
        }),
        CountChoice::Number(n) => Ok(Resolved {
            rows: RowCount::First(n as usize),
            clamped_from: None,
        }),
        CountChoice::Invalid(text) => Err(CliError::usage(format!(
            "Invalid input '{}'. Please enter a positive number.",
            text
        ))),
    }
}
