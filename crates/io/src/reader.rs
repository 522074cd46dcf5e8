//! Test case reader over one worksheet of the input spreadsheet.
//!
//! The sheet is loaded once when the reader is built. A load failure is kept
//! and reported through [`CaseReader::validate_structure`]; row reads against
//! a failed load simply return `None`.

use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Range, Reader};
use casecheck_core::TestCaseRecord;

use crate::error::IoError;
use crate::xlsx::cell_text;

/// Columns a usable test case sheet must have.
pub const MIN_COLUMNS: u32 = 5;
/// Number of record columns (Test ID through Status).
pub const RECORD_COLUMNS: u16 = 7;
/// First 1-based row holding a test case.
pub const FIRST_DATA_ROW: u32 = 2;

/// Outcome of [`CaseReader::validate_structure`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructureCheck {
    pub valid: bool,
    pub message: String,
}

impl StructureCheck {
    fn ok() -> Self {
        Self {
            valid: true,
            message: "Excel structure is valid".to_string(),
        }
    }

    fn fail(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: message.into(),
        }
    }
}

pub struct CaseReader {
    path: PathBuf,
    sheet_index: usize,
    range: Result<Range<Data>, IoError>,
}

impl CaseReader {
    pub fn new(path: impl AsRef<Path>, sheet_index: usize) -> Self {
        let path = path.as_ref().to_path_buf();
        let range = load_range(&path, sheet_index);
        if let Err(e) = &range {
            tracing::warn!(path = %path.display(), error = %e, "could not load worksheet");
        }
        Self {
            path,
            sheet_index,
            range,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn sheet_index(&self) -> usize {
        self.sheet_index
    }

    /// Contiguous rows with a non-blank Test ID, starting at row 2.
    pub fn count_rows(&self) -> usize {
        let Ok(range) = &self.range else {
            return 0;
        };
        (FIRST_DATA_ROW..)
            .take_while(|&row| key_text(range, row).is_some())
            .count()
    }

    /// Last used 1-based row of the sheet, or 0 when nothing is loaded.
    pub fn last_row(&self) -> u32 {
        match &self.range {
            Ok(range) => range.end().map(|(r, _)| r + 1).unwrap_or(0),
            Err(_) => 0,
        }
    }

    /// Read the test case on 1-based row `row`.
    ///
    /// `None` for the header row, rows past the sheet's extent, rows with a
    /// blank Test ID, and any load failure.
    pub fn read_row(&self, row: u32) -> Option<TestCaseRecord> {
        let range = self.range.as_ref().ok()?;
        if row < FIRST_DATA_ROW || row > self.last_row() {
            return None;
        }

        let text = |col: u16| {
            let abs = (row - 1, col as u32);
            range.get_value(abs).and_then(cell_text)
        };
        let record = TestCaseRecord::from_cells(text(0), text(1), text(2), text(3), text(4), text(5), text(6));
        if record.is_none() {
            tracing::debug!(row, "skipping row with blank test id");
        }
        record
    }

    pub fn validate_structure(&self) -> StructureCheck {
        let range = match &self.range {
            Ok(range) => range,
            Err(IoError::SheetMissing { count: 0, .. }) => {
                return StructureCheck::fail("Excel file has no worksheets")
            }
            Err(e) => return StructureCheck::fail(format!("Error reading Excel file: {}", e)),
        };

        let Some((end_row, end_col)) = range.end() else {
            return StructureCheck::fail("Excel worksheet is empty");
        };

        let columns = end_col + 1;
        if columns < MIN_COLUMNS {
            return StructureCheck::fail(format!(
                "Excel has only {} columns, need at least {} (Test ID, Feature, Scenario, Priority, Steps, Expected Result, Status)",
                columns, MIN_COLUMNS
            ));
        }

        if key_text(range, 1).is_none() {
            return StructureCheck::fail("First row (header) is empty. Expected column headers.");
        }

        if end_row + 1 < FIRST_DATA_ROW {
            return StructureCheck::fail("Excel has only header row, no test cases found");
        }

        StructureCheck::ok()
    }
}

/// Trimmed text of column A on 1-based `row`.
fn key_text(range: &Range<Data>, row: u32) -> Option<String> {
    range.get_value((row - 1, 0)).and_then(cell_text)
}

fn load_range(path: &Path, sheet_index: usize) -> Result<Range<Data>, IoError> {
    let mut workbook = open_workbook_auto(path).map_err(|e| IoError::Open {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let count = workbook.sheet_names().len();
    match workbook.worksheet_range_at(sheet_index) {
        Some(Ok(range)) => Ok(range),
        Some(Err(e)) => Err(IoError::Open {
            path: path.to_path_buf(),
            message: e.to_string(),
        }),
        None => Err(IoError::SheetMissing {
            index: sheet_index,
            count,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook as XlsxWorkbook;

    const HEADERS: [&str; 7] = [
        "Test ID",
        "Feature",
        "Scenario",
        "Priority",
        "Steps",
        "Expected Result",
        "Status",
    ];

    /// Write a sheet with the standard header and the given rows of column A..G.
    fn fixture(dir: &Path, rows: &[[&str; 7]]) -> PathBuf {
        let path = dir.join("cases.xlsx");
        let mut book = XlsxWorkbook::new();
        let sheet = book.add_worksheet();
        for (col, header) in HEADERS.iter().enumerate() {
            sheet.write_string(0, col as u16, *header).unwrap();
        }
        for (i, row) in rows.iter().enumerate() {
            for (col, value) in row.iter().enumerate() {
                if !value.is_empty() {
                    sheet.write_string(i as u32 + 1, col as u16, *value).unwrap();
                }
            }
        }
        book.save(&path).unwrap();
        path
    }

    fn case(id: &'static str) -> [&'static str; 7] {
        [id, "Login", "Valid login", "High", "1. open", "Dashboard", "Pass"]
    }

    #[test]
    fn count_stops_at_first_blank_id() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixture(dir.path(), &[case("TC-1"), case("TC-2"), case(""), case("TC-4")]);
        let reader = CaseReader::new(&path, 0);
        assert_eq!(reader.count_rows(), 2);
        assert_eq!(reader.last_row(), 5);
    }

    #[test]
    fn read_row_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixture(dir.path(), &[["TC-1", "", "Checkout", "", "", "", ""]]);
        let reader = CaseReader::new(&path, 0);

        let record = reader.read_row(2).unwrap();
        assert_eq!(record.id, "TC-1");
        assert_eq!(record.scenario, "Checkout");
        assert_eq!(record.feature, "Not Specified");
        assert_eq!(record.priority, "Medium");
        assert_eq!(record.status, "Not Run");
    }

    #[test]
    fn read_row_out_of_range_or_blank() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixture(dir.path(), &[case("TC-1"), case("")]);
        let reader = CaseReader::new(&path, 0);
        assert!(reader.read_row(1).is_none());
        assert!(reader.read_row(3).is_none());
        assert!(reader.read_row(99).is_none());
        assert!(reader.read_row(2).is_some());
    }

    #[test]
    fn missing_file_reads_nothing() {
        let reader = CaseReader::new("/nonexistent/cases.xlsx", 0);
        assert_eq!(reader.count_rows(), 0);
        assert!(reader.read_row(2).is_none());
        let check = reader.validate_structure();
        assert!(!check.valid);
        assert!(check.message.starts_with("Error reading Excel file:"));
    }

    #[test]
    fn validate_accepts_well_formed_sheet() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixture(dir.path(), &[case("TC-1")]);
        let check = CaseReader::new(&path, 0).validate_structure();
        assert_eq!(check, StructureCheck::ok());
    }

    #[test]
    fn validate_rejects_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixture(dir.path(), &[]);
        let check = CaseReader::new(&path, 0).validate_structure();
        assert!(!check.valid);
        assert_eq!(check.message, "Excel has only header row, no test cases found");
    }

    #[test]
    fn validate_rejects_narrow_sheet() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("narrow.xlsx");
        let mut book = XlsxWorkbook::new();
        let sheet = book.add_worksheet();
        sheet.write_string(0, 0, "Test ID").unwrap();
        sheet.write_string(0, 1, "Feature").unwrap();
        sheet.write_string(1, 0, "TC-1").unwrap();
        book.save(&path).unwrap();

        let check = CaseReader::new(&path, 0).validate_structure();
        assert!(!check.valid);
        assert!(check.message.starts_with("Excel has only 2 columns"));
    }

    #[test]
    fn validate_rejects_missing_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("noheader.xlsx");
        let mut book = XlsxWorkbook::new();
        let sheet = book.add_worksheet();
        sheet.write_string(0, 1, "Feature").unwrap();
        for col in 0..5u16 {
            sheet.write_string(1, col, "x").unwrap();
        }
        book.save(&path).unwrap();

        let check = CaseReader::new(&path, 0).validate_structure();
        assert_eq!(check.message, "First row (header) is empty. Expected column headers.");
    }

    #[test]
    fn sheet_index_out_of_range() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixture(dir.path(), &[case("TC-1")]);
        let reader = CaseReader::new(&path, 3);
        assert_eq!(reader.count_rows(), 0);
        let check = reader.validate_structure();
        assert!(!check.valid);
        assert!(check.message.contains("worksheet index 3"));
    }
}
