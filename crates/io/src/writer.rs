//! Output artifact: a timestamped copy of the input with verdicts and
//! summary sheets added.
//!
//! The copy is imported once into an in-memory [`Workbook`] and every write
//! operation re-exports the whole workbook before returning, so a verdict is
//! on disk before the next row is analyzed.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDateTime};
use casecheck_core::{RowOutcome, RunStatistics, VerdictKind};

use crate::error::IoError;
use crate::summary::{dashboard_sheet, issues_sheet};
use crate::workbook::{colors, Border, CellStyle, Sheet, Workbook};
use crate::xlsx;

pub const OUTPUT_DIR: &str = "output";
pub const DATA_SHEET_NAME: &str = "AI Detailed Analysis";
pub const ANALYSIS_HEADER: &str = "AI Analysis";
/// 1-based column that receives the verdict (H).
pub const ANALYSIS_COLUMN: u16 = 8;
pub const ANALYSIS_COLUMN_WIDTH: f64 = 50.0;

/// Extensions that are already xlsx containers and can be copied byte for byte.
const COPYABLE_EXTENSIONS: [&str; 2] = ["xlsx", "xlsm"];

/// `analysis_results_<YYYYMMDD_HHmmss>.xlsx`
pub fn output_file_name(timestamp: NaiveDateTime) -> String {
    format!("analysis_results_{}.xlsx", timestamp.format("%Y%m%d_%H%M%S"))
}

/// Copy `input` into `output_dir` under a timestamped name and return the
/// new path. The directory is created if needed.
///
/// Inputs in other formats (xls, xlsb, ods) are converted to xlsx.
pub fn create_output_copy(input: &Path, output_dir: &Path, timestamp: NaiveDateTime) -> Result<PathBuf, IoError> {
    fs::create_dir_all(output_dir).map_err(|e| IoError::fs(output_dir, e))?;
    let output = output_dir.join(output_file_name(timestamp));

    let ext = input
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    if COPYABLE_EXTENSIONS.contains(&ext.as_str()) {
        fs::copy(input, &output).map_err(|e| IoError::fs(input, e))?;
    } else {
        let book = xlsx::import(input)?;
        xlsx::export(&book, &output)?;
        tracing::info!(input = %input.display(), "converted input to xlsx");
    }

    tracing::info!(output = %output.display(), "output copy created");
    Ok(output)
}

pub struct ResultWriter {
    path: PathBuf,
    book: Workbook,
    data_sheet: String,
}

impl ResultWriter {
    /// Load the output copy. `sheet_index` selects the data sheet, the same
    /// sheet the reader reads from.
    pub fn open(path: impl Into<PathBuf>, sheet_index: usize) -> Result<Self, IoError> {
        let path = path.into();
        let book = xlsx::import(&path)?;
        let data_sheet = book
            .sheet(sheet_index)
            .map(|s| s.name.clone())
            .ok_or(IoError::SheetMissing {
                index: sheet_index,
                count: book.sheet_count(),
            })?;

        Ok(Self {
            path,
            book,
            data_sheet,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn workbook(&self) -> &Workbook {
        &self.book
    }

    pub fn data_sheet_name(&self) -> &str {
        &self.data_sheet
    }

    pub fn rename_data_sheet(&mut self) -> Result<(), IoError> {
        if self.data_sheet == DATA_SHEET_NAME {
            return Ok(());
        }
        if self.book.index_of(DATA_SHEET_NAME).is_some() {
            return Err(IoError::SheetNameTaken(DATA_SHEET_NAME.to_string()));
        }
        self.data_sheet_mut()?.name = DATA_SHEET_NAME.to_string();
        self.data_sheet = DATA_SHEET_NAME.to_string();
        self.save()
    }

    pub fn write_header(&mut self) -> Result<(), IoError> {
        let col = ANALYSIS_COLUMN - 1;
        let sheet = self.data_sheet_mut()?;
        *sheet.set_value(0, col, ANALYSIS_HEADER) = CellStyle {
            bold: true,
            fill: Some(colors::LIGHT_GRAY),
            border: Some(Border::Medium),
            ..Default::default()
        };
        sheet.set_column_width(col, ANALYSIS_COLUMN_WIDTH);
        self.save()
    }

    /// Write `verdict` into the analysis column of 1-based `row`.
    /// Writing the same row again replaces the earlier verdict.
    pub fn write_result(&mut self, row: u32, verdict: &str) -> Result<(), IoError> {
        if row < 1 {
            return Err(IoError::write(format!("row {}", row), "rows are 1-based"));
        }
        let col = ANALYSIS_COLUMN - 1;
        let sheet = self.data_sheet_mut()?;
        *sheet.set_value(row - 1, col, verdict) = verdict_style(verdict);
        sheet.set_column_width(col, ANALYSIS_COLUMN_WIDTH);
        self.save()
    }

    pub fn write_issues_summary(&mut self, outcomes: &[RowOutcome]) -> Result<(), IoError> {
        self.replace_summary(issues_sheet(outcomes))
    }

    pub fn write_statistics_dashboard(
        &mut self,
        outcomes: &[RowOutcome],
        start: DateTime<Local>,
        end: DateTime<Local>,
    ) -> Result<(), IoError> {
        let elapsed = (end - start).to_std().unwrap_or_default();
        let stats = RunStatistics::compute(outcomes, elapsed);
        self.replace_summary(dashboard_sheet(&stats))
    }

    fn replace_summary(&mut self, sheet: Sheet) -> Result<(), IoError> {
        if sheet.name == self.data_sheet {
            return Err(IoError::SheetNameTaken(sheet.name));
        }
        let name = sheet.name.clone();
        self.book.replace_sheet(sheet);
        self.save()?;
        tracing::info!(sheet = %name, "summary sheet written");
        Ok(())
    }

    fn data_sheet_mut(&mut self) -> Result<&mut Sheet, IoError> {
        let count = self.book.sheet_count();
        let index = self.book.index_of(&self.data_sheet).ok_or(IoError::SheetMissing { index: count, count })?;
        self.book
            .sheet_mut(index)
            .ok_or(IoError::SheetMissing { index, count })
    }

    fn save(&self) -> Result<(), IoError> {
        xlsx::export(&self.book, &self.path)?;
        Ok(())
    }
}

fn verdict_style(verdict: &str) -> CellStyle {
    let font_color = match VerdictKind::classify(verdict) {
        VerdictKind::Good => Some(colors::GREEN),
        VerdictKind::Issue => Some(colors::ORANGE),
        VerdictKind::Error => Some(colors::RED),
        VerdictKind::Other => None,
    };
    CellStyle {
        font_color,
        wrap: true,
        align_top: true,
        border: Some(Border::Thin),
        ..Default::default()
    }
}
