// Excel file import (xlsx, xls, xlsb, ods) and export (xlsx only)
//
// Import: values, formulas (with their cached results) and date formats.
//         Other source styling is not read.
// Export: presentation snapshot of the in-memory workbook.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader, Sheets};
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Formula, Workbook as XlsxWorkbook, Worksheet};

use crate::error::IoError;
use crate::workbook::{Border, CellStyle, CellValue, HAlign, Sheet, Workbook};

/// Largest integer-valued float rendered without a decimal part.
const MAX_EXACT_INT: f64 = 1e15;

const DATE_FORMAT: &str = "m/d/yyyy";
const TIME_FORMAT: &str = "h:mm:ss";
const DATETIME_FORMAT: &str = "m/d/yyyy h:mm:ss";

/// Counts reported after an export.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExportResult {
    pub sheets_exported: usize,
    pub cells_exported: usize,
    pub merges_exported: usize,
}

/// Render a calamine cell as trimmed text. Blank cells yield `None`.
pub fn cell_text(cell: &Data) -> Option<String> {
    let text = match cell {
        Data::Empty => return None,
        Data::String(s) => s.trim().to_string(),
        Data::Float(n) => format_number(*n),
        Data::Int(n) => n.to_string(),
        Data::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        Data::DateTime(dt) => format_number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.trim().to_string(),
        Data::Error(e) => format!("#{:?}", e),
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Integers without decimals, everything else as Rust prints it.
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < MAX_EXACT_INT {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

fn cell_value(cell: &Data) -> Option<CellValue> {
    match cell {
        Data::Empty => None,
        Data::String(s) if s.is_empty() => None,
        Data::String(s) => Some(CellValue::Text(s.clone())),
        Data::Float(n) => Some(CellValue::Number(*n)),
        Data::Int(n) => Some(CellValue::Number(*n as f64)),
        Data::Bool(b) => Some(CellValue::Bool(*b)),
        Data::DateTime(dt) => Some(CellValue::Number(dt.as_f64())),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(CellValue::Text(s.clone())),
        Data::Error(e) => Some(CellValue::Text(format!("#{:?}", e))),
    }
}

/// Pick a display format for a date serial from the parts it carries.
fn date_format(serial: f64) -> &'static str {
    let has_date = serial.floor() > 0.0;
    let has_time = serial.fract().abs() > 0.0001;
    match (has_date, has_time) {
        (true, true) => DATETIME_FORMAT,
        (false, true) => TIME_FORMAT,
        _ => DATE_FORMAT,
    }
}

/// Text shown for a value when it becomes a formula's cached result.
fn display_value(value: &CellValue) -> Option<String> {
    match value {
        CellValue::Text(s) => Some(s.clone()),
        CellValue::Number(n) => Some(format_number(*n)),
        CellValue::Bool(b) => Some(if *b { "TRUE" } else { "FALSE" }.to_string()),
        CellValue::Formula { cached, .. } => cached.clone(),
    }
}

/// Overlay formula cells onto already imported values.
fn import_formulas(sheet: &mut Sheet, formulas: &Range<String>) -> usize {
    let (start_row, start_col) = formulas.start().unwrap_or((0, 0));
    let mut imported = 0;
    for (row_idx, row) in formulas.rows().enumerate() {
        for (col_idx, formula) in row.iter().enumerate() {
            if formula.is_empty() {
                continue;
            }
            let r = start_row + row_idx as u32;
            let c = (start_col as usize + col_idx) as u16;
            let cached = sheet.value(r, c).and_then(display_value);
            let source = formula.strip_prefix('=').unwrap_or(formula.as_str()).to_string();
            sheet.set_value(r, c, CellValue::Formula { source, cached });
            imported += 1;
        }
    }
    imported
}

/// Import every sheet of a spreadsheet into the in-memory model.
pub fn import(path: &Path) -> Result<Workbook, IoError> {
    let open_err = |message: String| IoError::Open {
        path: path.to_path_buf(),
        message,
    };

    let mut source: Sheets<_> = open_workbook_auto(path).map_err(|e| open_err(e.to_string()))?;
    let mut workbook = Workbook::new();

    let sheet_names: Vec<String> = source.sheet_names().to_vec();
    for name in &sheet_names {
        let range = source
            .worksheet_range(name)
            .map_err(|e| open_err(format!("sheet '{}': {}", name, e)))?;

        let mut sheet = Sheet::new(name.as_str());
        // Range start offset (data may not begin at A1)
        let (start_row, start_col) = range.start().unwrap_or((0, 0));

        for (row_idx, row) in range.rows().enumerate() {
            for (col_idx, cell) in row.iter().enumerate() {
                if let Some(value) = cell_value(cell) {
                    let r = start_row + row_idx as u32;
                    let c = (start_col as usize + col_idx) as u16;
                    let style = sheet.set_value(r, c, value);
                    if let Data::DateTime(dt) = cell {
                        style.num_format = Some(date_format(dt.as_f64()));
                    }
                }
            }
        }

        match source.worksheet_formula(name) {
            Ok(formulas) => {
                let count = import_formulas(&mut sheet, &formulas);
                tracing::debug!(sheet = %name, formulas = count, "formulas imported");
            }
            Err(e) => tracing::debug!(sheet = %name, error = %e, "formulas not read"),
        }
        workbook.push_sheet(sheet);
    }

    tracing::debug!(path = %path.display(), sheets = workbook.sheet_count(), "workbook imported");
    Ok(workbook)
}

/// Export the in-memory model to an xlsx file, replacing it.
pub fn export(workbook: &Workbook, path: &Path) -> Result<ExportResult, IoError> {
    let mut result = ExportResult::default();
    let mut xlsx = XlsxWorkbook::new();

    for sheet in workbook.sheets() {
        let worksheet = xlsx
            .add_worksheet()
            .set_name(sheet.name.as_str())
            .map_err(|e| IoError::write(format!("sheet '{}'", sheet.name), e))?;

        // merge_range() writes blanks over the whole range; the origin cell
        // is overwritten with its real value by export_sheet_cells() below.
        for merge in sheet.merges() {
            let format = sheet
                .cell(merge.first.0, merge.first.1)
                .map(|c| build_format(&c.style))
                .unwrap_or_else(Format::new);
            worksheet
                .merge_range(merge.first.0, merge.first.1, merge.last.0, merge.last.1, "", &format)
                .map_err(|e| IoError::write(format!("merge in '{}'", sheet.name), e))?;
            result.merges_exported += 1;
        }

        result.cells_exported += export_sheet_cells(sheet, worksheet)?;

        for (col, width) in sheet.column_widths() {
            worksheet
                .set_column_width(col, width)
                .map_err(|e| IoError::write(format!("column {} width", col), e))?;
        }

        result.sheets_exported += 1;
    }

    xlsx.save(path).map_err(|e| IoError::Save {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    Ok(result)
}

fn export_sheet_cells(sheet: &Sheet, worksheet: &mut Worksheet) -> Result<usize, IoError> {
    let mut exported = 0;

    for (&(row, col), cell) in sheet.cells() {
        if sheet.is_merge_hidden(row, col) {
            continue;
        }

        let format = build_format(&cell.style);
        let written = match &cell.value {
            Some(CellValue::Text(s)) => worksheet.write_string_with_format(row, col, s.as_str(), &format),
            Some(CellValue::Number(n)) => worksheet.write_number_with_format(row, col, *n, &format),
            Some(CellValue::Bool(b)) => worksheet.write_boolean_with_format(row, col, *b, &format),
            Some(CellValue::Formula { source, cached }) => {
                let mut formula = Formula::new(source.as_str());
                if let Some(result) = cached {
                    formula = formula.set_result(result.as_str());
                }
                worksheet.write_formula_with_format(row, col, formula, &format)
            }
            // Only write a blank if there is formatting to carry
            None if !cell.style.is_plain() => worksheet.write_blank(row, col, &format),
            None => continue,
        };
        written.map_err(|e| IoError::write(format!("cell ({}, {}) in '{}'", row, col, sheet.name), e))?;
        exported += 1;
    }

    Ok(exported)
}

fn build_format(style: &CellStyle) -> Format {
    let mut format = Format::new();

    if style.bold {
        format = format.set_bold();
    }
    if let Some(size) = style.font_size {
        format = format.set_font_size(size);
    }
    if let Some(rgb) = style.font_color {
        format = format.set_font_color(Color::RGB(rgb));
    }
    if let Some(rgb) = style.fill {
        format = format.set_background_color(Color::RGB(rgb));
    }
    if style.wrap {
        format = format.set_text_wrap();
    }
    if style.align_top {
        format = format.set_align(FormatAlign::Top);
    }
    if style.align == HAlign::Center {
        format = format.set_align(FormatAlign::Center);
    }
    if let Some(code) = style.num_format {
        format = format.set_num_format(code);
    }
    if let Some(border) = style.border {
        format = format.set_border(match border {
            Border::Thin => FormatBorder::Thin,
            Border::Medium => FormatBorder::Medium,
        });
    }

    format
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_text_formats_numbers() {
        assert_eq!(cell_text(&Data::Float(42.0)), Some("42".to_string()));
        assert_eq!(cell_text(&Data::Float(1.5)), Some("1.5".to_string()));
        assert_eq!(cell_text(&Data::Int(7)), Some("7".to_string()));
        assert_eq!(cell_text(&Data::Bool(true)), Some("TRUE".to_string()));
    }

    #[test]
    fn cell_text_blank_is_none() {
        assert_eq!(cell_text(&Data::Empty), None);
        assert_eq!(cell_text(&Data::String("   ".into())), None);
        assert_eq!(cell_text(&Data::String("  TC-1 ".into())), Some("TC-1".to_string()));
    }

    #[test]
    fn export_then_import_keeps_values() {
        let mut book = Workbook::new();
        let mut sheet = Sheet::new("Cases");
        sheet.set_value(0, 0, "Test ID");
        sheet.set_value(1, 0, "TC-1");
        sheet.set_value(1, 1, 3.0);
        sheet.set_value(1, 2, CellValue::Bool(false));
        sheet.set_value(1, 7, "GOOD").font_color = Some(crate::workbook::colors::GREEN);
        sheet.set_column_width(7, 50.0);
        book.push_sheet(sheet);

        let mut dash = Sheet::new("Dash");
        dash.set_value(0, 0, "Title").bold = true;
        dash.merge((0, 0), (0, 3));
        book.push_sheet(dash);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");
        let result = export(&book, &path).unwrap();
        assert_eq!(result.sheets_exported, 2);
        assert_eq!(result.cells_exported, 6);
        assert_eq!(result.merges_exported, 1);

        let back = import(&path).unwrap();
        assert_eq!(back.sheet_count(), 2);
        let cases = back.sheet(0).unwrap();
        assert_eq!(cases.name, "Cases");
        assert_eq!(cases.text(1, 0), Some("TC-1"));
        assert_eq!(cases.value(1, 1), Some(&CellValue::Number(3.0)));
        assert_eq!(cases.value(1, 2), Some(&CellValue::Bool(false)));
        assert_eq!(cases.text(1, 7), Some("GOOD"));
        assert_eq!(back.sheet(1).unwrap().text(0, 0), Some("Title"));
    }

    #[test]
    fn formulas_and_dates_round_trip() {
        let mut book = Workbook::new();
        let mut sheet = Sheet::new("Cases");
        sheet.set_value(0, 0, "Test ID");
        sheet.set_value(1, 8, 45356.0).num_format = Some(DATE_FORMAT);
        sheet.set_value(
            1,
            9,
            CellValue::Formula {
                source: "1+1".to_string(),
                cached: Some("2".to_string()),
            },
        );
        book.push_sheet(sheet);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");
        export(&book, &path).unwrap();

        let back = import(&path).unwrap();
        let cases = back.sheet(0).unwrap();
        let dated = cases.cell(1, 8).unwrap();
        assert_eq!(dated.value, Some(CellValue::Number(45356.0)));
        assert_eq!(dated.style.num_format, Some(DATE_FORMAT));
        match cases.value(1, 9) {
            Some(CellValue::Formula { source, .. }) => assert_eq!(source, "1+1"),
            other => panic!("expected a formula, got {:?}", other),
        }
    }

    #[test]
    fn date_format_follows_serial_parts() {
        assert_eq!(date_format(45356.0), DATE_FORMAT);
        assert_eq!(date_format(0.5), TIME_FORMAT);
        assert_eq!(date_format(45356.25), DATETIME_FORMAT);
    }

    #[test]
    fn import_missing_file_fails() {
        let err = import(Path::new("/nonexistent/cases.xlsx")).unwrap_err();
        assert!(matches!(err, IoError::Open { .. }));
    }
}
