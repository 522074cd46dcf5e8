//! In-memory workbook held by the result writer for the whole run.
//!
//! Coordinates are 0-based `(row, col)` like the xlsx writer's. Only what
//! the analysis output needs is modelled: plain values, a handful of style
//! attributes, column widths and merged ranges.

use std::collections::BTreeMap;

/// RGB colours used by the analysis sheets (0xRRGGBB).
pub mod colors {
    pub const GREEN: u32 = 0x008000;
    pub const ORANGE: u32 = 0xFFA500;
    pub const RED: u32 = 0xFF0000;
    pub const WHITE: u32 = 0xFFFFFF;
    pub const LIGHT_GRAY: u32 = 0xD3D3D3;
    pub const LIGHT_BLUE: u32 = 0xADD8E6;
    pub const DARK_BLUE: u32 = 0x00008B;
}

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Bool(bool),
    /// Formula source without the leading `=`, plus the last computed result.
    Formula { source: String, cached: Option<String> },
}

impl CellValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<usize> for CellValue {
    fn from(n: usize) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<u64> for CellValue {
    fn from(n: u64) -> Self {
        CellValue::Number(n as f64)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Border {
    Thin,
    Medium,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HAlign {
    #[default]
    General,
    Center,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellStyle {
    pub bold: bool,
    pub font_size: Option<f64>,
    pub font_color: Option<u32>,
    pub fill: Option<u32>,
    pub wrap: bool,
    pub align_top: bool,
    pub align: HAlign,
    pub border: Option<Border>,
    /// Excel number format code, e.g. `m/d/yyyy`.
    pub num_format: Option<&'static str>,
}

impl CellStyle {
    pub fn is_plain(&self) -> bool {
        *self == CellStyle::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cell {
    pub value: Option<CellValue>,
    pub style: CellStyle,
}

/// A rectangular merged region, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergedRange {
    pub first: (u32, u16),
    pub last: (u32, u16),
}

#[derive(Debug, Clone, Default)]
pub struct Sheet {
    pub name: String,
    cells: BTreeMap<(u32, u16), Cell>,
    col_widths: BTreeMap<u16, f64>,
    merges: Vec<MergedRange>,
}

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn set_value(&mut self, row: u32, col: u16, value: impl Into<CellValue>) -> &mut CellStyle {
        let cell = self.cells.entry((row, col)).or_default();
        cell.value = Some(value.into());
        &mut cell.style
    }

    /// Style of a cell, creating an empty cell if needed.
    pub fn style_mut(&mut self, row: u32, col: u16) -> &mut CellStyle {
        &mut self.cells.entry((row, col)).or_default().style
    }

    pub fn cell(&self, row: u32, col: u16) -> Option<&Cell> {
        self.cells.get(&(row, col))
    }

    pub fn value(&self, row: u32, col: u16) -> Option<&CellValue> {
        self.cell(row, col).and_then(|c| c.value.as_ref())
    }

    pub fn text(&self, row: u32, col: u16) -> Option<&str> {
        self.value(row, col).and_then(CellValue::as_text)
    }

    pub fn cells(&self) -> impl Iterator<Item = (&(u32, u16), &Cell)> {
        self.cells.iter()
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Last row holding any cell, if the sheet is not empty.
    pub fn last_row(&self) -> Option<u32> {
        self.cells.keys().map(|(r, _)| *r).max()
    }

    pub fn set_column_width(&mut self, col: u16, width: f64) {
        self.col_widths.insert(col, width);
    }

    pub fn column_width(&self, col: u16) -> Option<f64> {
        self.col_widths.get(&col).copied()
    }

    pub fn column_widths(&self) -> impl Iterator<Item = (u16, f64)> + '_ {
        self.col_widths.iter().map(|(c, w)| (*c, *w))
    }

    pub fn merge(&mut self, first: (u32, u16), last: (u32, u16)) {
        self.merges.push(MergedRange { first, last });
    }

    pub fn merges(&self) -> &[MergedRange] {
        &self.merges
    }

    pub fn is_merge_hidden(&self, row: u32, col: u16) -> bool {
        self.merges.iter().any(|m| {
            (m.first.0..=m.last.0).contains(&row)
                && (m.first.1..=m.last.1).contains(&col)
                && (row, col) != m.first
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct Workbook {
    sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    pub fn sheet(&self, index: usize) -> Option<&Sheet> {
        self.sheets.get(index)
    }

    pub fn sheet_mut(&mut self, index: usize) -> Option<&mut Sheet> {
        self.sheets.get_mut(index)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.sheets.iter().position(|s| s.name == name)
    }

    pub fn sheet_by_name(&self, name: &str) -> Option<&Sheet> {
        self.index_of(name).and_then(|i| self.sheets.get(i))
    }

    pub fn push_sheet(&mut self, sheet: Sheet) -> usize {
        self.sheets.push(sheet);
        self.sheets.len() - 1
    }

    /// Remove the sheet with this name. Returns the removed position.
    pub fn remove_sheet(&mut self, name: &str) -> Option<usize> {
        let index = self.index_of(name)?;
        self.sheets.remove(index);
        Some(index)
    }

    /// Drop any sheet with the same name, then append `sheet`.
    pub fn replace_sheet(&mut self, sheet: Sheet) -> usize {
        self.remove_sheet(&sheet.name);
        self.push_sheet(sheet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_value_overwrites() {
        let mut sheet = Sheet::new("Data");
        sheet.set_value(1, 7, "first");
        sheet.set_value(1, 7, "second").bold = true;
        assert_eq!(sheet.text(1, 7), Some("second"));
        assert!(sheet.cell(1, 7).unwrap().style.bold);
        assert_eq!(sheet.cell_count(), 1);
    }

    #[test]
    fn last_row_tracks_cells() {
        let mut sheet = Sheet::new("Data");
        assert_eq!(sheet.last_row(), None);
        sheet.set_value(4, 0, 1.0);
        sheet.set_value(2, 3, CellValue::Bool(true));
        assert_eq!(sheet.last_row(), Some(4));
    }

    #[test]
    fn merge_hides_all_but_origin() {
        let mut sheet = Sheet::new("Dash");
        sheet.merge((0, 0), (0, 3));
        assert!(!sheet.is_merge_hidden(0, 0));
        assert!(sheet.is_merge_hidden(0, 2));
        assert!(!sheet.is_merge_hidden(1, 2));
    }

    #[test]
    fn replace_sheet_keeps_one_copy() {
        let mut book = Workbook::new();
        book.push_sheet(Sheet::new("Data"));
        book.push_sheet(Sheet::new("Summary"));
        book.push_sheet(Sheet::new("Other"));

        let mut fresh = Sheet::new("Summary");
        fresh.set_value(0, 0, "new");
        let idx = book.replace_sheet(fresh);

        assert_eq!(idx, 2);
        assert_eq!(book.sheet_count(), 3);
        assert_eq!(book.index_of("Summary"), Some(2));
        assert_eq!(book.sheet_by_name("Summary").unwrap().text(0, 0), Some("new"));
        assert_eq!(book.remove_sheet("Missing"), None);
    }
}
