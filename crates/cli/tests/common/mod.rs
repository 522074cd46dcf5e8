// Shared fixtures for casecheck integration tests.
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Reader};
use rust_xlsxwriter::Workbook;
use serde_json::json;

pub const HEADERS: [&str; 7] = [
    "Test ID",
    "Feature",
    "Scenario",
    "Priority",
    "Steps",
    "Expected Result",
    "Status",
];

/// Write `cases.xlsx` with a cover sheet first and the test cases second.
/// An empty id leaves the whole row except the scenario blank.
pub fn write_cases(dir: &Path, ids: &[&str]) -> PathBuf {
    let path = dir.join("cases.xlsx");
    let mut book = Workbook::new();
    book.add_worksheet()
        .set_name("Cover")
        .unwrap()
        .write_string(0, 0, "Regression suite")
        .unwrap();

    let sheet = book.add_worksheet().set_name("Cases").unwrap();
    for (col, header) in HEADERS.iter().enumerate() {
        sheet.write_string(0, col as u16, *header).unwrap();
    }
    for (i, id) in ids.iter().enumerate() {
        let row = i as u32 + 1;
        if id.is_empty() {
            sheet.write_string(row, 2, "row without id").unwrap();
            continue;
        }
        sheet.write_string(row, 0, *id).unwrap();
        sheet.write_string(row, 1, "Checkout").unwrap();
        sheet.write_string(row, 2, format!("Scenario {}", id)).unwrap();
        sheet.write_string(row, 3, "High").unwrap();
        sheet.write_string(row, 4, "1. Add item 2. Pay").unwrap();
        sheet.write_string(row, 5, "Order placed").unwrap();
        sheet.write_string(row, 6, "Not Run").unwrap();
    }
    book.save(&path).unwrap();
    path
}

/// Write both configuration files. The data sheet is index 1.
pub fn write_config(dir: &Path, api_key: &str, base_url: &str) {
    let app = json!({
        "OpenAI": { "ApiKey": api_key, "Model": "gpt-4o-mini", "BaseUrl": base_url },
        "Excel": { "FilePath": "cases.xlsx", "WorksheetIndex": 1 }
    });
    let prompt = json!({
        "MaxTokens": 150,
        "Temperature": 0.2,
        "SystemMessage": "You are an expert QA analyzer.",
        "UserTemplate": "Feature: {Feature}\nScenario: {Scenario}\nSteps: {Steps}\nExpected: {ExpectedResult}"
    });
    fs::write(dir.join("appsettings.json"), app.to_string()).unwrap();
    fs::write(dir.join("PromptConfig.json"), prompt.to_string()).unwrap();
}

/// Cell text of a sheet in an output workbook, 0-based coordinates.
pub fn cell(path: &Path, sheet: &str, row: u32, col: u32) -> Option<String> {
    let mut book = open_workbook_auto(path).unwrap();
    let range = book.worksheet_range(sheet).unwrap();
    match range.get_value((row, col)) {
        None | Some(Data::Empty) => None,
        Some(Data::String(s)) => Some(s.clone()),
        Some(Data::Float(f)) => Some(f.to_string()),
        Some(other) => Some(other.to_string()),
    }
}

pub fn sheet_names(path: &Path) -> Vec<String> {
    let book = open_workbook_auto(path).unwrap();
    book.sheet_names().to_vec()
}

/// Every xlsx file in `dir/output`.
pub fn output_files(dir: &Path) -> Vec<PathBuf> {
    let out = dir.join("output");
    match fs::read_dir(&out) {
        Ok(entries) => entries
            .map(|e| e.unwrap().path())
            .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("xlsx"))
            .collect(),
        Err(_) => Vec::new(),
    }
}
