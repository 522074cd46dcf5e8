// Spreadsheet I/O: test case reader, result writer, summary sheets

pub mod error;
pub mod reader;
pub mod summary;
pub mod workbook;
pub mod writer;
pub mod xlsx;

pub use error::IoError;
pub use reader::{CaseReader, StructureCheck};
pub use summary::{ISSUES_SHEET_NAME, STATS_SHEET_NAME};
pub use writer::{create_output_copy, output_file_name, ResultWriter, DATA_SHEET_NAME, OUTPUT_DIR};
