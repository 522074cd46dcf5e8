// casecheck CLI library: everything the binary does, minus process setup.

pub mod count;
pub mod error;
pub mod exit_codes;
pub mod progress;
pub mod report;
pub mod run;

pub use casecheck_io::reader::FIRST_DATA_ROW;
pub use error::CliError;
pub use run::{execute, run, RunOptions, RunReport};
