use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// The spreadsheet could not be opened or parsed.
    #[error("failed to open {}: {message}", path.display())]
    Open { path: PathBuf, message: String },

    #[error("worksheet index {index} not found (workbook has {count})")]
    SheetMissing { index: usize, count: usize },

    #[error("sheet name '{0}' is already used by another worksheet")]
    SheetNameTaken(String),

    /// A cell, format or sheet could not be written to the xlsx writer.
    #[error("failed to write {what}: {message}")]
    Write { what: String, message: String },

    #[error("failed to save {}: {message}", path.display())]
    Save { path: PathBuf, message: String },

    #[error("{}: {source}", path.display())]
    Fs {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl IoError {
    pub(crate) fn write(what: impl Into<String>, err: impl std::fmt::Display) -> Self {
        IoError::Write {
            what: what.into(),
            message: err.to_string(),
        }
    }

    pub(crate) fn fs(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        IoError::Fs {
            path: path.into(),
            source,
        }
    }
}
