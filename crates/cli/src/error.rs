use casecheck_config::ConfigError;
use casecheck_io::IoError;

use crate::exit_codes::{EXIT_ERROR, EXIT_USAGE};

/// A fatal error, printed as `error:` / `hint:` before exiting with `code`.
#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn fatal(msg: impl Into<String>) -> Self {
        Self {
            code: EXIT_ERROR,
            message: msg.into(),
            hint: None,
        }
    }

    pub fn usage(msg: impl Into<String>) -> Self {
        Self {
            code: EXIT_USAGE,
            message: msg.into(),
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        let hint = err.hint();
        Self {
            code: EXIT_ERROR,
            message: err.to_string(),
            hint,
        }
    }
}

impl From<IoError> for CliError {
    fn from(err: IoError) -> Self {
        Self::fatal(err.to_string())
    }
}
