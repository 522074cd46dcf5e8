// Configuration loading
//
// Two JSON files are read from one directory (the working directory in
// production): application settings and prompt settings. They are merged
// into a single read-only `Config` at startup.

pub mod ai;
pub mod prompt;
pub mod settings;

use std::fs;
use std::path::{Path, PathBuf};

pub use ai::{KeyLookup, KeySource, PLACEHOLDER_API_KEY};
pub use prompt::PromptSettings;
pub use settings::{AppSettings, ExcelSettings, OpenAiSettings};

/// File name of the application settings.
pub const APP_SETTINGS_FILE: &str = "appsettings.json";
/// File name of the prompt settings.
pub const PROMPT_SETTINGS_FILE: &str = "PromptConfig.json";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("configuration file not found: {}", .0.display())]
    MissingFile(PathBuf),
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid JSON in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("OpenAI API key not configured")]
    MissingApiKey,
    #[error("OpenAI API key is still the placeholder value")]
    PlaceholderApiKey,
    #[error("input spreadsheet path (Excel.FilePath) not configured")]
    MissingInputPath,
}

impl ConfigError {
    /// One-line advice for the operator, if there is something to do.
    pub fn hint(&self) -> Option<String> {
        match self {
            ConfigError::MissingApiKey | ConfigError::PlaceholderApiKey => Some(format!(
                "set OpenAI.ApiKey in {} or the {} environment variable",
                APP_SETTINGS_FILE,
                ai::env_var_name(ai::PROVIDER),
            )),
            ConfigError::MissingInputPath => {
                Some(format!("set Excel.FilePath in {}", APP_SETTINGS_FILE))
            }
            ConfigError::MissingFile(_) => {
                Some("run casecheck from the directory holding its configuration".to_string())
            }
            _ => None,
        }
    }
}

/// The effective configuration for one run.
#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppSettings,
    pub prompt: PromptSettings,
    /// Resolved credential, never the placeholder.
    pub api_key: String,
    pub key_source: KeySource,
    /// Input spreadsheet, resolved against the configuration directory.
    pub input_path: PathBuf,
}

impl Config {
    /// Load and merge both configuration files from `dir`.
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        let app: AppSettings = read_json(&dir.join(APP_SETTINGS_FILE))?;
        let prompt: PromptSettings = read_json(&dir.join(PROMPT_SETTINGS_FILE))?;
        Self::from_parts(dir, app, prompt)
    }

    /// Validate already-parsed settings and resolve the API key.
    pub fn from_parts(
        dir: &Path,
        app: AppSettings,
        prompt: PromptSettings,
    ) -> Result<Self, ConfigError> {
        let lookup = ai::get_api_key(app.openai.api_key.as_deref());
        let api_key = match lookup.key {
            Some(key) => key,
            None if ai::is_placeholder(app.openai.api_key.as_deref()) => {
                return Err(ConfigError::PlaceholderApiKey)
            }
            None => return Err(ConfigError::MissingApiKey),
        };

        let input_path = app
            .excel
            .file_path
            .as_ref()
            .filter(|p| !p.as_os_str().is_empty())
            .map(|p| if p.is_absolute() { p.clone() } else { dir.join(p) })
            .ok_or(ConfigError::MissingInputPath)?;

        tracing::debug!(
            source = lookup.source.as_str(),
            input = %input_path.display(),
            "configuration loaded"
        );

        Ok(Self {
            app,
            prompt,
            api_key,
            key_source: lookup.source,
            input_path,
        })
    }

    /// Model used for requests: the prompt override if present, else the
    /// application model.
    pub fn model(&self) -> &str {
        self.prompt
            .model
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(self.app.openai.effective_model())
    }

    pub fn base_url(&self) -> &str {
        self.app.openai.effective_base_url()
    }

    pub fn worksheet_index(&self) -> usize {
        self.app.excel.worksheet_index
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()));
    }
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(text.trim_start_matches('\u{feff}')).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
