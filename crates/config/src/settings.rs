// Application settings
// Loaded from appsettings.json in the working directory

use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// Model used when neither settings file names one.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
/// OpenAI-compatible API root.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    #[serde(rename = "OpenAI")]
    pub openai: OpenAiSettings,

    #[serde(rename = "Excel")]
    pub excel: ExcelSettings,
}

/// Remote service settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct OpenAiSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Model identifier. Empty = DEFAULT_MODEL.
    pub model: String,

    /// API root, e.g. a proxy or a local OpenAI-compatible server.
    /// Empty = DEFAULT_BASE_URL.
    pub base_url: String,
}

impl OpenAiSettings {
    pub fn effective_model(&self) -> &str {
        if self.model.trim().is_empty() {
            DEFAULT_MODEL
        } else {
            &self.model
        }
    }

    pub fn effective_base_url(&self) -> &str {
        let url = self.base_url.trim();
        if url.is_empty() {
            DEFAULT_BASE_URL
        } else {
            url.trim_end_matches('/')
        }
    }
}

/// Input spreadsheet settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ExcelSettings {
    pub file_path: Option<PathBuf>,

    /// 0-based worksheet position. Accepts `1` or `"1"`.
    #[serde(deserialize_with = "lenient")]
    pub worksheet_index: usize,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient<T> {
    Value(T),
    Text(String),
}

/// Accept a value either as its JSON type or as a string holding it.
/// Hand-edited settings files often quote numbers.
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr,
    T::Err: Display,
{
    match Lenient::<T>::deserialize(deserializer)? {
        Lenient::Value(v) => Ok(v),
        Lenient::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}
