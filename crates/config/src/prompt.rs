// Prompt settings
// Loaded from PromptConfig.json in the working directory

use serde::{Deserialize, Serialize};

use crate::settings::lenient;

pub const DEFAULT_MAX_TOKENS: u32 = 150;
pub const DEFAULT_TEMPERATURE: f64 = 0.2;
pub const DEFAULT_SYSTEM_MESSAGE: &str = "You are an expert QA analyzer.";
pub const DEFAULT_USER_TEMPLATE: &str = "Analyze: {Scenario}";

/// Static request parameters and prompt text.
///
/// The user template may contain `{Feature}`, `{Scenario}`, `{Steps}` and
/// `{ExpectedResult}`; they are replaced literally per test case.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct PromptSettings {
    #[serde(deserialize_with = "lenient")]
    pub max_tokens: u32,

    /// Overrides OpenAI.Model from appsettings.json when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    #[serde(deserialize_with = "lenient")]
    pub temperature: f64,

    pub system_message: String,

    pub user_template: String,
}

impl Default for PromptSettings {
    fn default() -> Self {
        Self {
            max_tokens: DEFAULT_MAX_TOKENS,
            model: None,
            temperature: DEFAULT_TEMPERATURE,
            system_message: DEFAULT_SYSTEM_MESSAGE.to_string(),
            user_template: DEFAULT_USER_TEMPLATE.to_string(),
        }
    }
}
