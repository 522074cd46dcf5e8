// API key resolution
//
// Keys are looked up in order:
// 1. OpenAI.ApiKey in appsettings.json
// 2. Environment variable (CASECHECK_OPENAI_KEY)
// 3. System keychain (only with the `keychain` feature)
//
// Blank values and the shipped placeholder count as "not set".

use std::env;

/// Provider the analyzer talks to.
pub const PROVIDER: &str = "openai";

/// Value shipped in the sample appsettings.json.
pub const PLACEHOLDER_API_KEY: &str = "YOUR-ACTUAL-API-KEY-HERE";

/// Service name for keychain storage
#[cfg(feature = "keychain")]
const KEYCHAIN_SERVICE: &str = "casecheck";

/// Source of an API key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    /// Key taken from appsettings.json
    ConfigFile,
    /// Key retrieved from environment variable
    Environment,
    /// Key retrieved from system keychain
    Keychain,
    /// No key found
    None,
}

impl KeySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeySource::ConfigFile => "config file",
            KeySource::Environment => "environment",
            KeySource::Keychain => "keychain",
            KeySource::None => "none",
        }
    }
}

/// Result of key lookup
#[derive(Debug, Clone)]
pub struct KeyLookup {
    pub key: Option<String>,
    pub source: KeySource,
}

/// Get the environment variable name for a provider
pub fn env_var_name(provider: &str) -> String {
    format!("CASECHECK_{}_KEY", provider.to_uppercase())
}

/// Get the keychain account name for a provider
#[cfg(feature = "keychain")]
fn keychain_account(provider: &str) -> String {
    format!("ai/{}", provider.to_lowercase())
}

/// True when the configured value is the untouched sample placeholder.
pub fn is_placeholder(value: Option<&str>) -> bool {
    value.map(str::trim) == Some(PLACEHOLDER_API_KEY)
}

fn usable(value: Option<&str>) -> Option<String> {
    let v = value?.trim();
    if v.is_empty() || v == PLACEHOLDER_API_KEY {
        None
    } else {
        Some(v.to_string())
    }
}

/// Resolve the API key, starting from the value found in the config file.
pub fn get_api_key(configured: Option<&str>) -> KeyLookup {
    lookup_with(configured, |name| env::var(name).ok())
}

fn lookup_with(configured: Option<&str>, env_lookup: impl Fn(&str) -> Option<String>) -> KeyLookup {
    if let Some(key) = usable(configured) {
        return KeyLookup {
            key: Some(key),
            source: KeySource::ConfigFile,
        };
    }

    if let Some(key) = usable(env_lookup(&env_var_name(PROVIDER)).as_deref()) {
        return KeyLookup {
            key: Some(key),
            source: KeySource::Environment,
        };
    }

    #[cfg(feature = "keychain")]
    {
        if let Ok(entry) = keyring::Entry::new(KEYCHAIN_SERVICE, &keychain_account(PROVIDER)) {
            if let Ok(key) = entry.get_password() {
                if let Some(key) = usable(Some(&key)) {
                    return KeyLookup {
                        key: Some(key),
                        source: KeySource::Keychain,
                    };
                }
            }
        }
    }

    KeyLookup {
        key: None,
        source: KeySource::None,
    }
}
