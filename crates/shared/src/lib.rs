pub mod analysis;
pub mod menu;
pub mod page;
pub mod presentation;

pub mod settings {
    use async_trait::async_trait;
    use serde::{Deserialize, Serialize};
    use thiserror::Error;

    pub const DEFAULT_MODEL_PROVIDER: &str = "Gemini";
    pub const DEFAULT_MODEL_NAME: &str = "gemini-2.0-flash";
    pub const DEFAULT_TEMPERATURE: f64 = 0.4;
    pub const DEFAULT_FREE_TIER: bool = true;
    pub const DEFAULT_RPM_LIMIT: u32 = 15;

    /// Keys under which the configuration is persisted.
    pub const PERSISTED_KEYS: [&str; 7] = [
        "geminiKey",
        "modelProvider",
        "modelName",
        "temperature",
        "freeTier",
        "rpmLimit",
        "language",
    ];

    /// User configuration, read fresh from the settings store on every menu click.
    ///
    /// Every field falls back to its default when the stored document lacks the key.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(default)]
    pub struct Configuration {
        #[serde(rename = "geminiKey")]
        pub api_key: String,
        #[serde(rename = "modelProvider")]
        pub model_provider: String,
        #[serde(rename = "modelName")]
        pub model_name: String,
        pub temperature: f64,
        #[serde(rename = "freeTier")]
        pub free_tier_enabled: bool,
        #[serde(rename = "rpmLimit")]
        pub requests_per_minute_limit: u32,
        /// Preferred report language; stored for the settings surface only.
        pub language: String,
    }

    impl Default for Configuration {
        fn default() -> Self {
            Self {
                api_key: String::new(),
                model_provider: DEFAULT_MODEL_PROVIDER.into(),
                model_name: DEFAULT_MODEL_NAME.into(),
                temperature: DEFAULT_TEMPERATURE,
                free_tier_enabled: DEFAULT_FREE_TIER,
                requests_per_minute_limit: DEFAULT_RPM_LIMIT,
                language: String::new(),
            }
        }
    }

    impl Configuration {
        /// A request may only be sent once this holds.
        pub fn has_api_key(&self) -> bool {
            !self.api_key.is_empty()
        }

        /// API key suitable for display: first and last four characters only.
        pub fn masked_api_key(&self) -> String {
            let chars: Vec<char> = self.api_key.chars().collect();
            match chars.len() {
                0 => "(not set)".to_string(),
                n if n <= 8 => "*".repeat(n),
                n => {
                    let head: String = chars[..4].iter().collect();
                    let tail: String = chars[n - 4..].iter().collect();
                    format!("{}{}{}", head, "*".repeat(n - 8), tail)
                }
            }
        }
    }

    #[derive(Debug, Error)]
    pub enum SettingsError {
        #[error("failed to access settings at {path}: {source}")]
        Io {
            path: String,
            #[source]
            source: std::io::Error,
        },
        #[error("stored settings are not valid JSON: {0}")]
        Parse(#[from] serde_json::Error),
        #[error("settings storage unavailable: {0}")]
        Unavailable(String),
    }

    /// Persistent key-value store holding the user's configuration.
    #[async_trait]
    pub trait SettingsStore: Send + Sync {
        /// Read the configuration, filling defaults for absent keys.
        async fn get(&self) -> Result<Configuration, SettingsError>;

        /// Persist the full configuration. Returning `Ok` is the acknowledgement.
        async fn set(&self, config: &Configuration) -> Result<(), SettingsError>;
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_defaults() {
            let config = Configuration::default();
            assert_eq!(config.model_provider, "Gemini");
            assert_eq!(config.model_name, "gemini-2.0-flash");
            assert_eq!(config.temperature, 0.4);
            assert!(config.free_tier_enabled);
            assert_eq!(config.requests_per_minute_limit, 15);
            assert!(!config.has_api_key());
        }

        #[test]
        fn test_partial_document_fills_defaults() {
            let config: Configuration =
                serde_json::from_str(r#"{"geminiKey": "abc", "rpmLimit": 5}"#).unwrap();
            assert_eq!(config.api_key, "abc");
            assert_eq!(config.requests_per_minute_limit, 5);
            assert_eq!(config.model_name, DEFAULT_MODEL_NAME);
            assert!(config.has_api_key());
        }

        #[test]
        fn test_serializes_with_persisted_keys() {
            let value = serde_json::to_value(Configuration::default()).unwrap();
            let object = value.as_object().unwrap();
            for key in PERSISTED_KEYS {
                assert!(object.contains_key(key), "missing key {}", key);
            }
            assert_eq!(object.len(), PERSISTED_KEYS.len());
        }

        #[test]
        fn test_masked_api_key() {
            let mut config = Configuration::default();
            assert_eq!(config.masked_api_key(), "(not set)");
            config.api_key = "short".into();
            assert_eq!(config.masked_api_key(), "*****");
            config.api_key = "AIzaSyExampleKey1234".into();
            assert_eq!(config.masked_api_key(), "AIza************1234");
        }
    }
}
