//! Backend configuration

use crate::error::BackendError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default Generative Language endpoint
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
/// Default model for structured text
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.0-flash";
/// Default model for image generation
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.0-flash-preview-image-generation";

/// Environment variables consulted for the API key, in order
const KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "GOOGLE_API_KEY"];

/// Settings for [`GeminiBackend`](crate::GeminiBackend)
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// API key; never logged
    pub api_key: String,
    /// Endpoint root, without the `/models` suffix
    pub base_url: String,
    /// Model for structured text requests
    pub text_model: String,
    /// Model for media requests
    pub image_model: String,
    /// Sampling temperature for text requests
    pub temperature: Option<f32>,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl BackendConfig {
    /// Create default configuration (no key)
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from the process environment
    ///
    /// Reads `GEMINI_API_KEY` (or `GOOGLE_API_KEY`), and optionally
    /// `BRANDSCOPE_TEXT_MODEL` and `BRANDSCOPE_IMAGE_MODEL`.
    ///
    /// # Errors
    /// [`BackendError::Configuration`] when no key is set.
    pub fn from_env() -> Result<Self, BackendError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load using an arbitrary variable lookup
    ///
    /// # Errors
    /// [`BackendError::Configuration`] when no key is found.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, BackendError> {
        let config = Self::default().fill_from(&lookup);
        config.ensure_key()?;
        Ok(config)
    }

    /// Fill unset values from a variable lookup, keeping explicit settings
    ///
    /// The key is filled when empty. A model is replaced only while it still
    /// holds its default, so a model set in a file wins over the environment.
    #[must_use]
    pub fn fill_from(mut self, lookup: &impl Fn(&str) -> Option<String>) -> Self {
        if self.api_key.is_empty() {
            if let Some(key) = KEY_VARS
                .iter()
                .find_map(|name| lookup(*name).filter(|v| !v.is_empty()))
            {
                self.api_key = key;
            }
        }
        if self.text_model == DEFAULT_TEXT_MODEL {
            if let Some(model) = lookup("BRANDSCOPE_TEXT_MODEL").filter(|v| !v.is_empty()) {
                self.text_model = model;
            }
        }
        if self.image_model == DEFAULT_IMAGE_MODEL {
            if let Some(model) = lookup("BRANDSCOPE_IMAGE_MODEL").filter(|v| !v.is_empty()) {
                self.image_model = model;
            }
        }
        self
    }

    /// Fail unless an API key is present
    ///
    /// # Errors
    /// [`BackendError::Configuration`] naming the expected variables.
    pub fn ensure_key(&self) -> Result<(), BackendError> {
        if self.api_key.is_empty() {
            return Err(BackendError::Configuration(format!(
                "no API key; set {}",
                KEY_VARS.join(" or ")
            )));
        }
        Ok(())
    }

    #[inline]
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = key.into();
        self
    }

    #[inline]
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    #[inline]
    #[must_use]
    pub fn with_text_model(mut self, model: impl Into<String>) -> Self {
        self.text_model = model.into();
        self
    }

    #[inline]
    #[must_use]
    pub fn with_image_model(mut self, model: impl Into<String>) -> Self {
        self.image_model = model.into();
        self
    }

    #[inline]
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    #[inline]
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            temperature: None,
            timeout_secs: 120,
        }
    }
}

impl fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendConfig")
            .field("api_key", &if self.api_key.is_empty() { "<unset>" } else { "***" })
            .field("base_url", &self.base_url)
            .field("text_model", &self.text_model)
            .field("image_model", &self.image_model)
            .field("temperature", &self.temperature)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn gemini_key_takes_precedence() {
        let config = BackendConfig::from_lookup(vars(&[
            ("GEMINI_API_KEY", "gem"),
            ("GOOGLE_API_KEY", "goo"),
        ]))
        .unwrap();
        assert_eq!(config.api_key, "gem");
        assert_eq!(config.text_model, DEFAULT_TEXT_MODEL);
    }

    #[test]
    fn google_key_is_fallback_and_models_override() {
        let config = BackendConfig::from_lookup(vars(&[
            ("GEMINI_API_KEY", ""),
            ("GOOGLE_API_KEY", "goo"),
            ("BRANDSCOPE_TEXT_MODEL", "gemini-2.5-flash"),
        ]))
        .unwrap();
        assert_eq!(config.api_key, "goo");
        assert_eq!(config.text_model, "gemini-2.5-flash");
        assert_eq!(config.image_model, DEFAULT_IMAGE_MODEL);
    }

    #[test]
    fn missing_key_is_configuration_error() {
        let err = BackendConfig::from_lookup(vars(&[])).unwrap_err();
        assert!(matches!(err, BackendError::Configuration(_)));
    }

    #[test]
    fn explicit_key_survives_fill() {
        let config = BackendConfig::new()
            .with_api_key("explicit")
            .fill_from(&vars(&[("GEMINI_API_KEY", "env")]));
        assert_eq!(config.api_key, "explicit");
    }

    #[test]
    fn explicit_models_survive_fill() {
        let config = BackendConfig::new()
            .with_text_model("gemini-from-file")
            .fill_from(&vars(&[
                ("BRANDSCOPE_TEXT_MODEL", "gemini-from-env"),
                ("BRANDSCOPE_IMAGE_MODEL", "imagen-from-env"),
            ]));
        assert_eq!(config.text_model, "gemini-from-file");
        assert_eq!(config.image_model, "imagen-from-env");
    }

    #[test]
    fn debug_hides_key() {
        let rendered = format!("{:?}", BackendConfig::new().with_api_key("secret"));
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("***"));
    }

    #[test]
    fn deserializes_partial_table() {
        let config: BackendConfig =
            serde_json::from_str(r#"{ "text_model": "gemini-2.5-pro", "timeout_secs": 30 }"#).unwrap();
        assert_eq!(config.text_model, "gemini-2.5-pro");
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }
}
