//! Engine configuration

use serde::{Deserialize, Serialize};

/// Settings shared by every flow built on one [`FlowExecutor`](crate::FlowExecutor)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Check caller input against the flow's input schema before rendering
    pub validate_input: bool,
    /// Emit full rendered prompts at `debug` level
    pub log_prompts: bool,
}

impl EngineConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn with_validate_input(mut self, enabled: bool) -> Self {
        self.validate_input = enabled;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_log_prompts(mut self, enabled: bool) -> Self {
        self.log_prompts = enabled;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            validate_input: true,
            log_prompts: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate_input() {
        let config = EngineConfig::new();
        assert!(config.validate_input);
        assert!(!config.log_prompts);
    }

    #[test]
    fn missing_keys_take_defaults() {
        let config: EngineConfig = serde_json::from_str(r#"{ "log_prompts": true }"#).unwrap();
        assert!(config.validate_input);
        assert!(config.log_prompts);
    }
}
