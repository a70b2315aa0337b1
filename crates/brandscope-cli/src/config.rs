//! File configuration for the command-line runner

use anyhow::Context;
use brandscope_backend::BackendConfig;
use brandscope_core::EngineConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Contents of a `brandscope.toml`
///
/// ```toml
/// [engine]
/// validate_input = true
///
/// [backend]
/// text_model = "gemini-2.0-flash"
/// timeout_secs = 120
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct CliConfig {
    pub(crate) engine: EngineConfig,
    pub(crate) backend: BackendConfig,
}

impl CliConfig {
    /// Read `path` when given, otherwise start from defaults
    pub(crate) fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Backend settings with unset values taken from the environment
    pub(crate) fn backend_from_env(&self) -> anyhow::Result<BackendConfig> {
        self.backend_with(|name| std::env::var(name).ok())
    }

    fn backend_with(&self, lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<BackendConfig> {
        let backend = self.backend.clone().fill_from(&lookup);
        backend.ensure_key()?;
        Ok(backend)
    }
}
