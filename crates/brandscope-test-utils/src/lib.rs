//! Testing utilities for the brandscope workspace
//!
//! A scripted [`GenerationBackend`] and JSON fixtures for flow outputs.

#![allow(missing_docs)]

pub mod fixtures;

use async_trait::async_trait;
use brandscope_backend::{
    BackendError, GenerationBackend, GenerationRequest, GenerationResponse, MediaOutput,
};
use parking_lot::Mutex;
use serde_json::Value;
use std::time::Duration;

#[derive(Debug, Clone)]
enum Reply {
    Text(String),
    Media(MediaOutput),
    Empty,
    Fail(BackendError),
}

#[derive(Debug, Clone)]
struct Rule {
    pattern: String,
    reply: Reply,
    delay: Option<Duration>,
}

impl Rule {
    fn matches(&self, request: &GenerationRequest) -> bool {
        let kind_ok = match self.reply {
            Reply::Text(_) => !request.is_media(),
            Reply::Media(_) => request.is_media(),
            Reply::Empty | Reply::Fail(_) => true,
        };
        kind_ok && request.prompt().contains(&self.pattern)
    }
}

/// Backend answering from rules matched by prompt substring
///
/// Rules are tried in the order they were added. Text rules only answer
/// structured requests and media rules only answer media requests. A request
/// no rule matches fails with [`BackendError::InvalidResponse`].
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    rules: Vec<Rule>,
    calls: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer structured requests containing `pattern` with `value`
    #[must_use]
    pub fn respond_json(self, pattern: &str, value: Value) -> Self {
        self.respond_text(pattern, value.to_string())
    }

    /// Answer structured requests containing `pattern` with raw text
    #[must_use]
    pub fn respond_text(self, pattern: &str, text: impl Into<String>) -> Self {
        self.rule(pattern, Reply::Text(text.into()))
    }

    /// Answer media requests containing `pattern` with one inline image
    #[must_use]
    pub fn respond_media(self, pattern: &str, mime: &str, base64_data: &str) -> Self {
        self.rule(pattern, Reply::Media(MediaOutput::inline(mime, base64_data)))
    }

    /// Answer any request containing `pattern` with neither text nor media
    #[must_use]
    pub fn respond_empty(self, pattern: &str) -> Self {
        self.rule(pattern, Reply::Empty)
    }

    /// Fail any request containing `pattern`
    #[must_use]
    pub fn fail(self, pattern: &str, error: BackendError) -> Self {
        self.rule(pattern, Reply::Fail(error))
    }

    /// Delay the most recently added rule
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        if let Some(rule) = self.rules.last_mut() {
            rule.delay = Some(delay);
        }
        self
    }

    /// Requests received so far, in arrival order
    pub fn calls(&self) -> Vec<GenerationRequest> {
        self.calls.lock().clone()
    }

    /// Prompts received so far, in arrival order
    pub fn prompts(&self) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .map(|request| request.prompt().to_string())
            .collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    fn rule(mut self, pattern: &str, reply: Reply) -> Self {
        self.rules.push(Rule {
            pattern: pattern.to_string(),
            reply,
            delay: None,
        });
        self
    }
}

#[async_trait]
impl GenerationBackend for ScriptedBackend {
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse, BackendError> {
        self.calls.lock().push(request.clone());

        let Some(rule) = self.rules.iter().find(|rule| rule.matches(&request)) else {
            return Err(BackendError::InvalidResponse(format!(
                "no scripted reply for prompt: {}",
                request.prompt()
            )));
        };

        if let Some(delay) = rule.delay {
            tokio::time::sleep(delay).await;
        }

        match &rule.reply {
            Reply::Text(text) => Ok(GenerationResponse::text(text.clone())),
            Reply::Media(media) => Ok(GenerationResponse::default().with_media(media.clone())),
            Reply::Empty => Ok(GenerationResponse::default()),
            Reply::Fail(error) => Err(error.clone()),
        }
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}
