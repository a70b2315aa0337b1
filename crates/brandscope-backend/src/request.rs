//! Request and response shapes for one backend call

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One logical generation call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum GenerationRequest {
    /// JSON text constrained by a response schema
    #[serde(rename_all = "camelCase")]
    Structured {
        prompt: String,
        response_schema: Value,
    },
    /// Generated media (one image) for a prompt
    Media { prompt: String },
}

impl GenerationRequest {
    #[inline]
    #[must_use]
    pub fn structured(prompt: impl Into<String>, response_schema: Value) -> Self {
        Self::Structured {
            prompt: prompt.into(),
            response_schema,
        }
    }

    #[inline]
    #[must_use]
    pub fn media(prompt: impl Into<String>) -> Self {
        Self::Media {
            prompt: prompt.into(),
        }
    }

    #[inline]
    #[must_use]
    pub fn prompt(&self) -> &str {
        match self {
            Self::Structured { prompt, .. } | Self::Media { prompt } => prompt,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_media(&self) -> bool {
        matches!(self, Self::Media { .. })
    }
}

/// Generated media, addressed by URL (usually a `data:` URI)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaOutput {
    pub content_type: String,
    pub url: String,
}

impl MediaOutput {
    /// Build a `data:<mime>;base64,<data>` URI from inline base64 payload
    #[must_use]
    pub fn inline(content_type: impl Into<String>, base64_data: &str) -> Self {
        let content_type = content_type.into();
        let url = format!("data:{content_type};base64,{base64_data}");
        Self { content_type, url }
    }
}

/// Raw backend output, before any contract checks
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResponse {
    /// Concatenated text parts, if any
    pub text: Option<String>,
    /// Media parts in response order
    #[serde(default)]
    pub media: Vec<MediaOutput>,
}

impl GenerationResponse {
    #[inline]
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            media: Vec::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn with_media(mut self, media: MediaOutput) -> Self {
        self.media.push(media);
        self
    }

    /// Text if present and not whitespace only
    #[must_use]
    pub fn non_empty_text(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_media_builds_data_uri() {
        let media = MediaOutput::inline("image/png", "iVBORw0KGgo=");
        assert_eq!(media.url, "data:image/png;base64,iVBORw0KGgo=");
        assert_eq!(media.content_type, "image/png");
    }

    #[test]
    fn blank_text_is_empty() {
        assert!(GenerationResponse::text("  \n").non_empty_text().is_none());
        assert!(GenerationResponse::default().non_empty_text().is_none());
        assert_eq!(GenerationResponse::text("{}").non_empty_text(), Some("{}"));
    }
}
