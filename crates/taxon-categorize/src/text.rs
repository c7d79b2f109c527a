// SPDX-FileCopyrightText: 2026 Taxon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Weighted text composition.
//!
//! Repeating the title raises its influence on keyword counting and keeps it
//! inside the classifier's truncation window.

use taxon_config::model::TextConfig;
use taxon_core::{truncate_chars, Document};

/// Builds the text blob fed to keyword matching and the classifier.
#[derive(Debug, Clone)]
pub struct TextBuilder {
    title_weight: usize,
    summary_weight: usize,
    content_slice: usize,
}

impl TextBuilder {
    pub fn new(title_weight: usize, summary_weight: usize, content_slice: usize) -> Self {
        Self {
            title_weight,
            summary_weight,
            content_slice,
        }
    }

    pub fn from_config(config: &TextConfig) -> Self {
        Self::new(
            config.title_weight,
            config.summary_weight,
            config.content_slice,
        )
    }

    /// Title repeated `title_weight` times, then summary repeated
    /// `summary_weight` times, then (if `include_content`) the first
    /// `content_slice` characters of content. Empty parts are dropped, the
    /// rest joined with single spaces and the result trimmed.
    pub fn build(&self, doc: &Document, include_content: bool) -> String {
        let title = doc.title.trim();
        let summary = doc.summary.trim();
        let content = if include_content {
            truncate_chars(&doc.content, self.content_slice)
        } else {
            ""
        };

        let mut parts = Vec::with_capacity(self.title_weight + self.summary_weight + 1);
        parts.extend(std::iter::repeat_n(title, self.title_weight));
        parts.extend(std::iter::repeat_n(summary, self.summary_weight));
        parts.push(content);
        parts.retain(|p| !p.is_empty());
        parts.join(" ").trim().to_string()
    }
}

impl Default for TextBuilder {
    fn default() -> Self {
        Self::from_config(&TextConfig::default())
    }
}
