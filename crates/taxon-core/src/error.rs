// SPDX-FileCopyrightText: 2026 Taxon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Taxon categorization engine.

use thiserror::Error;

/// The primary error type used across all Taxon adapter traits and core operations.
#[derive(Debug, Error)]
pub enum TaxonError {
    /// Configuration errors (invalid label setup, degenerate keyword patterns).
    ///
    /// Always raised at startup, before any document is processed.
    #[error("configuration error: {0}")]
    Config(String),

    /// Zero-shot classifier errors (model unavailable, inference failure,
    /// malformed score output). Aborts only the current document.
    #[error("classifier error: {message}")]
    Classifier {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Storage backend errors (database connection, query failure, migration).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl TaxonError {
    /// Shorthand for a classifier error without an underlying source.
    pub fn classifier(message: impl Into<String>) -> Self {
        TaxonError::Classifier {
            message: message.into(),
            source: None,
        }
    }

    /// Returns true for errors raised by the classifier capability.
    pub fn is_classifier(&self) -> bool {
        matches!(self, TaxonError::Classifier { .. })
    }
}
