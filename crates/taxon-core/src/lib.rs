// SPDX-FileCopyrightText: 2026 Taxon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Taxon categorization engine.
//!
//! This crate provides the closed [`Label`] taxonomy, the per-call value
//! types ([`Document`], [`ScoreVector`], [`Decision`]), the shared error
//! type, and the adapter traits implemented by the classifier and storage
//! crates.

pub mod error;
pub mod text;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::TaxonError;
pub use text::truncate_chars;
pub use types::{
    AdapterType, ArticleRecord, Decision, Document, HealthStatus, Label, NewArticle, ScoreVector,
};

// Re-export all adapter traits at crate root.
pub use traits::{ClassifierAdapter, PluginAdapter, StorageAdapter};
