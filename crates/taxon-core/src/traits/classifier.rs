// SPDX-FileCopyrightText: 2026 Taxon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Zero-shot classifier capability.

use async_trait::async_trait;

use crate::error::TaxonError;
use crate::traits::adapter::PluginAdapter;

/// Multi-label zero-shot classification.
///
/// Implementations must return exactly one probability in `[0, 1]` per
/// candidate, in candidate order. Scores are independent: they are not
/// normalized to sum to 1. Implementations backed by a non-reentrant
/// engine must serialize calls internally.
#[async_trait]
pub trait ClassifierAdapter: PluginAdapter {
    /// Scores `text` against each candidate description.
    async fn classify(&self, text: &str, candidates: &[String]) -> Result<Vec<f32>, TaxonError>;
}
