// SPDX-FileCopyrightText: 2026 Taxon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Article storage and category sink.

use async_trait::async_trait;

use crate::error::TaxonError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{ArticleRecord, NewArticle};

/// Persistence collaborator for batch categorization.
///
/// The categorization core never talks to storage directly; the batch
/// runner reads articles through this trait and records decisions with
/// [`StorageAdapter::set_category`].
#[async_trait]
pub trait StorageAdapter: PluginAdapter {
    /// Opens the backend and applies pending migrations.
    async fn initialize(&self) -> Result<(), TaxonError>;

    /// Flushes and closes the backend.
    async fn close(&self) -> Result<(), TaxonError>;

    /// Inserts an article. Returns `None` when the URL already exists.
    async fn insert_article(&self, article: &NewArticle) -> Result<Option<i64>, TaxonError>;

    /// Fetches up to `limit` articles with `id > after_id`, ordered by id.
    ///
    /// With `only_uncategorized`, rows whose category is NULL or empty are
    /// returned exclusively.
    async fn fetch_articles(
        &self,
        after_id: i64,
        limit: usize,
        only_uncategorized: bool,
    ) -> Result<Vec<ArticleRecord>, TaxonError>;

    /// Records the rendered category string for an article.
    async fn set_category(&self, article_id: i64, category: &str) -> Result<(), TaxonError>;
}
