// SPDX-FileCopyrightText: 2026 Taxon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory storage adapter.
//!
//! Mirrors the SQLite store's semantics (URL deduplication, id-ordered
//! keyset pagination, "NULL or empty" uncategorized filter) so batch logic can
//! be tested without touching disk.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use taxon_core::{
    AdapterType, ArticleRecord, HealthStatus, NewArticle, PluginAdapter, StorageAdapter,
    TaxonError,
};

#[derive(Debug, Default)]
struct Inner {
    next_id: i64,
    rows: BTreeMap<i64, (String, ArticleRecord)>,
    writes: usize,
}

/// Article store backed by a `BTreeMap`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a document-only article and return its id.
    pub async fn seed(&self, title: &str, summary: &str, content: &str) -> i64 {
        let mut inner = self.inner.lock().await;
        inner.next_id += 1;
        let id = inner.next_id;
        let record = ArticleRecord {
            id,
            title: Some(title.to_string()),
            summary: Some(summary.to_string()),
            content: Some(content.to_string()),
            category: None,
        };
        inner.rows.insert(id, (format!("memory://{id}"), record));
        id
    }

    /// Current category of an article.
    pub async fn category(&self, id: i64) -> Option<String> {
        self.inner
            .lock()
            .await
            .rows
            .get(&id)
            .and_then(|(_, r)| r.category.clone())
    }

    /// Number of `set_category` calls so far.
    pub async fn write_count(&self) -> usize {
        self.inner.lock().await.writes
    }
}

#[async_trait]
impl PluginAdapter for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, TaxonError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), TaxonError> {
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for MemoryStore {
    async fn initialize(&self) -> Result<(), TaxonError> {
        Ok(())
    }

    async fn close(&self) -> Result<(), TaxonError> {
        Ok(())
    }

    async fn insert_article(&self, article: &NewArticle) -> Result<Option<i64>, TaxonError> {
        let mut inner = self.inner.lock().await;
        if inner.rows.values().any(|(url, _)| *url == article.url) {
            return Ok(None);
        }
        inner.next_id += 1;
        let id = inner.next_id;
        let record = ArticleRecord {
            id,
            title: Some(article.short_title.clone()),
            summary: article.summary.clone(),
            content: article.content.clone(),
            category: None,
        };
        inner.rows.insert(id, (article.url.clone(), record));
        Ok(Some(id))
    }

    async fn fetch_articles(
        &self,
        after_id: i64,
        limit: usize,
        only_uncategorized: bool,
    ) -> Result<Vec<ArticleRecord>, TaxonError> {
        let inner = self.inner.lock().await;
        Ok(inner
            .rows
            .range(after_id + 1..)
            .map(|(_, (_, r))| r)
            .filter(|r| !only_uncategorized || r.category.as_deref().is_none_or(str::is_empty))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn set_category(&self, article_id: i64, category: &str) -> Result<(), TaxonError> {
        let mut inner = self.inner.lock().await;
        inner.writes += 1;
        match inner.rows.get_mut(&article_id) {
            Some((_, record)) => {
                record.category = Some(category.to_string());
                Ok(())
            }
            None => Err(TaxonError::Storage {
                source: format!("article {article_id} not found").into(),
            }),
        }
    }
}
