// SPDX-FileCopyrightText: 2026 Taxon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `taxon import` command implementation.
//!
//! Loads articles from JSON Lines, one object per line with `short_title`
//! (or `title`), `url`, and optional `source`, `summary` and `content`.
//! Articles whose URL is already stored are skipped.

use std::path::Path;

use taxon_config::TaxonConfig;
use taxon_core::{NewArticle, StorageAdapter, TaxonError};
use taxon_storage::SqliteStorage;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, warn};

/// Counters reported after an import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub inserted: usize,
    pub duplicates: usize,
    pub invalid: usize,
}

/// Run the `taxon import` command.
pub async fn run_import(config: &TaxonConfig, path: &Path) -> Result<(), TaxonError> {
    let file = tokio::fs::File::open(path)
        .await
        .map_err(|e| TaxonError::Internal(format!("failed to open {}: {e}", path.display())))?;

    let storage = SqliteStorage::new(config.storage.clone());
    storage.initialize().await?;
    let outcome = import_lines(&storage, BufReader::new(file)).await;
    storage.close().await?;
    let summary = outcome?;

    println!(
        "imported {} articles ({} duplicates, {} invalid lines)",
        summary.inserted, summary.duplicates, summary.invalid
    );
    Ok(())
}

/// Insert every valid line of `reader` into `store`.
///
/// Blank lines are ignored. Lines that do not parse, or that have an empty
/// URL, are logged and counted as invalid.
pub async fn import_lines<R>(store: &dyn StorageAdapter, reader: R) -> Result<ImportSummary, TaxonError>
where
    R: AsyncBufRead + Unpin,
{
    let mut summary = ImportSummary::default();
    let mut lines = reader.lines();
    let mut line_no = 0usize;

    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| TaxonError::Internal(format!("failed to read import file: {e}")))?
    {
        line_no += 1;
        if line.trim().is_empty() {
            continue;
        }

        let article: NewArticle = match serde_json::from_str(&line) {
            Ok(article) => article,
            Err(e) => {
                warn!(line = line_no, error = %e, "skipping malformed article");
                summary.invalid += 1;
                continue;
            }
        };
        if article.url.trim().is_empty() {
            warn!(line = line_no, "skipping article without url");
            summary.invalid += 1;
            continue;
        }

        match store.insert_article(&article).await? {
            Some(id) => {
                debug!(id, url = %article.url, "inserted article");
                summary.inserted += 1;
            }
            None => summary.duplicates += 1,
        }
    }

    Ok(summary)
}
