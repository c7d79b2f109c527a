// SPDX-FileCopyrightText: 2026 Taxon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `taxon stats` command implementation.

use serde::Serialize;
use taxon_config::TaxonConfig;
use taxon_core::{StorageAdapter, TaxonError};
use taxon_storage::SqliteStorage;

/// One row of `--json` output.
#[derive(Debug, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub articles: i64,
}

/// Print article counts per stored category string.
pub async fn run_stats(config: &TaxonConfig, json: bool) -> Result<(), TaxonError> {
    let storage = SqliteStorage::new(config.storage.clone());
    storage.initialize().await?;
    let counts = storage.category_counts().await;
    storage.close().await?;
    let counts: Vec<CategoryCount> = counts?
        .into_iter()
        .map(|(category, articles)| CategoryCount { category, articles })
        .collect();

    if json {
        let out = serde_json::to_string_pretty(&counts)
            .map_err(|e| TaxonError::Internal(format!("failed to serialize stats: {e}")))?;
        println!("{out}");
    } else {
        let width = counts.iter().map(|c| c.category.len()).max().unwrap_or(0);
        for c in &counts {
            println!("{:<width$}  {}", c.category, c.articles);
        }
    }
    Ok(())
}
