// SPDX-FileCopyrightText: 2026 Taxon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `taxon run` command implementation.
//!
//! Reads articles from the store in id order, categorizes each one and writes
//! the comma-joined decision back. Pagination is keyset-based (`id > last`),
//! so rows that stay uncategorized are never fetched twice in one run.

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use taxon_categorize::{Categorization, Categorizer};
use taxon_classifier::ZeroShotClassifier;
use taxon_config::TaxonConfig;
use taxon_config::model::ClassifierErrorPolicy;
use taxon_core::{ArticleRecord, StorageAdapter, TaxonError};
use taxon_storage::SqliteStorage;
use tracing::{debug, info, warn};

use crate::RunArgs;

/// Knobs for one batch run.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub batch_size: usize,
    pub concurrency: usize,
    pub only_uncategorized: bool,
    pub dry_run: bool,
    pub uncategorized_label: String,
    pub on_classifier_error: ClassifierErrorPolicy,
}

impl BatchOptions {
    /// Batch settings from config, with command-line overrides applied.
    fn resolve(config: &TaxonConfig, args: &RunArgs) -> Self {
        Self {
            batch_size: args.batch_size.unwrap_or(config.batch.batch_size).max(1),
            concurrency: args.concurrency.unwrap_or(config.batch.concurrency).max(1),
            only_uncategorized: config.batch.only_uncategorized && !args.all,
            dry_run: args.dry_run,
            uncategorized_label: config.batch.uncategorized_label.clone(),
            on_classifier_error: config.batch.on_classifier_error,
        }
    }
}

/// Counters reported at the end of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Articles read from the store.
    pub processed: usize,
    /// Decisions recorded (or that would be recorded, in a dry run).
    pub categorized: usize,
    /// Recorded decisions that carried no label.
    pub uncategorized: usize,
    /// Articles whose classifier call failed and that were recorded with
    /// the keyword-only decision.
    pub keyword_fallbacks: usize,
    /// Articles left untouched after a classifier failure.
    pub skipped: usize,
}

/// Run the `taxon run` command.
pub async fn run_categorize(config: &TaxonConfig, args: RunArgs) -> Result<(), TaxonError> {
    let options = BatchOptions::resolve(config, &args);

    let storage = SqliteStorage::new(config.storage.clone());
    storage.initialize().await?;

    let classifier = Arc::new(ZeroShotClassifier::new(&config.classifier));
    let categorizer = Categorizer::new(config, classifier)?;

    info!(
        batch_size = options.batch_size,
        concurrency = options.concurrency,
        only_uncategorized = options.only_uncategorized,
        dry_run = options.dry_run,
        "starting categorization run"
    );

    let progress = ProgressBar::new_spinner();
    progress.set_style(
        ProgressStyle::with_template("{spinner} {pos} articles {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    progress.enable_steady_tick(Duration::from_millis(120));

    let outcome = run_batch(&storage, &categorizer, &options, &progress).await;
    progress.finish_and_clear();
    storage.close().await?;
    let summary = outcome?;

    println!(
        "processed {} articles: {} categorized ({} uncategorized), {} keyword fallbacks, {} skipped{}",
        summary.processed,
        summary.categorized,
        summary.uncategorized,
        summary.keyword_fallbacks,
        summary.skipped,
        if options.dry_run { " (dry run)" } else { "" },
    );
    Ok(())
}

/// Categorize every eligible article in the store.
///
/// Classifier failures are handled per article according to
/// `on_classifier_error`. Storage failures abort the run.
pub async fn run_batch(
    store: &dyn StorageAdapter,
    categorizer: &Categorizer,
    options: &BatchOptions,
    progress: &ProgressBar,
) -> Result<BatchSummary, TaxonError> {
    let mut summary = BatchSummary::default();
    let mut after_id = 0;

    loop {
        let page = store
            .fetch_articles(after_id, options.batch_size, options.only_uncategorized)
            .await?;
        let Some(last) = page.last() else {
            break;
        };
        after_id = last.id;
        debug!(rows = page.len(), after_id, "fetched page");

        let mut outcomes: Vec<(&ArticleRecord, Result<Categorization, TaxonError>)> =
            stream::iter(page.iter().map(|record| async move {
                let doc = record.to_document();
                (record, categorizer.categorize(&doc).await)
            }))
            .buffer_unordered(options.concurrency)
            .collect()
            .await;
        outcomes.sort_by_key(|(record, _)| record.id);

        for (record, outcome) in outcomes {
            summary.processed += 1;
            progress.inc(1);

            let result = match outcome {
                Ok(result) => result,
                Err(e) if e.is_classifier() => match options.on_classifier_error {
                    ClassifierErrorPolicy::Skip => {
                        warn!(article_id = record.id, error = %e, "classifier failed, skipping article");
                        summary.skipped += 1;
                        continue;
                    }
                    ClassifierErrorPolicy::KeywordOnly => {
                        warn!(article_id = record.id, error = %e, "classifier failed, using keyword rules only");
                        summary.keyword_fallbacks += 1;
                        categorizer.categorize_keywords_only(&record.to_document())
                    }
                },
                Err(e) => return Err(e),
            };

            let category = result.decision.category_string(&options.uncategorized_label);
            if result.decision.is_empty() {
                summary.uncategorized += 1;
            }
            if !options.dry_run {
                store.set_category(record.id, &category).await?;
            }
            summary.categorized += 1;
            progress.set_message(category.clone());
            info!(
                article_id = record.id,
                category = %category,
                stage = result.stage.as_str(),
                "categorized article"
            );
        }
    }

    Ok(summary)
}
