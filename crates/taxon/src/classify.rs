// SPDX-FileCopyrightText: 2026 Taxon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `taxon classify` command implementation.
//!
//! Categorizes one document given on the command line and prints the
//! decision with the stage that produced it. Useful for tuning keyword lists
//! and thresholds without touching the store.

use std::sync::Arc;

use serde::Serialize;
use taxon_categorize::{Categorization, Categorizer};
use taxon_classifier::ZeroShotClassifier;
use taxon_config::TaxonConfig;
use taxon_core::{Decision, Document, TaxonError};

use crate::ClassifyArgs;

/// Structured output for `--json` mode.
#[derive(Debug, Serialize)]
pub struct ClassifyResponse {
    pub labels: Decision,
    pub category: String,
    pub stage: &'static str,
}

impl ClassifyResponse {
    fn new(result: &Categorization, uncategorized: &str) -> Self {
        Self {
            labels: result.decision.clone(),
            category: result.decision.category_string(uncategorized),
            stage: result.stage.as_str(),
        }
    }
}

/// Run the `taxon classify` command.
pub async fn run_classify(config: &TaxonConfig, args: ClassifyArgs) -> Result<(), TaxonError> {
    // The model is loaded lazily, so keyword-only runs never download it.
    let classifier = Arc::new(ZeroShotClassifier::new(&config.classifier));
    let categorizer = Categorizer::new(config, classifier)?;

    let doc = Document::new(args.title, args.summary, args.content);
    let result = if args.keywords_only {
        categorizer.categorize_keywords_only(&doc)
    } else {
        categorizer.categorize(&doc).await?
    };

    let response = ClassifyResponse::new(&result, &config.batch.uncategorized_label);
    if args.json {
        let json = serde_json::to_string_pretty(&response)
            .map_err(|e| TaxonError::Internal(format!("failed to serialize decision: {e}")))?;
        println!("{json}");
    } else {
        println!("{} ({})", response.category, response.stage);
    }
    Ok(())
}
