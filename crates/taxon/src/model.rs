// SPDX-FileCopyrightText: 2026 Taxon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `taxon fetch-model` command implementation.

use taxon_classifier::{ModelManager, ZeroShotClassifier};
use taxon_config::TaxonConfig;
use taxon_core::TaxonError;
use tracing::info;

/// Download missing model files, optionally loading the model afterwards.
pub async fn run_fetch_model(config: &TaxonConfig, verify: bool) -> Result<(), TaxonError> {
    let manager = ModelManager::from_config(&config.classifier);
    if manager.is_model_available() {
        info!(dir = %manager.model_dir().display(), "model files already present");
    }
    let model_path = manager.ensure_model().await?;
    println!("model ready at {}", model_path.display());

    if verify {
        let classifier = ZeroShotClassifier::new(&config.classifier);
        classifier.warm_up().await?;
        println!("model loaded successfully");
    }
    Ok(())
}
