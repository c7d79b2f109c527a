// SPDX-FileCopyrightText: 2026 Taxon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Zero-shot classifier adapter.
//!
//! Constructed once at startup and shared as `Arc<dyn ClassifierAdapter>`.
//! The model is loaded lazily on the first non-empty `classify` call and
//! reused for the lifetime of the adapter.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use taxon_config::model::ClassifierConfig;
use taxon_core::{
    truncate_chars, AdapterType, ClassifierAdapter, HealthStatus, PluginAdapter, TaxonError,
};
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::model_manager::ModelManager;
use crate::nli::{NliSettings, OnnxNliModel};

/// Loads the scoring model on first use.
#[async_trait]
pub trait ModelLoader: Send + Sync {
    async fn load(&self) -> Result<Arc<dyn PairScorer>, TaxonError>;
}

/// Scores a premise against every candidate.
pub trait PairScorer: Send + Sync {
    fn score(&self, premise: &str, candidates: &[String]) -> Result<Vec<f32>, TaxonError>;
}

impl PairScorer for OnnxNliModel {
    fn score(&self, premise: &str, candidates: &[String]) -> Result<Vec<f32>, TaxonError> {
        OnnxNliModel::score(self, premise, candidates)
    }
}

/// Downloads (if needed) and loads the ONNX NLI model.
pub struct OnnxLoader {
    manager: ModelManager,
    settings: NliSettings,
}

impl OnnxLoader {
    pub fn new(config: &ClassifierConfig) -> Self {
        Self {
            manager: ModelManager::from_config(config),
            settings: NliSettings::from(config),
        }
    }
}

#[async_trait]
impl ModelLoader for OnnxLoader {
    async fn load(&self) -> Result<Arc<dyn PairScorer>, TaxonError> {
        let model_path = self.manager.ensure_model().await?;
        let tokenizer_path = self.manager.tokenizer_path();
        let settings = self.settings.clone();

        let started = Instant::now();
        // Session creation is CPU-bound; keep it off the async workers.
        let model = tokio::task::spawn_blocking(move || {
            OnnxNliModel::new(&model_path, &tokenizer_path, settings)
        })
        .await
        .map_err(|e| TaxonError::classifier(format!("model load task failed: {e}")))??;

        info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            "classifier model loaded"
        );
        Ok(Arc::new(model))
    }
}

/// Zero-shot multi-label classifier with lazy, at-most-once model loading.
pub struct ZeroShotClassifier {
    loader: Box<dyn ModelLoader>,
    model: OnceCell<Arc<dyn PairScorer>>,
    max_input_chars: usize,
}

impl ZeroShotClassifier {
    /// ONNX-backed classifier from configuration. Nothing is loaded yet.
    pub fn new(config: &ClassifierConfig) -> Self {
        Self::with_loader(Box::new(OnnxLoader::new(config)), config.max_input_chars)
    }

    pub fn with_loader(loader: Box<dyn ModelLoader>, max_input_chars: usize) -> Self {
        Self {
            loader,
            model: OnceCell::new(),
            max_input_chars,
        }
    }

    /// Force the model to load now instead of on the first call.
    pub async fn warm_up(&self) -> Result<(), TaxonError> {
        self.model().await.map(|_| ())
    }

    async fn model(&self) -> Result<&Arc<dyn PairScorer>, TaxonError> {
        self.model.get_or_try_init(|| self.loader.load()).await
    }
}

#[async_trait]
impl PluginAdapter for ZeroShotClassifier {
    fn name(&self) -> &str {
        "onnx-zero-shot"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Classifier
    }

    async fn health_check(&self) -> Result<HealthStatus, TaxonError> {
        if self.model.initialized() {
            Ok(HealthStatus::Healthy)
        } else {
            Ok(HealthStatus::Degraded("model not loaded yet".to_string()))
        }
    }

    async fn shutdown(&self) -> Result<(), TaxonError> {
        Ok(())
    }
}

#[async_trait]
impl ClassifierAdapter for ZeroShotClassifier {
    async fn classify(&self, text: &str, candidates: &[String]) -> Result<Vec<f32>, TaxonError> {
        let text = truncate_chars(text, self.max_input_chars);
        if text.trim().is_empty() || candidates.is_empty() {
            return Ok(vec![0.0; candidates.len()]);
        }

        let model = Arc::clone(self.model().await?);
        let premise = text.to_string();
        let owned = candidates.to_vec();
        let started = Instant::now();
        // Inference is CPU-bound; the scorer serializes its own session access.
        let scores = tokio::task::spawn_blocking(move || model.score(&premise, &owned))
            .await
            .map_err(|e| TaxonError::classifier(format!("inference task failed: {e}")))??;
        metrics::histogram!("taxon_classifier_inference_seconds")
            .record(started.elapsed().as_secs_f64());

        if scores.len() != candidates.len() {
            return Err(TaxonError::classifier(format!(
                "expected {} scores, model produced {}",
                candidates.len(),
                scores.len()
            )));
        }
        if let Some(bad) = scores.iter().find(|s| !s.is_finite()) {
            return Err(TaxonError::classifier(format!("model produced score {bad}")));
        }

        debug!(chars = text.chars().count(), candidates = candidates.len(), "classified");
        Ok(scores.into_iter().map(|s| s.clamp(0.0, 1.0)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedScorer(Vec<f32>);

    impl PairScorer for FixedScorer {
        fn score(&self, _premise: &str, _candidates: &[String]) -> Result<Vec<f32>, TaxonError> {
            Ok(self.0.clone())
        }
    }

    struct CountingLoader {
        loads: Arc<AtomicUsize>,
        scores: Vec<f32>,
    }

    #[async_trait]
    impl ModelLoader for CountingLoader {
        async fn load(&self) -> Result<Arc<dyn PairScorer>, TaxonError> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(FixedScorer(self.scores.clone())))
        }
    }

    struct FailingLoader;

    #[async_trait]
    impl ModelLoader for FailingLoader {
        async fn load(&self) -> Result<Arc<dyn PairScorer>, TaxonError> {
            Err(TaxonError::classifier("model unavailable"))
        }
    }

    fn candidates() -> Vec<String> {
        vec!["a".into(), "b".into(), "c".into()]
    }

    fn classifier(scores: Vec<f32>) -> (ZeroShotClassifier, Arc<AtomicUsize>) {
        let loads = Arc::new(AtomicUsize::new(0));
        let loader = CountingLoader {
            loads: loads.clone(),
            scores,
        };
        (ZeroShotClassifier::with_loader(Box::new(loader), 1200), loads)
    }

    #[tokio::test]
    async fn model_loads_once_across_calls() {
        let (clf, loads) = classifier(vec![0.1, 0.2, 0.3]);
        for _ in 0..3 {
            clf.classify("some text", &candidates()).await.unwrap();
        }
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn empty_text_returns_zeros_without_loading() {
        let (clf, loads) = classifier(vec![0.1, 0.2, 0.3]);
        let scores = clf.classify("   ", &candidates()).await.unwrap();
        assert_eq!(scores, vec![0.0, 0.0, 0.0]);
        assert_eq!(loads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn wrong_cardinality_is_rejected() {
        let (clf, _) = classifier(vec![0.1, 0.2]);
        let err = clf.classify("text", &candidates()).await.unwrap_err();
        assert!(err.is_classifier());
    }

    #[tokio::test]
    async fn load_failure_is_a_classifier_error() {
        let clf = ZeroShotClassifier::with_loader(Box::new(FailingLoader), 1200);
        let err = clf.classify("text", &candidates()).await.unwrap_err();
        assert!(err.is_classifier());
        assert!(matches!(
            clf.health_check().await.unwrap(),
            HealthStatus::Degraded(_)
        ));
    }

    #[tokio::test]
    async fn health_turns_healthy_after_load() {
        let (clf, _) = classifier(vec![0.1, 0.2, 0.3]);
        assert!(matches!(
            clf.health_check().await.unwrap(),
            HealthStatus::Degraded(_)
        ));
        clf.warm_up().await.unwrap();
        assert_eq!(clf.health_check().await.unwrap(), HealthStatus::Healthy);
    }
}
