// SPDX-FileCopyrightText: 2026 Taxon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock classifier adapter for deterministic testing.
//!
//! `MockClassifier` implements `ClassifierAdapter` with pre-configured score
//! vectors, enabling pipeline tests without loading an ONNX model.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use taxon_core::{AdapterType, ClassifierAdapter, HealthStatus, PluginAdapter, TaxonError};

type Scripted = Result<Vec<f32>, String>;

/// A mock classifier that returns pre-configured scores.
///
/// Responses are popped from a FIFO queue. When the queue is empty, all-zero
/// scores (one per candidate) are returned. Every submitted text is recorded.
pub struct MockClassifier {
    responses: Arc<Mutex<VecDeque<Scripted>>>,
    calls: Arc<Mutex<Vec<String>>>,
    fail_all: Option<String>,
}

impl MockClassifier {
    /// Create a mock with an empty response queue.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_all: None,
        }
    }

    /// Create a mock pre-loaded with score vectors.
    pub fn with_scores(scores: Vec<Vec<f32>>) -> Self {
        let queue = scores.into_iter().map(Ok).collect();
        Self {
            responses: Arc::new(Mutex::new(queue)),
            ..Self::new()
        }
    }

    /// Create a mock whose every call fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            fail_all: Some(message.into()),
            ..Self::new()
        }
    }

    /// Queue one score vector.
    pub async fn push_scores(&self, scores: Vec<f32>) {
        self.responses.lock().await.push_back(Ok(scores));
    }

    /// Queue one failure.
    pub async fn push_error(&self, message: impl Into<String>) {
        self.responses.lock().await.push_back(Err(message.into()));
    }

    /// Texts submitted so far, in call order.
    pub async fn calls(&self) -> Vec<String> {
        self.calls.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.calls.lock().await.len()
    }
}

impl Default for MockClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockClassifier {
    fn name(&self) -> &str {
        "mock-classifier"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Classifier
    }

    async fn health_check(&self) -> Result<HealthStatus, TaxonError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), TaxonError> {
        Ok(())
    }
}

#[async_trait]
impl ClassifierAdapter for MockClassifier {
    async fn classify(&self, text: &str, candidates: &[String]) -> Result<Vec<f32>, TaxonError> {
        self.calls.lock().await.push(text.to_string());

        if let Some(message) = &self.fail_all {
            return Err(TaxonError::classifier(message.clone()));
        }

        match self.responses.lock().await.pop_front() {
            Some(Ok(scores)) => Ok(scores),
            Some(Err(message)) => Err(TaxonError::classifier(message)),
            None => Ok(vec![0.0; candidates.len()]),
        }
    }
}
