// SPDX-FileCopyrightText: 2026 Taxon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! ONNX natural-language-inference model for zero-shot scoring.
//!
//! Each candidate is scored independently: the text is the premise, the
//! candidate description filled into a hypothesis template is the hypothesis,
//! and the probability is the softmax over the contradiction and entailment
//! logits. Candidates never compete with each other.

use std::path::Path;
use std::sync::Mutex;

use ndarray::Array2;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::TensorRef;
use taxon_config::model::ClassifierConfig;
use taxon_core::TaxonError;
use tokenizers::{Tokenizer, TruncationParams, TruncationStrategy};

/// Settings that shape NLI inputs and outputs.
#[derive(Debug, Clone)]
pub struct NliSettings {
    pub hypothesis_template: String,
    pub max_tokens: usize,
    pub entailment_index: usize,
    pub contradiction_index: usize,
    pub use_token_type_ids: bool,
    pub intra_threads: usize,
}

impl From<&ClassifierConfig> for NliSettings {
    fn from(config: &ClassifierConfig) -> Self {
        Self {
            hypothesis_template: config.hypothesis_template.clone(),
            max_tokens: config.max_tokens,
            entailment_index: config.entailment_index,
            contradiction_index: config.contradiction_index,
            use_token_type_ids: config.use_token_type_ids,
            intra_threads: config.intra_threads,
        }
    }
}

/// An MNLI-style sequence-pair classifier loaded from disk.
pub struct OnnxNliModel {
    /// ONNX Runtime session (not Send, wrapped in Mutex for safety).
    session: Mutex<Session>,
    tokenizer: Tokenizer,
    settings: NliSettings,
}

// Safety: Session is accessed through Mutex which provides synchronization.
// The tokenizer is thread-safe for encoding operations.
unsafe impl Send for OnnxNliModel {}
unsafe impl Sync for OnnxNliModel {}

impl OnnxNliModel {
    /// Loads the model and tokenizer files.
    pub fn new(
        model_path: &Path,
        tokenizer_path: &Path,
        settings: NliSettings,
    ) -> Result<Self, TaxonError> {
        let mut tokenizer = Tokenizer::from_file(tokenizer_path).map_err(|e| {
            TaxonError::classifier(format!(
                "failed to load tokenizer from {}: {e}",
                tokenizer_path.display()
            ))
        })?;
        // Only the premise is cut; the short hypothesis always survives.
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: settings.max_tokens,
                strategy: TruncationStrategy::OnlyFirst,
                ..Default::default()
            }))
            .map_err(|e| TaxonError::classifier(format!("invalid truncation settings: {e}")))?;
        tokenizer.with_padding(None);

        let session = Session::builder()
            .map_err(|e| TaxonError::classifier(format!("failed to create ONNX session builder: {e}")))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| TaxonError::classifier(format!("failed to set optimization level: {e}")))?
            .with_intra_threads(settings.intra_threads)
            .map_err(|e| TaxonError::classifier(format!("failed to set thread count: {e}")))?
            .commit_from_file(model_path)
            .map_err(|e| {
                TaxonError::classifier(format!(
                    "failed to load ONNX model from {}: {e}",
                    model_path.display()
                ))
            })?;

        Ok(Self {
            session: Mutex::new(session),
            tokenizer,
            settings,
        })
    }

    /// One entailment probability per candidate, in candidate order.
    pub fn score(&self, premise: &str, candidates: &[String]) -> Result<Vec<f32>, TaxonError> {
        candidates
            .iter()
            .map(|candidate| {
                let hypothesis = hypothesis(&self.settings.hypothesis_template, candidate);
                let logits = self.pair_logits(premise, &hypothesis)?;
                entailment_probability(
                    &logits,
                    self.settings.entailment_index,
                    self.settings.contradiction_index,
                )
            })
            .collect()
    }

    fn pair_logits(&self, premise: &str, hypothesis: &str) -> Result<Vec<f32>, TaxonError> {
        let encoding = self
            .tokenizer
            .encode((premise, hypothesis), true)
            .map_err(|e| TaxonError::classifier(format!("tokenization failed: {e}")))?;

        let input_ids: Vec<i64> = encoding.get_ids().iter().map(|&id| id as i64).collect();
        let attention_mask: Vec<i64> = encoding
            .get_attention_mask()
            .iter()
            .map(|&m| m as i64)
            .collect();
        let seq_len = input_ids.len();

        let input_ids_array = Array2::from_shape_vec((1, seq_len), input_ids).map_err(|e| {
            TaxonError::classifier(format!("failed to create input_ids tensor: {e}"))
        })?;
        let attention_mask_array =
            Array2::from_shape_vec((1, seq_len), attention_mask).map_err(|e| {
                TaxonError::classifier(format!("failed to create attention_mask tensor: {e}"))
            })?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| TaxonError::classifier(format!("failed to lock ONNX session: {e}")))?;

        let input_ids_tensor = TensorRef::from_array_view(&input_ids_array).map_err(|e| {
            TaxonError::classifier(format!("failed to create input_ids TensorRef: {e}"))
        })?;
        let attention_mask_tensor =
            TensorRef::from_array_view(&attention_mask_array).map_err(|e| {
                TaxonError::classifier(format!("failed to create attention_mask TensorRef: {e}"))
            })?;

        let outputs = if self.settings.use_token_type_ids {
            let type_ids: Vec<i64> = encoding.get_type_ids().iter().map(|&t| t as i64).collect();
            let type_ids_array = Array2::from_shape_vec((1, seq_len), type_ids).map_err(|e| {
                TaxonError::classifier(format!("failed to create token_type_ids tensor: {e}"))
            })?;
            let type_ids_tensor = TensorRef::from_array_view(&type_ids_array).map_err(|e| {
                TaxonError::classifier(format!("failed to create token_type_ids TensorRef: {e}"))
            })?;
            session.run(ort::inputs![
                "input_ids" => input_ids_tensor,
                "attention_mask" => attention_mask_tensor,
                "token_type_ids" => type_ids_tensor
            ])
        } else {
            session.run(ort::inputs![
                "input_ids" => input_ids_tensor,
                "attention_mask" => attention_mask_tensor
            ])
        }
        .map_err(|e| TaxonError::classifier(format!("ONNX inference failed: {e}")))?;

        // Output: logits of shape [1, num_classes].
        let (_shape, data) = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(|e| TaxonError::classifier(format!("failed to extract logits: {e}")))?;

        Ok(data.to_vec())
    }
}

/// Fill the hypothesis template with a candidate description.
pub fn hypothesis(template: &str, candidate: &str) -> String {
    template.replacen("{}", candidate, 1)
}

/// Softmax over the contradiction and entailment logits, taking the
/// entailment share. Equal to `sigmoid(entail - contra)`.
pub fn entailment_probability(
    logits: &[f32],
    entailment_index: usize,
    contradiction_index: usize,
) -> Result<f32, TaxonError> {
    let (Some(&entail), Some(&contra)) = (logits.get(entailment_index), logits.get(contradiction_index))
    else {
        return Err(TaxonError::classifier(format!(
            "model returned {} logits, need indices {entailment_index} and {contradiction_index}",
            logits.len()
        )));
    };
    if !entail.is_finite() || !contra.is_finite() {
        return Err(TaxonError::classifier("model returned non-finite logits"));
    }
    Ok(1.0 / (1.0 + (contra - entail).exp()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hypothesis_fills_first_placeholder() {
        assert_eq!(
            hypothesis("This example is {}.", "AI (LLMs)"),
            "This example is AI (LLMs)."
        );
        assert_eq!(hypothesis("{} and {}", "x"), "x and {}");
    }

    #[test]
    fn equal_logits_give_one_half() {
        let p = entailment_probability(&[1.5, 0.0, 1.5], 2, 0).unwrap();
        assert!((p - 0.5).abs() < 1e-6);
    }

    #[test]
    fn strong_entailment_approaches_one() {
        let p = entailment_probability(&[-4.0, 0.0, 4.0], 2, 0).unwrap();
        assert!(p > 0.99);
        let q = entailment_probability(&[4.0, 0.0, -4.0], 2, 0).unwrap();
        assert!(q < 0.01);
    }

    #[test]
    fn neutral_logit_is_ignored() {
        let a = entailment_probability(&[0.2, -10.0, 0.8], 2, 0).unwrap();
        let b = entailment_probability(&[0.2, 10.0, 0.8], 2, 0).unwrap();
        assert!((a - b).abs() < 1e-6);
    }

    #[test]
    fn missing_index_is_an_error() {
        let err = entailment_probability(&[0.1, 0.2], 2, 0).unwrap_err();
        assert!(err.is_classifier());
    }

    #[test]
    fn non_finite_logits_are_errors() {
        assert!(entailment_probability(&[f32::NAN, 0.0, 1.0], 2, 0).is_err());
    }

    proptest::proptest! {
        #[test]
        fn probability_stays_in_unit_interval(e in -50.0f32..50.0, c in -50.0f32..50.0) {
            let p = entailment_probability(&[c, 0.0, e], 2, 0).unwrap();
            proptest::prop_assert!((0.0..=1.0).contains(&p));
        }
    }
}
