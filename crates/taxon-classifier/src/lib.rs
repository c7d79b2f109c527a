// SPDX-FileCopyrightText: 2026 Taxon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Zero-shot NLI classifier for Taxon.
//!
//! Scores a text against candidate label descriptions with an MNLI model
//! running locally through ONNX Runtime. Model files are fetched from
//! HuggingFace on first use.

pub mod adapter;
pub mod model_manager;
pub mod nli;

pub use adapter::{ModelLoader, OnnxLoader, PairScorer, ZeroShotClassifier};
pub use model_manager::ModelManager;
pub use nli::{entailment_probability, hypothesis, NliSettings, OnnxNliModel};
