// SPDX-FileCopyrightText: 2026 Taxon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Hybrid article categorization for Taxon.
//!
//! This crate provides:
//! - [`TextBuilder`]: weighted title/summary/content composition
//! - [`Taxonomy`]: compiled keyword patterns, gates and bias term sets
//! - [`KeywordMatcher`]: whole-word rule matching and weak-hit detection
//! - [`DecisionEngine`]: score calibration (bias, threshold, margin, gate, fallback)
//! - [`Categorizer`]: the two-pass keyword-then-classifier orchestrator
//!
//! Keyword rules are cheap and precise, so they run first; the zero-shot
//! classifier is consulted only when no rule fires.

pub mod decision;
pub mod keywords;
pub mod patterns;
pub mod pipeline;
pub mod taxonomy;
pub mod text;

pub use decision::DecisionEngine;
pub use keywords::{KeywordMatcher, WeakHits};
pub use pipeline::{Categorization, Categorizer, Stage};
pub use taxonomy::{LabelRule, Taxonomy};
pub use text::TextBuilder;
