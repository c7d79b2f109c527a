// SPDX-FileCopyrightText: 2026 Taxon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Classifier score calibration.
//!
//! Turns a [`ScoreVector`] into a [`Decision`] in four steps: technical-over-
//! policy bias, per-label threshold and margin retention (relaxed by weak
//! keyword hits), gate enforcement, and a single-label fallback above an
//! absolute floor. The engine holds no mutable state.

use std::fmt::Write as _;
use std::sync::Arc;

use taxon_config::model::{BiasConfig, DecisionConfig};
use taxon_core::{Decision, Label, ScoreVector, TaxonError};
use tracing::{info, trace};

use crate::keywords::WeakHits;
use crate::patterns::TermSet;
use crate::taxonomy::Taxonomy;

/// Slack for score comparisons, so that a score sitting exactly on a
/// threshold, margin or bias window boundary is not lost to f32 rounding.
const SCORE_TOLERANCE: f32 = 1e-6;

/// Shifts score from a disfavored label to a favored one when the text reads
/// as technical but not as policy.
#[derive(Debug, Clone)]
pub struct ScoreBias {
    favored: Label,
    disfavored: Label,
    window: f32,
    delta: f32,
    technical: TermSet,
    policy: TermSet,
}

impl ScoreBias {
    /// Compile a bias from config; `None` when disabled.
    pub fn from_config(config: &BiasConfig) -> Result<Option<Self>, TaxonError> {
        if !config.enabled {
            return Ok(None);
        }
        if config.favored == config.disfavored {
            return Err(TaxonError::Config(
                "bias.favored and bias.disfavored must differ".to_string(),
            ));
        }
        Ok(Some(Self {
            favored: config.favored,
            disfavored: config.disfavored,
            window: config.window,
            delta: config.delta,
            technical: TermSet::compile(&config.technical_terms)?,
            policy: TermSet::compile(&config.policy_terms)?,
        }))
    }

    /// Apply the shift in place. Returns whether it fired.
    pub fn apply(&self, text: &str, scores: &mut ScoreVector) -> bool {
        if !self.technical.is_match(text) || self.policy.is_match(text) {
            return false;
        }
        let favored = scores.get(self.favored);
        let disfavored = scores.get(self.disfavored);
        if favored + self.window + SCORE_TOLERANCE < disfavored {
            return false;
        }
        scores.set(self.favored, favored + self.delta);
        scores.set(self.disfavored, disfavored - self.delta);
        true
    }
}

/// Calibration core: decides which labels survive a score vector.
#[derive(Debug, Clone)]
pub struct DecisionEngine {
    taxonomy: Arc<Taxonomy>,
    bias: Option<ScoreBias>,
    margin: f32,
    weak_hit_relaxation: f32,
    weak_hit_margin_widening: f32,
    final_min_score: f32,
    debug_scores: bool,
}

impl DecisionEngine {
    pub fn new(
        taxonomy: Arc<Taxonomy>,
        decision: &DecisionConfig,
        bias: &BiasConfig,
    ) -> Result<Self, TaxonError> {
        Ok(Self {
            taxonomy,
            bias: ScoreBias::from_config(bias)?,
            margin: decision.margin,
            weak_hit_relaxation: decision.weak_hit_relaxation,
            weak_hit_margin_widening: decision.weak_hit_margin_widening,
            final_min_score: decision.final_min_score,
            debug_scores: decision.debug_scores,
        })
    }

    /// Decide the retained labels for `text` given its classifier scores.
    ///
    /// Never fails; an empty decision means "no evidence".
    pub fn decide(&self, text: &str, raw: ScoreVector, weak: &WeakHits) -> Decision {
        let mut scores = raw;
        let biased = self
            .bias
            .as_ref()
            .is_some_and(|bias| bias.apply(text, &mut scores));
        let best = scores.max();

        let mut kept = Vec::new();
        for (label, score) in scores.iter() {
            let rule = self.taxonomy.rule(label);
            let (threshold, margin) = if weak.contains(label) {
                (
                    rule.threshold - self.weak_hit_relaxation,
                    self.margin + self.weak_hit_margin_widening,
                )
            } else {
                (rule.threshold, self.margin)
            };
            if score + SCORE_TOLERANCE >= threshold && best - score <= margin + SCORE_TOLERANCE {
                kept.push(label);
            }
        }

        // Gates are the last filter on every path, including the fallback.
        kept.retain(|&label| self.taxonomy.gate_passes(label, text));

        let fallback = kept.is_empty();
        if fallback {
            let (label, score) = scores.best();
            if score + SCORE_TOLERANCE >= self.final_min_score
                && self.taxonomy.gate_passes(label, text)
            {
                kept.push(label);
            }
        }

        let decision = Decision::from_labels(kept);
        self.log_scores(&raw, &scores, biased, fallback, &decision);
        decision
    }

    fn log_scores(
        &self,
        raw: &ScoreVector,
        adjusted: &ScoreVector,
        biased: bool,
        fallback: bool,
        decision: &Decision,
    ) {
        if self.debug_scores {
            info!(
                raw = %format_scores(raw),
                adjusted = %format_scores(adjusted),
                biased,
                fallback,
                %decision,
                "classifier scores"
            );
        } else {
            trace!(
                raw = %format_scores(raw),
                biased,
                fallback,
                %decision,
                "classifier scores"
            );
        }
    }
}

/// `AI Policy=0.860 AI=0.120 ...`
fn format_scores(scores: &ScoreVector) -> String {
    let mut out = String::new();
    for (label, score) in scores.iter() {
        if !out.is_empty() {
            out.push(' ');
        }
        let _ = write!(out, "{label}={score:.3}");
    }
    out
}
