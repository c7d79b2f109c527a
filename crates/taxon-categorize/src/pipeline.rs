// SPDX-FileCopyrightText: 2026 Taxon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Two-pass categorization pipeline.
//!
//! Order: keywords on title+summary, classifier on title+summary, keywords
//! on the full text, classifier on the full text. The first non-empty result
//! wins; the classifier is never called once keywords have decided.

use std::sync::Arc;

use strum::{Display, IntoStaticStr};
use taxon_config::TaxonConfig;
use taxon_core::{
    truncate_chars, ClassifierAdapter, Decision, Document, ScoreVector, TaxonError,
};
use tracing::debug;

use crate::decision::DecisionEngine;
use crate::keywords::KeywordMatcher;
use crate::taxonomy::Taxonomy;
use crate::text::TextBuilder;

/// Pipeline state that produced a terminal decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Stage {
    KeywordTitleSummary,
    ClassifierTitleSummary,
    KeywordFullText,
    ClassifierFullText,
    /// Every pass came back empty.
    Exhausted,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// A decision together with the stage that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Categorization {
    pub decision: Decision,
    pub stage: Stage,
}

/// Hybrid keyword + zero-shot categorizer.
///
/// Built once at startup and shared across documents; holds no per-call state.
pub struct Categorizer {
    taxonomy: Arc<Taxonomy>,
    text: TextBuilder,
    matcher: KeywordMatcher,
    engine: DecisionEngine,
    classifier: Arc<dyn ClassifierAdapter>,
    candidates: Vec<String>,
    max_input_chars: usize,
    include_content_in_first_pass: bool,
}

impl Categorizer {
    /// Compile the taxonomy and wire the pipeline around `classifier`.
    pub fn new(
        config: &TaxonConfig,
        classifier: Arc<dyn ClassifierAdapter>,
    ) -> Result<Self, TaxonError> {
        let taxonomy = Arc::new(Taxonomy::compile(&config.labels)?);
        let engine = DecisionEngine::new(taxonomy.clone(), &config.decision, &config.bias)?;
        Ok(Self {
            candidates: taxonomy.candidates(),
            matcher: KeywordMatcher::new(taxonomy.clone()),
            text: TextBuilder::from_config(&config.text),
            engine,
            classifier,
            max_input_chars: config.classifier.max_input_chars,
            include_content_in_first_pass: config.text.include_content_in_first_pass,
            taxonomy,
        })
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    /// Categorize one document.
    ///
    /// Fails only when the classifier fails; the caller decides whether to
    /// skip the document or fall back to [`Categorizer::categorize_keywords_only`].
    pub async fn categorize(&self, doc: &Document) -> Result<Categorization, TaxonError> {
        let first = self.text.build(doc, self.include_content_in_first_pass);

        let labels = self.matcher.matches(&first);
        if !labels.is_empty() {
            return Ok(finish(Stage::KeywordTitleSummary, Decision::from_labels(labels)));
        }

        let decision = self.classify_pass(&first).await?;
        if !decision.is_empty() {
            return Ok(finish(Stage::ClassifierTitleSummary, decision));
        }

        let full = self.text.build(doc, true);
        if full == first {
            debug!("full text adds nothing to the first pass");
            return Ok(finish(Stage::Exhausted, Decision::empty()));
        }

        let labels = self.matcher.matches(&full);
        if !labels.is_empty() {
            return Ok(finish(Stage::KeywordFullText, Decision::from_labels(labels)));
        }

        let decision = self.classify_pass(&full).await?;
        if !decision.is_empty() {
            return Ok(finish(Stage::ClassifierFullText, decision));
        }
        Ok(finish(Stage::Exhausted, Decision::empty()))
    }

    /// Run only the keyword passes. Never touches the classifier.
    pub fn categorize_keywords_only(&self, doc: &Document) -> Categorization {
        let first = self.text.build(doc, self.include_content_in_first_pass);
        let labels = self.matcher.matches(&first);
        if !labels.is_empty() {
            return finish(Stage::KeywordTitleSummary, Decision::from_labels(labels));
        }

        let full = self.text.build(doc, true);
        if full != first {
            let labels = self.matcher.matches(&full);
            if !labels.is_empty() {
                return finish(Stage::KeywordFullText, Decision::from_labels(labels));
            }
        }
        finish(Stage::Exhausted, Decision::empty())
    }

    async fn classify_pass(&self, text: &str) -> Result<Decision, TaxonError> {
        let text = truncate_chars(text, self.max_input_chars);
        if text.trim().is_empty() {
            return Ok(Decision::empty());
        }

        let raw = self.classifier.classify(text, &self.candidates).await?;
        let scores = ScoreVector::from_scores(&raw)?;
        // Weak hits, bias and gates all read the same truncated text the
        // classifier saw.
        let weak = self.matcher.weak_hits(text);
        Ok(self.engine.decide(text, scores, &weak))
    }
}

fn finish(stage: Stage, decision: Decision) -> Categorization {
    metrics::counter!("taxon_categorize_decisions_total", "stage" => stage.as_str())
        .increment(1);
    debug!(stage = %stage, %decision, "categorized");
    Categorization { decision, stage }
}
