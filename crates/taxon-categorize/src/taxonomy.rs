// SPDX-FileCopyrightText: 2026 Taxon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Immutable pattern table built from the label configuration.
//!
//! [`Taxonomy::compile`] runs once at startup. A malformed phrase or gate is
//! a configuration error there, never a mid-batch failure.

use regex::Regex;
use taxon_config::model::{GateConfig, LabelsConfig};
use taxon_core::{Label, TaxonError};
use tracing::debug;

use crate::patterns::{compile_phrase, TermSet};

/// Co-occurrence gate: passes when every group matches somewhere in the text.
#[derive(Debug, Clone)]
pub struct Gate {
    groups: Vec<TermSet>,
}

impl Gate {
    fn compile(label: Label, config: &GateConfig) -> Result<Self, TaxonError> {
        if config.all_of.is_empty() {
            return Err(TaxonError::Config(format!("gate for `{label}` has no groups")));
        }
        let groups = config
            .all_of
            .iter()
            .map(|group| {
                TermSet::compile(group)
                    .map_err(|e| TaxonError::Config(format!("gate for `{label}`: {e}")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { groups })
    }

    pub fn passes(&self, text: &str) -> bool {
        self.groups.iter().all(|g| g.is_match(text))
    }
}

/// Compiled rules for one label.
#[derive(Debug, Clone)]
pub struct LabelRule {
    pub label: Label,
    pub description: String,
    pub phrases: Vec<String>,
    pub min_hits: usize,
    pub threshold: f32,
    patterns: Vec<Regex>,
    gate: Option<Gate>,
}

impl LabelRule {
    /// Number of distinct phrases with at least one occurrence in `text`.
    pub fn hit_count(&self, text: &str) -> usize {
        if text.is_empty() {
            return 0;
        }
        self.patterns.iter().filter(|p| p.is_match(text)).count()
    }

    /// Gate check; ungated labels always pass.
    pub fn gate_passes(&self, text: &str) -> bool {
        self.gate.as_ref().is_none_or(|g| g.passes(text))
    }

    pub fn is_gated(&self) -> bool {
        self.gate.is_some()
    }
}

/// The full compiled taxonomy, one rule per [`Label`] in declaration order.
#[derive(Debug, Clone)]
pub struct Taxonomy {
    rules: Vec<LabelRule>,
}

impl Taxonomy {
    pub fn compile(config: &LabelsConfig) -> Result<Self, TaxonError> {
        let mut rules = Vec::with_capacity(Label::COUNT);
        for (label, settings) in config.iter() {
            if settings.min_hits == 0 {
                return Err(TaxonError::Config(format!(
                    "min_hits for `{label}` must be at least 1"
                )));
            }

            let mut phrases: Vec<String> = Vec::with_capacity(settings.keywords.len());
            let mut patterns = Vec::with_capacity(settings.keywords.len());
            for phrase in &settings.keywords {
                let normalized = phrase.trim().to_lowercase();
                if phrases.contains(&normalized) {
                    continue;
                }
                let pattern = compile_phrase(&normalized)
                    .map_err(|e| TaxonError::Config(format!("keyword for `{label}`: {e}")))?;
                phrases.push(normalized);
                patterns.push(pattern);
            }

            let gate = settings
                .gate
                .as_ref()
                .map(|g| Gate::compile(label, g))
                .transpose()?;

            debug!(
                label = label.name(),
                phrases = phrases.len(),
                gated = gate.is_some(),
                "compiled label rules"
            );

            rules.push(LabelRule {
                label,
                description: settings.description.clone(),
                phrases,
                min_hits: settings.min_hits,
                threshold: settings.threshold,
                patterns,
                gate,
            });
        }
        Ok(Self { rules })
    }

    pub fn rule(&self, label: Label) -> &LabelRule {
        &self.rules[label.index()]
    }

    /// Rules in declaration order.
    pub fn rules(&self) -> impl Iterator<Item = &LabelRule> {
        self.rules.iter()
    }

    pub fn gate_passes(&self, label: Label, text: &str) -> bool {
        self.rule(label).gate_passes(text)
    }

    /// Classifier candidate descriptions, in declaration order.
    pub fn candidates(&self) -> Vec<String> {
        self.rules.iter().map(|r| r.description.clone()).collect()
    }
}
