// SPDX-FileCopyrightText: 2026 Taxon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Keyword-first labeling.

use std::sync::Arc;

use taxon_core::Label;

use crate::taxonomy::Taxonomy;

/// Labels with at least one keyword hit, mapped to their hit count.
///
/// Independent of `min_hits`; used to relax classifier calibration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeakHits {
    counts: [usize; Label::COUNT],
}

impl WeakHits {
    pub fn count(&self, label: Label) -> usize {
        self.counts[label.index()]
    }

    pub fn contains(&self, label: Label) -> bool {
        self.count(label) > 0
    }

    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }

    /// `(label, count)` for labels with at least one hit.
    pub fn iter(&self) -> impl Iterator<Item = (Label, usize)> + '_ {
        Label::ALL
            .into_iter()
            .map(|l| (l, self.count(l)))
            .filter(|&(_, c)| c > 0)
    }
}

/// Whole-word keyword matcher over a compiled [`Taxonomy`].
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    taxonomy: Arc<Taxonomy>,
}

impl KeywordMatcher {
    pub fn new(taxonomy: Arc<Taxonomy>) -> Self {
        Self { taxonomy }
    }

    /// Labels meeting their minimum hit count and gate, ordered by
    /// descending hit count with ties broken by declaration order.
    pub fn matches(&self, text: &str) -> Vec<Label> {
        if text.is_empty() {
            return Vec::new();
        }
        let mut hits: Vec<(Label, usize)> = self
            .taxonomy
            .rules()
            .filter_map(|rule| {
                let count = rule.hit_count(text);
                (count >= rule.min_hits && rule.gate_passes(text)).then_some((rule.label, count))
            })
            .collect();
        // Stable sort keeps declaration order among equal counts.
        hits.sort_by(|a, b| b.1.cmp(&a.1));
        hits.into_iter().map(|(label, _)| label).collect()
    }

    pub fn weak_hits(&self, text: &str) -> WeakHits {
        let mut weak = WeakHits::default();
        for rule in self.taxonomy.rules() {
            weak.counts[rule.label.index()] = rule.hit_count(text);
        }
        weak
    }
}
