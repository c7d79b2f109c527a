// SPDX-FileCopyrightText: 2026 Taxon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across the Taxon crates.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

use crate::error::TaxonError;

/// Topic labels of the closed taxonomy.
///
/// Declaration order is significant: it is the tie-break order for keyword
/// ranking and for the single-label fallback.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
pub enum Label {
    /// Laws, regulation, governance and oversight of AI.
    #[strum(serialize = "AI Policy")]
    #[serde(rename = "AI Policy")]
    AiPolicy,
    /// Models, agents, robotics and general AI research.
    #[strum(serialize = "AI")]
    #[serde(rename = "AI")]
    Ai,
    /// Pipelines, warehousing, orchestration and analytics.
    #[strum(serialize = "Data Engineering")]
    #[serde(rename = "Data Engineering")]
    DataEngineering,
    /// US government, Congress, elections and agencies.
    #[strum(serialize = "US Network")]
    #[serde(rename = "US Network")]
    UsNetwork,
}

impl Label {
    /// Number of labels in the taxonomy.
    pub const COUNT: usize = 4;

    /// All labels in declaration order.
    pub const ALL: [Label; Label::COUNT] = [
        Label::AiPolicy,
        Label::Ai,
        Label::DataEngineering,
        Label::UsNetwork,
    ];

    /// Position of this label in declaration order.
    pub fn index(self) -> usize {
        match self {
            Label::AiPolicy => 0,
            Label::Ai => 1,
            Label::DataEngineering => 2,
            Label::UsNetwork => 3,
        }
    }

    /// Display name, e.g. `"Data Engineering"`.
    pub fn name(self) -> &'static str {
        self.into()
    }
}

/// One independent probability per label.
///
/// Backed by a fixed-size array indexed by [`Label::index`], so a vector can
/// never have a missing or extra entry. Values are kept within `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScoreVector([f32; Label::COUNT]);

impl ScoreVector {
    /// All-zero scores ("no evidence").
    pub fn zeros() -> Self {
        Self([0.0; Label::COUNT])
    }

    /// Build a score vector from classifier output in label declaration order.
    ///
    /// Fails if the length does not match the taxonomy or any score is
    /// non-finite or outside `[0, 1]`.
    pub fn from_scores(scores: &[f32]) -> Result<Self, TaxonError> {
        if scores.len() != Label::COUNT {
            return Err(TaxonError::classifier(format!(
                "expected {} scores, classifier returned {}",
                Label::COUNT,
                scores.len()
            )));
        }
        let mut out = [0.0; Label::COUNT];
        for (slot, &score) in out.iter_mut().zip(scores) {
            if !score.is_finite() || !(0.0..=1.0).contains(&score) {
                return Err(TaxonError::classifier(format!(
                    "score {score} is not a probability"
                )));
            }
            *slot = score;
        }
        Ok(Self(out))
    }

    /// Score for a label.
    pub fn get(&self, label: Label) -> f32 {
        self.0[label.index()]
    }

    /// Set the score for a label, clamped to `[0, 1]`.
    pub fn set(&mut self, label: Label, score: f32) {
        self.0[label.index()] = score.clamp(0.0, 1.0);
    }

    /// Iterate `(label, score)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (Label, f32)> + '_ {
        Label::ALL.iter().map(move |&l| (l, self.get(l)))
    }

    /// Highest score across all labels.
    pub fn max(&self) -> f32 {
        self.0.iter().copied().fold(0.0, f32::max)
    }

    /// Best-scoring label; the earliest label wins among equal maxima.
    pub fn best(&self) -> (Label, f32) {
        let mut best = (Label::ALL[0], self.0[0]);
        for (label, score) in self.iter().skip(1) {
            if score > best.1 {
                best = (label, score);
            }
        }
        best
    }
}

/// An ordered, duplicate-free set of retained labels.
///
/// An empty decision is the "no label" outcome; callers render it with an
/// uncategorized marker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Decision {
    labels: Vec<Label>,
}

impl Decision {
    /// The "no label" outcome.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a decision, keeping first occurrences only.
    pub fn from_labels(labels: impl IntoIterator<Item = Label>) -> Self {
        let mut out: Vec<Label> = Vec::new();
        for label in labels {
            if !out.contains(&label) {
                out.push(label);
            }
        }
        Self { labels: out }
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn contains(&self, label: Label) -> bool {
        self.labels.contains(&label)
    }

    /// Render as `"AI, Data Engineering"`, or `uncategorized` when empty.
    pub fn category_string(&self, uncategorized: &str) -> String {
        if self.labels.is_empty() {
            uncategorized.to_string()
        } else {
            self.labels
                .iter()
                .map(|l| l.name())
                .collect::<Vec<_>>()
                .join(", ")
        }
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.category_string(""))
    }
}

/// A short document to categorize. Absent fields are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub content: String,
}

impl Document {
    pub fn new(
        title: impl Into<String>,
        summary: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            summary: summary.into(),
            content: content.into(),
        }
    }
}

/// An article row as read from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleRecord {
    pub id: i64,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
}

impl ArticleRecord {
    /// Convert to a [`Document`], mapping NULL columns to empty strings.
    pub fn to_document(&self) -> Document {
        Document {
            title: self.title.clone().unwrap_or_default(),
            summary: self.summary.clone().unwrap_or_default(),
            content: self.content.clone().unwrap_or_default(),
        }
    }
}

/// An article to insert into the store (deduplicated by URL).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewArticle {
    #[serde(alias = "title")]
    pub short_title: String,
    pub url: String,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but not fully ready (e.g. model not yet loaded).
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
pub enum AdapterType {
    Classifier,
    Storage,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn label_display_and_parse() {
        assert_eq!(Label::AiPolicy.to_string(), "AI Policy");
        assert_eq!(Label::DataEngineering.name(), "Data Engineering");
        assert_eq!(Label::from_str("US Network").unwrap(), Label::UsNetwork);
        assert!(Label::from_str("Sports").is_err());
    }

    #[test]
    fn label_serde_uses_display_names() {
        let json = serde_json::to_string(&Label::UsNetwork).unwrap();
        assert_eq!(json, "\"US Network\"");
        let parsed: Label = serde_json::from_str("\"AI\"").unwrap();
        assert_eq!(parsed, Label::Ai);
        assert!(serde_json::from_str::<Label>("\"Crypto\"").is_err());
    }

    #[test]
    fn label_index_matches_declaration_order() {
        for (i, label) in Label::ALL.iter().enumerate() {
            assert_eq!(label.index(), i);
        }
        assert!(Label::AiPolicy < Label::UsNetwork);
    }

    #[test]
    fn score_vector_rejects_wrong_length() {
        let err = ScoreVector::from_scores(&[0.1, 0.2]).unwrap_err();
        assert!(err.is_classifier());
    }

    #[test]
    fn score_vector_rejects_non_probabilities() {
        assert!(ScoreVector::from_scores(&[0.1, f32::NAN, 0.2, 0.3]).is_err());
        assert!(ScoreVector::from_scores(&[0.1, 1.2, 0.2, 0.3]).is_err());
        assert!(ScoreVector::from_scores(&[0.1, -0.01, 0.2, 0.3]).is_err());
    }

    #[test]
    fn score_vector_best_prefers_earliest_on_ties() {
        let v = ScoreVector::from_scores(&[0.4, 0.7, 0.7, 0.1]).unwrap();
        assert_eq!(v.best(), (Label::Ai, 0.7));
        assert!((v.max() - 0.7).abs() < f32::EPSILON);
    }

    #[test]
    fn score_vector_set_clamps() {
        let mut v = ScoreVector::zeros();
        v.set(Label::Ai, 1.3);
        v.set(Label::AiPolicy, -0.2);
        assert_eq!(v.get(Label::Ai), 1.0);
        assert_eq!(v.get(Label::AiPolicy), 0.0);
    }

    #[test]
    fn decision_deduplicates_and_renders() {
        let d = Decision::from_labels([Label::Ai, Label::DataEngineering, Label::Ai]);
        assert_eq!(d.labels(), &[Label::Ai, Label::DataEngineering]);
        assert_eq!(d.category_string("Uncategorized"), "AI, Data Engineering");
        assert_eq!(Decision::empty().category_string("Uncategorized"), "Uncategorized");
    }

    #[test]
    fn article_record_maps_nulls_to_empty() {
        let rec = ArticleRecord {
            id: 7,
            title: Some("Title".into()),
            summary: None,
            content: None,
            category: None,
        };
        assert_eq!(rec.to_document(), Document::new("Title", "", ""));
    }

    proptest::proptest! {
        #[test]
        fn decision_never_contains_duplicates(idx in proptest::collection::vec(0usize..Label::COUNT, 0..12)) {
            let d = Decision::from_labels(idx.iter().map(|&i| Label::ALL[i]));
            let mut seen = std::collections::HashSet::new();
            for l in d.labels() {
                proptest::prop_assert!(seen.insert(*l));
            }
        }
    }
}
