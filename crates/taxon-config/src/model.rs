// SPDX-FileCopyrightText: 2026 Taxon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Taxon categorization engine.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages. Label
//! sections are fixed struct fields, so a misspelled or unknown label name
//! is rejected the same way.

use serde::{Deserialize, Serialize};
use taxon_core::Label;

/// Top-level Taxon configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to the calibrated values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TaxonConfig {
    /// Process-wide settings.
    #[serde(default)]
    pub app: AppConfig,

    /// Article store settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Zero-shot classifier settings.
    #[serde(default)]
    pub classifier: ClassifierConfig,

    /// Weighted text shaping.
    #[serde(default)]
    pub text: TextConfig,

    /// Classifier score calibration.
    #[serde(default)]
    pub decision: DecisionConfig,

    /// Technical-over-policy score bias.
    #[serde(default)]
    pub bias: BiasConfig,

    /// Batch runner settings.
    #[serde(default)]
    pub batch: BatchConfig,

    /// Per-label taxonomy settings.
    #[serde(default)]
    pub labels: LabelsConfig,
}

/// Process-wide settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Article store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    "taxon.db".to_string()
}

fn default_wal_mode() -> bool {
    true
}

/// Zero-shot NLI classifier configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ClassifierConfig {
    /// Directory under which `models/<model_name>/` is stored.
    /// Defaults to the platform data directory (`~/.local/share/taxon`).
    #[serde(default)]
    pub data_dir: Option<String>,

    /// Name of the model directory.
    #[serde(default = "default_model_name")]
    pub model_name: String,

    /// Download URL for the ONNX model file.
    #[serde(default = "default_model_url")]
    pub model_url: String,

    /// Download URL for the `tokenizer.json` file.
    #[serde(default = "default_tokenizer_url")]
    pub tokenizer_url: String,

    /// Input text is truncated to this many characters before classification.
    #[serde(default = "default_max_input_chars")]
    pub max_input_chars: usize,

    /// Token budget per premise/hypothesis pair (premise is truncated first).
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,

    /// NLI hypothesis template; `{}` is replaced by the label description.
    #[serde(default = "default_hypothesis_template")]
    pub hypothesis_template: String,

    /// Index of the entailment logit in the model output.
    #[serde(default = "default_entailment_index")]
    pub entailment_index: usize,

    /// Index of the contradiction logit in the model output.
    #[serde(default)]
    pub contradiction_index: usize,

    /// Feed `token_type_ids` to the model (BERT-style exports).
    #[serde(default)]
    pub use_token_type_ids: bool,

    /// ONNX Runtime intra-op thread count.
    #[serde(default = "default_intra_threads")]
    pub intra_threads: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            model_name: default_model_name(),
            model_url: default_model_url(),
            tokenizer_url: default_tokenizer_url(),
            max_input_chars: default_max_input_chars(),
            max_tokens: default_max_tokens(),
            hypothesis_template: default_hypothesis_template(),
            entailment_index: default_entailment_index(),
            contradiction_index: 0,
            use_token_type_ids: false,
            intra_threads: default_intra_threads(),
        }
    }
}

impl ClassifierConfig {
    /// Resolved data directory.
    pub fn resolved_data_dir(&self) -> std::path::PathBuf {
        match &self.data_dir {
            Some(dir) => std::path::PathBuf::from(dir),
            None => dirs::data_dir()
                .map(|d| d.join("taxon"))
                .unwrap_or_else(|| std::path::PathBuf::from(".taxon")),
        }
    }
}

fn default_model_name() -> String {
    "bart-large-mnli".to_string()
}

fn default_model_url() -> String {
    "https://huggingface.co/Xenova/bart-large-mnli/resolve/main/onnx/model_quantized.onnx"
        .to_string()
}

fn default_tokenizer_url() -> String {
    "https://huggingface.co/Xenova/bart-large-mnli/resolve/main/tokenizer.json".to_string()
}

fn default_max_input_chars() -> usize {
    1200
}

fn default_max_tokens() -> usize {
    1024
}

fn default_hypothesis_template() -> String {
    "This example is {}.".to_string()
}

fn default_entailment_index() -> usize {
    2
}

fn default_intra_threads() -> usize {
    1
}

/// Weighted text shaping.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TextConfig {
    /// How many times the title is repeated.
    #[serde(default = "default_title_weight")]
    pub title_weight: usize,

    /// How many times the summary is repeated.
    #[serde(default = "default_summary_weight")]
    pub summary_weight: usize,

    /// Number of content characters appended when content is included.
    #[serde(default = "default_content_slice")]
    pub content_slice: usize,

    /// Include content already in the first pass.
    #[serde(default)]
    pub include_content_in_first_pass: bool,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            title_weight: default_title_weight(),
            summary_weight: default_summary_weight(),
            content_slice: default_content_slice(),
            include_content_in_first_pass: false,
        }
    }
}

fn default_title_weight() -> usize {
    2
}

fn default_summary_weight() -> usize {
    1
}

fn default_content_slice() -> usize {
    800
}

/// Classifier score calibration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DecisionConfig {
    /// Labels within this distance of the best score may be retained.
    #[serde(default = "default_margin")]
    pub margin: f32,

    /// Threshold reduction for labels with at least one keyword hit.
    #[serde(default = "default_weak_hit_relaxation")]
    pub weak_hit_relaxation: f32,

    /// Margin increase for labels with at least one keyword hit.
    #[serde(default = "default_weak_hit_margin_widening")]
    pub weak_hit_margin_widening: f32,

    /// Minimum score for the single-label fallback.
    #[serde(default = "default_final_min_score")]
    pub final_min_score: f32,

    /// Log raw and adjusted scores at INFO.
    #[serde(default)]
    pub debug_scores: bool,
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            margin: default_margin(),
            weak_hit_relaxation: default_weak_hit_relaxation(),
            weak_hit_margin_widening: default_weak_hit_margin_widening(),
            final_min_score: default_final_min_score(),
            debug_scores: false,
        }
    }
}

fn default_margin() -> f32 {
    0.10
}

fn default_weak_hit_relaxation() -> f32 {
    0.10
}

fn default_weak_hit_margin_widening() -> f32 {
    0.05
}

fn default_final_min_score() -> f32 {
    0.15
}

/// Technical-over-policy bias: generic technical vocabulary should not be
/// categorized as policy content unless explicit policy terms are present.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BiasConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Label that receives the shifted score.
    #[serde(default = "default_favored")]
    pub favored: Label,

    /// Label that gives up the shifted score.
    #[serde(default = "default_disfavored")]
    pub disfavored: Label,

    /// Applies when `favored + window >= disfavored`.
    #[serde(default = "default_bias_window")]
    pub window: f32,

    /// Amount moved from `disfavored` to `favored`.
    #[serde(default = "default_bias_delta")]
    pub delta: f32,

    /// Whole-word terms that mark text as technical.
    #[serde(default = "default_technical_terms")]
    pub technical_terms: Vec<String>,

    /// Whole-word terms that mark text as policy-related.
    #[serde(default = "default_policy_terms")]
    pub policy_terms: Vec<String>,
}

impl Default for BiasConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            favored: default_favored(),
            disfavored: default_disfavored(),
            window: default_bias_window(),
            delta: default_bias_delta(),
            technical_terms: default_technical_terms(),
            policy_terms: default_policy_terms(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_favored() -> Label {
    Label::DataEngineering
}

fn default_disfavored() -> Label {
    Label::AiPolicy
}

fn default_bias_window() -> f32 {
    0.05
}

fn default_bias_delta() -> f32 {
    0.04
}

fn default_technical_terms() -> Vec<String> {
    strings(&[
        "etl", "elt", "pipeline", "pipelines", "orchestration", "airflow", "dag", "spark",
        "kafka", "snowflake", "redshift", "bigquery", "databricks", "dbt", "parquet",
        "lakehouse", "data warehouse", "datawarehouse", "data lake", "datalake", "schema",
        "ingestion", "batch", "stream", "streaming",
    ])
}

fn default_policy_terms() -> Vec<String> {
    strings(&[
        "policy", "regulation", "regulatory", "law", "legislation", "act", "governance",
        "standard", "compliance", "oversight",
    ])
}

/// What the batch runner does when the classifier fails for a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierErrorPolicy {
    /// Leave the article untouched; it is retried on the next run.
    #[default]
    Skip,
    /// Record the keyword-only decision instead.
    KeywordOnly,
}

/// Batch runner configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BatchConfig {
    /// Rows fetched per store round-trip.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Only categorize articles whose category is NULL or empty.
    #[serde(default = "default_true")]
    pub only_uncategorized: bool,

    /// Documents categorized concurrently.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Marker written when no label is retained.
    #[serde(default = "default_uncategorized_label")]
    pub uncategorized_label: String,

    /// Behavior when the classifier fails for a document.
    #[serde(default)]
    pub on_classifier_error: ClassifierErrorPolicy,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            only_uncategorized: true,
            concurrency: default_concurrency(),
            uncategorized_label: default_uncategorized_label(),
            on_classifier_error: ClassifierErrorPolicy::default(),
        }
    }
}

fn default_batch_size() -> usize {
    150
}

fn default_concurrency() -> usize {
    1
}

fn default_uncategorized_label() -> String {
    "Uncategorized".to_string()
}

/// Structural co-occurrence gate: every group must have at least one
/// whole-word match in the text.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GateConfig {
    pub all_of: Vec<Vec<String>>,
}

/// Settings for one label.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LabelConfig {
    /// Candidate description submitted to the classifier.
    pub description: String,

    /// Keyword phrases, matched whole-word and case-insensitively.
    pub keywords: Vec<String>,

    /// Distinct keyword phrases required for a keyword match.
    #[serde(default = "default_min_hits")]
    pub min_hits: usize,

    /// Classifier calibration threshold.
    pub threshold: f32,

    /// Optional co-occurrence gate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gate: Option<GateConfig>,
}

fn default_min_hits() -> usize {
    2
}

/// Per-label settings, one section per [`Label`].
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LabelsConfig {
    #[serde(rename = "AI Policy", default = "default_ai_policy")]
    pub ai_policy: LabelConfig,

    #[serde(rename = "AI", default = "default_ai")]
    pub ai: LabelConfig,

    #[serde(rename = "Data Engineering", default = "default_data_engineering")]
    pub data_engineering: LabelConfig,

    #[serde(rename = "US Network", default = "default_us_network")]
    pub us_network: LabelConfig,
}

impl LabelsConfig {
    pub fn get(&self, label: Label) -> &LabelConfig {
        match label {
            Label::AiPolicy => &self.ai_policy,
            Label::Ai => &self.ai,
            Label::DataEngineering => &self.data_engineering,
            Label::UsNetwork => &self.us_network,
        }
    }

    pub fn get_mut(&mut self, label: Label) -> &mut LabelConfig {
        match label {
            Label::AiPolicy => &mut self.ai_policy,
            Label::Ai => &mut self.ai,
            Label::DataEngineering => &mut self.data_engineering,
            Label::UsNetwork => &mut self.us_network,
        }
    }

    /// `(label, settings)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (Label, &LabelConfig)> {
        Label::ALL.into_iter().map(move |l| (l, self.get(l)))
    }
}

impl Default for LabelsConfig {
    fn default() -> Self {
        Self {
            ai_policy: default_ai_policy(),
            ai: default_ai(),
            data_engineering: default_data_engineering(),
            us_network: default_us_network(),
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

// Broad geographic terms are kept here on purpose; they are a known
// precision risk and stay overridable per deployment.
fn default_ai_policy() -> LabelConfig {
    LabelConfig {
        description: "AI Policy (laws, regulation, governance, compliance, standards, oversight)"
            .to_string(),
        keywords: strings(&[
            "ai regulation", "ai law", "governance", "policy", "compliance", "responsible ai",
            "ai act", "ai ethics", "oversight", "standard", "un governs", "robots govern",
            "countries govern", "oligarchs govern", "scenarios from futurists",
            "beneficial asi", "international regulation", "united nations", "united states",
            "europe", "africa", "middle east", "asia",
        ]),
        min_hits: 2,
        threshold: 0.86,
        gate: None,
    }
}

fn default_ai() -> LabelConfig {
    LabelConfig {
        description:
            "AI (LLMs, ML models, agents, reasoning, computer vision, NLP, generative AI)"
                .to_string(),
        keywords: strings(&[
            "artificial intelligence", "machine learning", "deep learning", "neural network",
            "llm", "large language model", "gpt", "transformer model", "computer vision", "nlp",
            "genai", "generative ai", "reasoning model", "reasoning models", "ai agents",
            "data centers", "quantum computing", "cybersecurity", "agi",
            "scientific research", "asi", "asi scenarios", "robots", "robotics",
            "industrial robot", "home robot", "other robots", "humanoid robot",
            "autonomous robot", "artificial general intelligence",
        ]),
        min_hits: 2,
        threshold: 0.78,
        gate: None,
    }
}

fn default_data_engineering() -> LabelConfig {
    LabelConfig {
        description: "Data Engineering (ETL/ELT, data pipelines, storage, orchestration, Spark, \
                      Kafka, Snowflake, Airflow, Databricks)"
            .to_string(),
        keywords: strings(&[
            "etl", "elt", "data pipeline", "apache kafka", "airflow", "snowflake", "redshift",
            "spark", "databricks", "data warehouse", "dbt", "ingestion", "collection",
            "storage", "cleaning", "transformation", "ai & data engineering", "delivery",
            "governance", "infrastructure", "privacy", "security", "data migration",
            "business intelligence", "ai and machine learning", "data science",
            "e-commerce analytics", "financial services", "fraud detection", "manufacturing",
            "public health", "real-time analytics", "processing", "analytics",
            "orchestration", "programming languages", "loading", "visualization",
            "warehousing", "top data engineering jobs", "datastrategy", "iceberg",
        ]),
        min_hits: 2,
        threshold: 0.68,
        gate: None,
    }
}

fn default_us_network() -> LabelConfig {
    LabelConfig {
        description: "US Network (US government, Congress, elections, agencies, committees, \
                      President, governors)"
            .to_string(),
        keywords: strings(&[
            "united states", "u.s.", "us network", "america", "washington", "dc", "federal",
            "statewide", "office of the president", "all us senators",
            "democratic senate leaders", "democratic senators", "republican senate leaders",
            "republican senators", "democratic house leaders", "democratic house members",
            "republican house leaders", "republican house members", "us executive branch",
            "trump cabinet", "key trump appointments", "us government departments",
            "key us agencies", "us senate committees", "us house committees",
            "joint committees", "us judicial branch", "2020 presidential race",
            "2020 us senate races", "2020 governor races", "2022 all governor races",
            "2022 competitive governor races", "2022 all senate races",
            "2022 competitive us senate races", "2022 all house races",
            "2022 competitive us house races", "2024 us presidential race",
            "2024 competitive us senate races", "2024 competitive us house races",
        ]),
        min_hits: 2,
        threshold: 0.80,
        gate: Some(GateConfig {
            all_of: vec![
                strings(&["us", "u.s.", "united states", "america"]),
                strings(&[
                    "president", "senate", "house", "governor", "governors", "committee",
                    "agency", "cabinet", "election", "congress",
                ]),
            ],
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_calibration() {
        let config = TaxonConfig::default();
        assert_eq!(config.labels.get(Label::AiPolicy).threshold, 0.86);
        assert_eq!(config.labels.get(Label::Ai).threshold, 0.78);
        assert_eq!(config.labels.get(Label::DataEngineering).threshold, 0.68);
        assert_eq!(config.labels.get(Label::UsNetwork).threshold, 0.80);
        assert!(config.labels.iter().all(|(_, l)| l.min_hits == 2));
        assert_eq!(config.decision.margin, 0.10);
        assert_eq!(config.decision.final_min_score, 0.15);
        assert_eq!(config.text.title_weight, 2);
        assert_eq!(config.text.content_slice, 800);
        assert_eq!(config.classifier.max_input_chars, 1200);
        assert_eq!(config.batch.uncategorized_label, "Uncategorized");
    }

    #[test]
    fn only_us_network_is_gated_by_default() {
        let labels = LabelsConfig::default();
        let gated: Vec<Label> = labels
            .iter()
            .filter(|(_, l)| l.gate.is_some())
            .map(|(label, _)| label)
            .collect();
        assert_eq!(gated, vec![Label::UsNetwork]);
    }

    #[test]
    fn partial_label_override_keeps_other_fields() {
        let toml_str = r#"
[labels."AI Policy"]
description = "Policy"
keywords = ["ai act", "regulation"]
threshold = 0.9
"#;
        let config: TaxonConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.labels.ai_policy.keywords, vec!["ai act", "regulation"]);
        assert_eq!(config.labels.ai_policy.min_hits, 2);
        assert!(config.labels.ai_policy.gate.is_none());
        // Untouched labels keep their defaults.
        assert_eq!(config.labels.data_engineering.threshold, 0.68);
    }

    #[test]
    fn unknown_label_section_is_rejected() {
        let toml_str = r#"
[labels."Sports"]
description = "Sports"
keywords = ["football"]
threshold = 0.5
"#;
        assert!(toml::from_str::<TaxonConfig>(toml_str).is_err());
    }

    #[test]
    fn bias_labels_parse_from_display_names() {
        let toml_str = r#"
[bias]
favored = "AI"
disfavored = "US Network"
"#;
        let config: TaxonConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.bias.favored, Label::Ai);
        assert_eq!(config.bias.disfavored, Label::UsNetwork);
        assert!(config.bias.enabled);
    }

    #[test]
    fn classifier_error_policy_parses_snake_case() {
        let toml_str = r#"
[batch]
on_classifier_error = "keyword_only"
"#;
        let config: TaxonConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.batch.on_classifier_error,
            ClassifierErrorPolicy::KeywordOnly
        );
    }

    #[test]
    fn explicit_data_dir_is_used() {
        let config = ClassifierConfig {
            data_dir: Some("/srv/taxon".to_string()),
            ..ClassifierConfig::default()
        };
        assert_eq!(
            config.resolved_data_dir(),
            std::path::PathBuf::from("/srv/taxon")
        );
    }
}
