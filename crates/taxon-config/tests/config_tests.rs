// SPDX-FileCopyrightText: 2026 Taxon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Taxon configuration system.

use taxon_config::diagnostic::ConfigError;
use taxon_config::model::ClassifierErrorPolicy;
use taxon_config::{load_and_validate, load_and_validate_str, load_config_from_str};
use taxon_core::Label;

/// Valid TOML with known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_taxon_config() {
    let toml = r#"
[app]
log_level = "debug"

[storage]
database_path = "/tmp/articles.db"
wal_mode = false

[text]
title_weight = 3
summary_weight = 1
content_slice = 400
include_content_in_first_pass = true

[decision]
margin = 0.2
final_min_score = 0.3
debug_scores = true

[batch]
batch_size = 20
concurrency = 2
on_classifier_error = "keyword_only"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.app.log_level, "debug");
    assert_eq!(config.storage.database_path, "/tmp/articles.db");
    assert!(!config.storage.wal_mode);
    assert_eq!(config.text.title_weight, 3);
    assert_eq!(config.text.content_slice, 400);
    assert!(config.text.include_content_in_first_pass);
    assert_eq!(config.decision.margin, 0.2);
    assert_eq!(config.decision.final_min_score, 0.3);
    assert!(config.decision.debug_scores);
    assert_eq!(config.batch.batch_size, 20);
    assert_eq!(config.batch.concurrency, 2);
    assert_eq!(
        config.batch.on_classifier_error,
        ClassifierErrorPolicy::KeywordOnly
    );
}

/// A partial label section is merged over the compiled defaults.
#[test]
fn partial_label_section_merges_with_defaults() {
    let toml = r#"
[labels."Data Engineering"]
threshold = 0.6
"#;
    let config = load_config_from_str(toml).expect("partial label section should merge");
    let de = config.labels.get(Label::DataEngineering);
    assert_eq!(de.threshold, 0.6);
    assert_eq!(de.min_hits, 2);
    assert!(de.keywords.iter().any(|k| k == "etl"));
    assert!(de.description.starts_with("Data Engineering"));
}

/// Missing optional sections use defaults without error.
#[test]
fn missing_optional_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");
    assert_eq!(config.app.log_level, "info");
    assert_eq!(config.storage.database_path, "taxon.db");
    assert_eq!(config.decision.margin, 0.10);
    assert_eq!(config.decision.weak_hit_relaxation, 0.10);
    assert_eq!(config.decision.weak_hit_margin_widening, 0.05);
    assert_eq!(config.bias.favored, Label::DataEngineering);
    assert_eq!(config.bias.disfavored, Label::AiPolicy);
    assert!(config.labels.get(Label::UsNetwork).gate.is_some());
    assert!(config.batch.only_uncategorized);
}

/// Unknown key produces an UnknownKey diagnostic with a suggestion.
#[test]
fn unknown_key_produces_suggestion() {
    let toml = r#"
[decision]
margni = 0.1
"#;
    let errors = load_and_validate_str(toml).expect_err("should reject unknown field");
    let found = errors.iter().any(|e| {
        matches!(
            e,
            ConfigError::UnknownKey { key, suggestion: Some(s), .. }
                if key == "decision.margni" && s == "margin"
        )
    });
    assert!(found, "expected suggestion for margni, got: {errors:?}");
}

/// A misspelled label section is rejected, never silently ignored.
#[test]
fn misspelled_label_section_is_rejected_with_suggestion() {
    let toml = r#"
[labels."Data Engineerng"]
threshold = 0.5
"#;
    let errors = load_and_validate_str(toml).expect_err("unknown label must be rejected");
    let found = errors.iter().any(|e| {
        matches!(
            e,
            ConfigError::UnknownKey { suggestion: Some(s), .. } if s == "Data Engineering"
        )
    });
    assert!(found, "expected label suggestion, got: {errors:?}");
}

/// An unknown label used as a value is rejected.
#[test]
fn unknown_label_value_is_rejected() {
    let toml = r#"
[bias]
favored = "Sports"
"#;
    assert!(load_and_validate_str(toml).is_err());
}

/// Semantic validation runs after deserialization.
#[test]
fn empty_keyword_phrase_is_a_startup_error() {
    let toml = r#"
[labels."AI"]
keywords = ["llm", ""]
"#;
    let errors = load_and_validate_str(toml).expect_err("empty phrase must fail validation");
    assert!(errors.iter().any(
        |e| matches!(e, ConfigError::Validation { message } if message.contains("keywords[1]"))
    ));
}

/// An explicit config path that does not exist is reported, not ignored.
#[test]
fn missing_explicit_config_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");
    let errors = load_and_validate(Some(&path)).expect_err("missing file should fail");
    assert!(matches!(&errors[0], ConfigError::Other(msg) if msg.contains("does not exist")));
}

/// An explicit config file is layered over the defaults.
#[test]
fn explicit_config_file_is_loaded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("taxon.toml");
    std::fs::write(&path, "[batch]\nbatch_size = 7\n").unwrap();
    let config = load_and_validate(Some(&path)).expect("file should load");
    assert_eq!(config.batch.batch_size, 7);
}

/// Environment variables override TOML values.
#[test]
fn env_var_overrides_decision_margin() {
    figment::Jail::expect_with(|jail| {
        jail.create_file("taxon.toml", "[decision]\nmargin = 0.3\n")?;
        jail.set_env("TAXON_DECISION_FINAL_MIN_SCORE", "0.25");
        jail.set_env("TAXON_BATCH_BATCH_SIZE", "9");

        let config = taxon_config::load_config()?;
        assert_eq!(config.decision.margin, 0.3);
        assert_eq!(config.decision.final_min_score, 0.25);
        assert_eq!(config.batch.batch_size, 9);
        Ok(())
    });
}
