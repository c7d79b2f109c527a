// SPDX-FileCopyrightText: 2026 Taxon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes:
//! probability ranges, non-degenerate keyword phrases, and batch sizing.

use crate::diagnostic::ConfigError;
use crate::model::TaxonConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &TaxonConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    validate_labels(config, &mut errors);
    validate_decision(config, &mut errors);
    validate_bias(config, &mut errors);

    if config.text.title_weight + config.text.summary_weight == 0 {
        errors.push(ConfigError::Validation {
            message: "text.title_weight and text.summary_weight cannot both be 0".to_string(),
        });
    }

    let classifier = &config.classifier;
    if classifier.max_input_chars == 0 {
        errors.push(ConfigError::Validation {
            message: "classifier.max_input_chars must be at least 1".to_string(),
        });
    }
    if classifier.max_tokens < 16 {
        errors.push(ConfigError::Validation {
            message: format!(
                "classifier.max_tokens must be at least 16, got {}",
                classifier.max_tokens
            ),
        });
    }
    if !classifier.hypothesis_template.contains("{}") {
        errors.push(ConfigError::Validation {
            message: format!(
                "classifier.hypothesis_template `{}` must contain a `{{}}` placeholder",
                classifier.hypothesis_template
            ),
        });
    }
    if classifier.entailment_index == classifier.contradiction_index {
        errors.push(ConfigError::Validation {
            message: "classifier.entailment_index and classifier.contradiction_index must differ"
                .to_string(),
        });
    }
    if classifier.intra_threads == 0 {
        errors.push(ConfigError::Validation {
            message: "classifier.intra_threads must be at least 1".to_string(),
        });
    }
    if classifier.model_name.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "classifier.model_name must not be empty".to_string(),
        });
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if config.batch.batch_size == 0 {
        errors.push(ConfigError::Validation {
            message: "batch.batch_size must be at least 1".to_string(),
        });
    }
    if config.batch.concurrency == 0 {
        errors.push(ConfigError::Validation {
            message: "batch.concurrency must be at least 1".to_string(),
        });
    }
    if config.batch.uncategorized_label.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "batch.uncategorized_label must not be empty".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_labels(config: &TaxonConfig, errors: &mut Vec<ConfigError>) {
    for (label, settings) in config.labels.iter() {
        if settings.description.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("labels.\"{label}\".description must not be empty"),
            });
        }

        if settings.keywords.is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("labels.\"{label}\".keywords must not be empty"),
            });
        }

        for (i, phrase) in settings.keywords.iter().enumerate() {
            if phrase.trim().is_empty() {
                errors.push(ConfigError::Validation {
                    message: format!(
                        "labels.\"{label}\".keywords[{i}] is empty and would match everything"
                    ),
                });
            }
        }

        if settings.min_hits == 0 {
            errors.push(ConfigError::Validation {
                message: format!("labels.\"{label}\".min_hits must be at least 1"),
            });
        }

        if !is_probability(settings.threshold) {
            errors.push(ConfigError::Validation {
                message: format!(
                    "labels.\"{label}\".threshold must be within [0, 1], got {}",
                    settings.threshold
                ),
            });
        }

        if let Some(gate) = &settings.gate {
            if gate.all_of.is_empty() {
                errors.push(ConfigError::Validation {
                    message: format!("labels.\"{label}\".gate.all_of must list at least one group"),
                });
            }
            for (g, group) in gate.all_of.iter().enumerate() {
                if group.is_empty() || group.iter().any(|t| t.trim().is_empty()) {
                    errors.push(ConfigError::Validation {
                        message: format!(
                            "labels.\"{label}\".gate.all_of[{g}] must contain only non-empty terms"
                        ),
                    });
                }
            }
        }
    }
}

fn validate_decision(config: &TaxonConfig, errors: &mut Vec<ConfigError>) {
    let decision = &config.decision;
    let fields = [
        ("decision.margin", decision.margin),
        ("decision.weak_hit_relaxation", decision.weak_hit_relaxation),
        ("decision.weak_hit_margin_widening", decision.weak_hit_margin_widening),
        ("decision.final_min_score", decision.final_min_score),
    ];
    for (name, value) in fields {
        if !is_probability(value) {
            errors.push(ConfigError::Validation {
                message: format!("{name} must be within [0, 1], got {value}"),
            });
        }
    }
}

fn validate_bias(config: &TaxonConfig, errors: &mut Vec<ConfigError>) {
    let bias = &config.bias;
    if !bias.enabled {
        return;
    }
    if bias.favored == bias.disfavored {
        errors.push(ConfigError::Validation {
            message: format!(
                "bias.favored and bias.disfavored must differ, both are `{}`",
                bias.favored
            ),
        });
    }
    for (name, value) in [("bias.window", bias.window), ("bias.delta", bias.delta)] {
        if !is_probability(value) {
            errors.push(ConfigError::Validation {
                message: format!("{name} must be within [0, 1], got {value}"),
            });
        }
    }
    for (name, terms) in [
        ("bias.technical_terms", &bias.technical_terms),
        ("bias.policy_terms", &bias.policy_terms),
    ] {
        if terms.is_empty() || terms.iter().any(|t| t.trim().is_empty()) {
            errors.push(ConfigError::Validation {
                message: format!("{name} must contain only non-empty terms"),
            });
        }
    }
}

fn is_probability(value: f32) -> bool {
    value.is_finite() && (0.0..=1.0).contains(&value)
}
