// SPDX-FileCopyrightText: 2026 Taxon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./taxon.toml` > `~/.config/taxon/taxon.toml` > `/etc/taxon/taxon.toml`
//! with environment variable overrides via `TAXON_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::TaxonConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/taxon/taxon.toml` (system-wide)
/// 3. `~/.config/taxon/taxon.toml` (user XDG config)
/// 4. `./taxon.toml` (local directory)
/// 5. `TAXON_*` environment variables
pub fn load_config() -> Result<TaxonConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<TaxonConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TaxonConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<TaxonConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TaxonConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading.
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(TaxonConfig::default()))
        .merge(Toml::file("/etc/taxon/taxon.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("taxon/taxon.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("taxon.toml"))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")`: `TAXON_DECISION_FINAL_MIN_SCORE` must
/// map to `decision.final_min_score`, not `decision.final.min.score`.
/// Label sections are not reachable from the environment.
fn env_provider() -> Env {
    Env::prefixed("TAXON_").map(|key| {
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("app_", "app.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("classifier_", "classifier.", 1)
            .replacen("text_", "text.", 1)
            .replacen("decision_", "decision.", 1)
            .replacen("bias_", "bias.", 1)
            .replacen("batch_", "batch.", 1);
        mapped.into()
    })
}
