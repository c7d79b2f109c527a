// SPDX-FileCopyrightText: 2026 Taxon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Taxon categorization engine.
//!
//! Provides TOML configuration parsing with strict validation (`deny_unknown_fields`),
//! XDG file hierarchy lookup, environment variable overrides, and miette
//! diagnostic rendering with typo suggestions. Configuration errors are
//! startup errors: nothing is categorized until the config validates.
//!
//! # Usage
//!
//! ```no_run
//! use taxon_config::load_and_validate;
//!
//! let config = load_and_validate(None).expect("config errors");
//! println!("margin: {}", config.decision.margin);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use std::path::Path;

pub use diagnostic::{render_errors, ConfigError};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::TaxonConfig;

/// Load configuration and validate it.
///
/// With `path`, only that file (plus `TAXON_*` env vars) is layered over the
/// defaults; otherwise the XDG hierarchy is used. Figment errors are
/// converted to diagnostics with typo suggestions.
pub fn load_and_validate(path: Option<&Path>) -> Result<TaxonConfig, Vec<ConfigError>> {
    let loaded = match path {
        Some(p) => {
            if !p.is_file() {
                return Err(vec![ConfigError::Other(format!(
                    "config file {} does not exist",
                    p.display()
                ))]);
            }
            loader::load_config_from_path(p)
        }
        None => loader::load_config(),
    };

    match loaded {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => {
            let toml_sources = collect_toml_sources(path);
            Err(diagnostic::figment_to_config_errors(err, &toml_sources))
        }
    }
}

/// Load configuration from a TOML string and validate it.
///
/// Useful for testing and explicit configuration.
pub fn load_and_validate_str(toml_content: &str) -> Result<TaxonConfig, Vec<ConfigError>> {
    match loader::load_config_from_str(toml_content) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => {
            let sources = vec![("<inline>".to_string(), toml_content.to_string())];
            Err(diagnostic::figment_to_config_errors(err, &sources))
        }
    }
}

/// Collect TOML source file contents for error span resolution.
fn collect_toml_sources(explicit: Option<&Path>) -> Vec<(String, String)> {
    let mut sources = Vec::new();

    if let Some(path) = explicit {
        if let Ok(content) = std::fs::read_to_string(path) {
            let abs = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
            sources.push((abs.display().to_string(), content));
        }
        return sources;
    }

    if let Ok(content) = std::fs::read_to_string("taxon.toml") {
        let path = std::env::current_dir()
            .map(|d| d.join("taxon.toml").display().to_string())
            .unwrap_or_else(|_| "taxon.toml".to_string());
        sources.push((path, content));
    }

    if let Some(config_dir) = dirs::config_dir() {
        let path = config_dir.join("taxon/taxon.toml");
        if let Ok(content) = std::fs::read_to_string(&path) {
            sources.push((path.display().to_string(), content));
        }
    }

    let system_path = Path::new("/etc/taxon/taxon.toml");
    if let Ok(content) = std::fs::read_to_string(system_path) {
        sources.push((system_path.display().to_string(), content));
    }

    sources
}
