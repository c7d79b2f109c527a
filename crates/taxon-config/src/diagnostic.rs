// SPDX-FileCopyrightText: 2026 Taxon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Figment-to-miette error bridge with fuzzy match suggestions.
//!
//! Converts Figment deserialization errors into miette diagnostics with
//! source spans, valid key listings, and "did you mean?" suggestions using
//! Jaro-Winkler string similarity. Misspelled label sections such as
//! `[labels."Data Engineerng"]` are reported the same way as misspelled keys.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Minimum Jaro-Winkler similarity score to suggest a correction.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// A configuration error with rich diagnostic information.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// An unknown key (or label section) was found in the configuration.
    #[error("unknown configuration key `{key}`")]
    #[diagnostic(
        code(taxon::config::unknown_key),
        help("{}", format_unknown_key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        key: String,
        suggestion: Option<String>,
        valid_keys: String,
        #[label("this key is not recognized")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A configuration value has the wrong type.
    #[error("invalid type for key `{key}`: {detail}")]
    #[diagnostic(code(taxon::config::invalid_type), help("expected {expected}"))]
    InvalidType {
        key: String,
        detail: String,
        expected: String,
    },

    /// A value does not name a known variant (e.g. an unknown label in `bias.favored`).
    #[error("invalid value for key `{key}`: {detail}")]
    #[diagnostic(
        code(taxon::config::invalid_value),
        help("{}", format_unknown_key_help(suggestion.as_deref(), valid_values))
    )]
    InvalidValue {
        key: String,
        detail: String,
        suggestion: Option<String>,
        valid_values: String,
    },

    /// A required configuration key is missing.
    #[error("missing required key `{key}`")]
    #[diagnostic(
        code(taxon::config::missing_key),
        help("add `{key} = <value>` to your taxon.toml")
    )]
    MissingKey { key: String },

    /// A validation error for a config value.
    #[error("validation error: {message}")]
    #[diagnostic(code(taxon::config::validation))]
    Validation { message: String },

    /// Catch-all for other configuration errors.
    #[error("configuration error: {0}")]
    #[diagnostic(code(taxon::config::other))]
    Other(String),
}

fn format_unknown_key_help(suggestion: Option<&str>, valid: &str) -> String {
    match suggestion {
        Some(s) => format!("did you mean `{s}`? Valid: {valid}"),
        None => format!("valid: {valid}"),
    }
}

/// Convert a `figment::Error` into a list of `ConfigError` diagnostics.
pub fn figment_to_config_errors(
    err: figment::Error,
    toml_sources: &[(String, String)],
) -> Vec<ConfigError> {
    use figment::error::Kind;

    let mut errors = Vec::new();

    for error in err {
        let path: Vec<String> = error.path.iter().map(|s| s.to_string()).collect();
        let config_error = match &error.kind {
            Kind::UnknownField(field, expected) => {
                let valid_keys: Vec<&str> = expected.to_vec();
                let suggestion = suggest_key(field, &valid_keys);
                let (span, src) = find_source_span(&error, &path, field, toml_sources);

                ConfigError::UnknownKey {
                    key: qualified(&path, field),
                    suggestion,
                    valid_keys: valid_keys.join(", "),
                    span,
                    src,
                }
            }
            Kind::UnknownVariant(value, expected) => {
                let valid_values: Vec<&str> = expected.to_vec();
                ConfigError::InvalidValue {
                    key: path.join("."),
                    detail: format!("`{value}` is not recognized"),
                    suggestion: suggest_key(value, &valid_values),
                    valid_values: valid_values.join(", "),
                }
            }
            Kind::MissingField(field) => ConfigError::MissingKey {
                key: qualified(&path, field),
            },
            Kind::InvalidType(actual, expected) => ConfigError::InvalidType {
                key: path.join("."),
                detail: format!("found {actual}, expected {expected}"),
                expected: expected.to_string(),
            },
            _ => ConfigError::Other(format!("{error}")),
        };

        errors.push(config_error);
    }

    errors
}

fn qualified(path: &[String], field: &str) -> String {
    if path.is_empty() {
        field.to_string()
    } else {
        format!("{}.{field}", path.join("."))
    }
}

/// Find source span for an error in the TOML source files.
fn find_source_span(
    error: &figment::error::Error,
    path: &[String],
    field: &str,
    toml_sources: &[(String, String)],
) -> (Option<SourceSpan>, Option<NamedSource<String>>) {
    let source_path = error
        .metadata
        .as_ref()
        .and_then(|m| m.source.as_ref())
        .and_then(|s| match s {
            figment::Source::File(path) => Some(path.display().to_string()),
            _ => None,
        });

    // Inline sources carry no file metadata; fall back to a single inline source.
    let source = match source_path {
        Some(p) => toml_sources
            .iter()
            .find(|(sp, _)| *sp == p)
            .map(|(sp, content)| (sp.as_str(), content.as_str())),
        None if toml_sources.len() == 1 => toml_sources
            .first()
            .map(|(sp, content)| (sp.as_str(), content.as_str())),
        None => None,
    };

    if let Some((name, content)) = source
        && let Some(offset) = find_key_offset(content, path, field)
    {
        let span = SourceSpan::new(offset.into(), field.len());
        let named = NamedSource::new(name, content.to_string());
        return (Some(span), Some(named));
    }

    (None, None)
}

/// Find the byte offset of a key in TOML content, relative to a section path.
///
/// For `path = ["decision"]` and `field = "margni"`, finds the `[decision]`
/// header and then the key after it. A misspelled label section like
/// `[labels."Data Engineerng"]` is found by its quoted header.
pub fn find_key_offset(content: &str, path: &[String], field: &str) -> Option<usize> {
    let section_header = |segments: &[String]| -> String {
        let parts: Vec<String> = segments
            .iter()
            .map(|s| {
                if s.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-') {
                    s.clone()
                } else {
                    format!("\"{s}\"")
                }
            })
            .collect();
        format!("[{}]", parts.join("."))
    };

    // An unknown table name appears as a header, bare or quoted:
    // `[labels.Sports]` or `[labels."Sports"]`.
    let mut as_table = path.to_vec();
    as_table.push(field.to_string());
    let bare = section_header(&as_table);
    let quoted = if path.is_empty() {
        format!("[\"{field}\"]")
    } else {
        format!("{}.\"{field}\"]", section_header(path).trim_end_matches(']'))
    };
    for header in [bare, quoted] {
        if let Some(pos) = content.find(&header) {
            return content[pos..].find(field).map(|rel| pos + rel);
        }
    }

    let search_start = if path.is_empty() {
        0
    } else {
        let header = section_header(path);
        content.find(&header).map(|pos| pos + header.len())?
    };

    let remaining = &content[search_start..];
    let mut byte_offset = 0;
    for line in remaining.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with('[') && byte_offset > 0 {
            break;
        }
        if let Some(after) = trimmed.strip_prefix(field)
            && (after.starts_with(' ') || after.starts_with('=') || after.starts_with('\t'))
        {
            let field_start_in_line = line.len() - trimmed.len();
            return Some(search_start + byte_offset + field_start_in_line);
        }
        byte_offset += line.len() + 1;
    }

    None
}

/// Suggest a similar key name using Jaro-Winkler string similarity.
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    let mut best_score = SUGGESTION_THRESHOLD;
    let mut best_match = None;

    for &key in valid_keys {
        let score = strsim::jaro_winkler(unknown, key);
        if score > best_score {
            best_score = score;
            best_match = Some(key.to_string());
        }
    }

    best_match
}

/// Render a list of `ConfigError`s to stderr using miette's graphical handler.
pub fn render_errors(errors: &[ConfigError]) {
    use miette::GraphicalReportHandler;

    let handler = GraphicalReportHandler::new();
    for error in errors {
        let mut buf = String::new();
        let diagnostic: &dyn Diagnostic = error;
        if handler.render_report(&mut buf, diagnostic).is_ok() {
            eprint!("{buf}");
        } else {
            eprintln!("Error: {error}");
        }
    }
}
