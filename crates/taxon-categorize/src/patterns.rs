// SPDX-FileCopyrightText: 2026 Taxon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Whole-word phrase patterns.
//!
//! A phrase is escaped and matched case-insensitively. Word boundaries are
//! anchored only on edges that end in a word character, so `u.s.` still
//! matches before a space or at the end of a sentence.

use regex::{Regex, RegexBuilder};
use regex_syntax::is_word_character;
use taxon_core::TaxonError;

/// Regex source for one phrase, or `None` for a blank phrase.
pub fn phrase_source(phrase: &str) -> Option<String> {
    let phrase = phrase.trim().to_lowercase();
    let first = phrase.chars().next()?;
    let last = phrase.chars().next_back().unwrap_or(first);

    // Same Unicode `\w` the compiled pattern's `\b` is defined over.
    let lead = if is_word_character(first) { r"\b" } else { "" };
    let trail = if is_word_character(last) { r"\b" } else { "" };
    Some(format!("{lead}{}{trail}", regex::escape(&phrase)))
}

/// Compile a single whole-word, case-insensitive phrase pattern.
pub fn compile_phrase(phrase: &str) -> Result<Regex, TaxonError> {
    let source = phrase_source(phrase)
        .ok_or_else(|| TaxonError::Config("keyword phrase is empty".to_string()))?;
    build(&source)
}

fn build(source: &str) -> Result<Regex, TaxonError> {
    RegexBuilder::new(source)
        .case_insensitive(true)
        .build()
        .map_err(|e| TaxonError::Config(format!("invalid pattern `{source}`: {e}")))
}

/// A set of terms matched as one alternation: true if any term occurs.
#[derive(Debug, Clone)]
pub struct TermSet {
    regex: Regex,
}

impl TermSet {
    pub fn compile<S: AsRef<str>>(terms: &[S]) -> Result<Self, TaxonError> {
        let sources = terms
            .iter()
            .map(|t| {
                phrase_source(t.as_ref())
                    .ok_or_else(|| TaxonError::Config("term list contains an empty term".into()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        if sources.is_empty() {
            return Err(TaxonError::Config("term list is empty".to_string()));
        }
        let regex = build(&format!("(?:{})", sources.join("|")))?;
        Ok(Self { regex })
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phrase_matches_whole_words_only() {
        let re = compile_phrase("Iceberg").unwrap();
        assert!(re.is_match("Apache ICEBERG tables"));
        assert!(!re.is_match("icebergs-related news"));
        assert!(!re.is_match("supericeberg"));
    }

    #[test]
    fn internal_whitespace_is_literal() {
        let re = compile_phrase("data lake").unwrap();
        assert!(re.is_match("a new data lake for logs"));
        assert!(!re.is_match("datalake"));
    }

    #[test]
    fn punctuated_phrase_matches_before_space() {
        let re = compile_phrase("u.s.").unwrap();
        assert!(re.is_match("the U.S. senate voted"));
        assert!(re.is_match("made in the u.s."));
        assert!(!re.is_match("thus."));
        assert!(!re.is_match("uxsx"));
    }

    #[test]
    fn combining_mark_edge_is_a_word_boundary() {
        let re = compile_phrase("cafe\u{301}").unwrap();
        assert_eq!(phrase_source("cafe\u{301}").unwrap(), "\\bcafe\u{301}\\b");
        assert!(re.is_match("Cafe\u{301} opens downtown"));
        assert!(!re.is_match("three cafe\u{301}s downtown"));
    }

    #[test]
    fn connector_punctuation_edge_is_a_word_boundary() {
        let re = compile_phrase("tab\u{203F}").unwrap();
        assert!(re.is_match("a tab\u{203F} here"));
        assert!(!re.is_match("a tab\u{203F}x here"));
    }

    #[test]
    fn blank_phrase_is_rejected() {
        assert!(phrase_source("   ").is_none());
        assert!(compile_phrase("").is_err());
    }

    #[test]
    fn term_set_matches_any_term() {
        let set = TermSet::compile(&["us", "united states", "america"]).unwrap();
        assert!(set.is_match("Across America today"));
        assert!(set.is_match("US lawmakers"));
        assert!(!set.is_match("users and buses"));
    }

    #[test]
    fn empty_term_set_is_rejected() {
        let empty: [&str; 0] = [];
        assert!(TermSet::compile(&empty).is_err());
        assert!(TermSet::compile(&["ok", " "]).is_err());
    }
}
