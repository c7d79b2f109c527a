// SPDX-FileCopyrightText: 2026 Taxon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `taxon labels` command implementation.

use std::fmt::Write as _;

use taxon_categorize::Taxonomy;
use taxon_config::TaxonConfig;
use taxon_core::TaxonError;

/// Compile the taxonomy and print every label with its rules.
pub fn run_labels(config: &TaxonConfig) -> Result<(), TaxonError> {
    let taxonomy = Taxonomy::compile(&config.labels)?;
    print!("{}", render(config, &taxonomy));
    Ok(())
}

fn render(config: &TaxonConfig, taxonomy: &Taxonomy) -> String {
    let mut out = String::new();
    for rule in taxonomy.rules() {
        let _ = writeln!(out, "{}", rule.label);
        let _ = writeln!(out, "  description: {}", rule.description);
        let _ = writeln!(
            out,
            "  threshold: {:.2}  min_hits: {}  keywords: {}",
            rule.threshold,
            rule.min_hits,
            rule.phrases.len()
        );
        if let Some(gate) = &config.labels.get(rule.label).gate {
            for (i, group) in gate.all_of.iter().enumerate() {
                let _ = writeln!(out, "  gate[{i}]: any of {}", group.join(" | "));
            }
        }
        let _ = writeln!(out, "  phrases: {}", rule.phrases.join(", "));
    }
    out
}
