//! Term extraction from free-form text
//!
//! Two input conventions are supported:
//! - **Marked text**: multi-word phrases are bracketed in single quotes
//!   (`The 'quick brown' fox`); everything else is split into alphabetic words.
//! - **Line mode**: one term per line, taken verbatim (no splitting).
//!
//! Both return a `BTreeSet`, so iteration order is sorted and identical
//! across runs for the same input.

use crate::types::Term;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

static QUOTED_PHRASE: Lazy<Regex> = Lazy::new(|| Regex::new(r"'([^']+)'").expect("static regex"));

static ALPHABETIC_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\p{Alphabetic}+").expect("static regex"));

/// Extract the deduplicated term set from marked text
///
/// **Algorithm:**
/// 1. Collect every single-quoted span as a phrase term
/// 2. Blank those spans out so their words are not extracted again
/// 3. Collect every maximal alphabetic run of the remainder as a word term
/// 4. Union both sets (terms are case-folded, so duplicates collapse)
///
/// A quoted span with no alphabetic content is still kept as a term.
pub fn extract_terms(raw_text: &str) -> BTreeSet<Term> {
    let mut terms: BTreeSet<Term> = QUOTED_PHRASE
        .captures_iter(raw_text)
        .filter_map(|caps| Term::new(&caps[1]))
        .collect();

    // A space keeps the words on either side of a removed phrase apart
    let remainder = QUOTED_PHRASE.replace_all(raw_text, " ");

    terms.extend(
        ALPHABETIC_RUN
            .find_iter(&remainder)
            .filter_map(|m| Term::new(m.as_str())),
    );

    tracing::debug!(terms = terms.len(), "Extracted terms from marked text");
    terms
}

/// Line mode: every non-blank line is one term
pub fn extract_line_terms(raw_text: &str) -> BTreeSet<Term> {
    let terms: BTreeSet<Term> = raw_text.lines().filter_map(Term::new).collect();
    tracing::debug!(terms = terms.len(), "Extracted terms in line mode");
    terms
}
