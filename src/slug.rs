//! Slug derivation for article titles.
//!
//! Deterministic by construction: the same title always yields the same
//! slug, which is what makes slug re-derivation on title change idempotent.

use regex::Regex;
use std::sync::LazyLock;

static NON_SLUG_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("valid slug regex"));

/// Lower-cases the title and collapses every run of non-alphanumeric
/// characters into a single hyphen, trimming hyphens at both ends.
#[must_use]
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase();
    let hyphenated = NON_SLUG_CHARS.replace_all(&lowered, "-");
    hyphenated.trim_matches('-').to_string()
}
