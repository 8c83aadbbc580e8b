use fancy_regex::{Regex, RegexBuilder};

/// Backtracking budget for a single match attempt.
const BACKTRACK_LIMIT: usize = 1_000_000;

pub(crate) fn build(pattern: &str) -> Result<Regex, fancy_regex::Error> {
    RegexBuilder::new(pattern)
        .backtrack_limit(BACKTRACK_LIMIT)
        .build()
}

/// Wrap `pattern` so it has to match the whole input.
pub(crate) fn anchored(pattern: &str) -> String {
    format!("^(?:{pattern})$")
}

/// Search `text` for a match. Exceeding the backtracking budget counts as no match.
#[inline]
pub(crate) fn is_match(regex: &Regex, text: &str) -> bool {
    regex.is_match(text).unwrap_or(false)
}
