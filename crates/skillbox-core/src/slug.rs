//! Filesystem-safe slugs for free-text titles.

use std::sync::LazyLock;

use regex::Regex;

/// Characters that are neither word characters, whitespace nor hyphens.
static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s-]").expect("Invalid unsafe-chars regex"));

/// Runs of whitespace and hyphens, collapsed into a single separator.
static SEPARATOR_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-\s]+").expect("Invalid separator regex"));

/// Derives a lowercase, hyphen-separated slug from a title.
///
/// Punctuation is dropped, surrounding whitespace trimmed, and every run of
/// whitespace or hyphens becomes one `-`. Word characters are Unicode-aware,
/// so accented letters survive.
///
/// ```
/// assert_eq!(skillbox_core::slugify("My Report: Q3!!"), "my-report-q3");
/// ```
pub fn slugify(title: &str) -> String {
    let stripped = UNSAFE_CHARS.replace_all(title, "");
    let lowered = stripped.trim().to_lowercase();
    SEPARATOR_RUNS.replace_all(&lowered, "-").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_punctuation() {
        assert_eq!(slugify("My Report: Q3!!"), "my-report-q3");
    }

    #[test]
    fn collapses_whitespace_runs() {
        assert_eq!(slugify("  multiple   spaces "), "multiple-spaces");
    }

    #[test]
    fn collapses_mixed_hyphens_and_spaces() {
        assert_eq!(slugify("a - b -- c"), "a-b-c");
    }

    #[test]
    fn keeps_unicode_word_characters() {
        assert_eq!(slugify("Análisis de Mercado"), "análisis-de-mercado");
    }

    #[test]
    fn keeps_underscores_and_digits() {
        assert_eq!(slugify("release_notes v2.1"), "release_notes-v21");
    }

    #[test]
    fn punctuation_only_title_is_empty() {
        assert_eq!(slugify("?!"), "");
    }
}
