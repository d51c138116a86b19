//! Drive query-language expressions.
//!
//! User input only ever appears inside single-quoted string literals, and
//! is escaped so a quote in a file name cannot end the literal early.

use super::FOLDER_MIME_TYPE;

/// Escapes a value for use inside a single-quoted query literal.
pub fn escape_literal(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if c == '\\' || c == '\'' {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Files whose name contains `fragment`.
pub fn name_contains(fragment: &str) -> String {
    format!("name contains '{}'", escape_literal(fragment))
}

/// Folders named exactly `name`.
pub fn folder_named(name: &str) -> String {
    format!(
        "name = '{}' and mimeType = '{}'",
        escape_literal(name),
        FOLDER_MIME_TYPE
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_values_pass_through() {
        assert_eq!(name_contains("report"), "name contains 'report'");
    }

    #[test]
    fn quotes_are_escaped() {
        assert_eq!(
            name_contains("it's"),
            r"name contains 'it\'s'"
        );
        assert_eq!(
            name_contains("x' or name contains '"),
            r"name contains 'x\' or name contains \''"
        );
    }

    #[test]
    fn backslashes_are_escaped() {
        assert_eq!(escape_literal(r"a\b"), r"a\\b");
        assert_eq!(escape_literal(r"\'"), r"\\\'");
    }

    #[test]
    fn folder_query() {
        assert_eq!(
            folder_named("Cerebro_Proyecto_Gemini"),
            "name = 'Cerebro_Proyecto_Gemini' and mimeType = 'application/vnd.google-apps.folder'"
        );
    }
}
