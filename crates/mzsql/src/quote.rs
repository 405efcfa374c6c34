//! Identifier and literal quoting.
//!
//! Names are passed through verbatim (no case folding); only the quote
//! character is escaped, by doubling it.

/// Wrap an identifier in double quotes, doubling embedded double quotes.
pub fn quote_identifier(input: &str) -> String {
    format!("\"{}\"", input.replace('"', "\"\""))
}

/// Wrap a string literal in single quotes, doubling embedded single quotes.
pub fn quote_string(input: &str) -> String {
    format!("'{}'", input.replace('\'', "''"))
}

/// Join already-unquoted name parts into a dotted, fully quoted reference.
///
/// `qualified_name(&["db", "schema", "name"])` renders `"db"."schema"."name"`.
pub fn qualified_name(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|part| quote_identifier(part))
        .collect::<Vec<_>>()
        .join(".")
}

/// Render a boolean literal.
pub fn bool_literal(value: bool) -> &'static str {
    if value { "TRUE" } else { "FALSE" }
}

/// Render a string literal, or `NULL` when the value is absent or empty.
pub fn nullable_string(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => quote_string(v),
        _ => "NULL".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Inverse of `quote_identifier`, for checking reversibility.
    fn unquote_identifier(quoted: &str) -> Option<String> {
        let inner = quoted.strip_prefix('"')?.strip_suffix('"')?;
        let mut out = String::new();
        let mut chars = inner.chars().peekable();
        while let Some(c) = chars.next() {
            if c == '"' {
                // Every embedded quote must be doubled
                if chars.next() != Some('"') {
                    return None;
                }
            }
            out.push(c);
        }
        Some(out)
    }

    #[test]
    fn test_quote_identifier() {
        assert_eq!(quote_identifier("users"), "\"users\"");
        assert_eq!(quote_identifier("my\"table"), "\"my\"\"table\"");
        assert_eq!(quote_identifier(""), "\"\"");
        assert_eq!(quote_identifier("MixedCase"), "\"MixedCase\"");
    }

    #[test]
    fn test_quote_identifier_reversible() {
        for name in ["plain", "a\"b", "\"", "\"\"x\"", "", "with space", "it's"] {
            let quoted = quote_identifier(name);
            assert_eq!(unquote_identifier(&quoted).as_deref(), Some(name));
        }
    }

    #[test]
    fn test_quote_string() {
        assert_eq!(quote_string("value"), "'value'");
        assert_eq!(quote_string("it's"), "'it''s'");
        assert_eq!(quote_string(""), "''");
    }

    #[test]
    fn test_qualified_name() {
        assert_eq!(
            qualified_name(&["database", "schema", "name"]),
            r#""database"."schema"."name""#
        );
        assert_eq!(
            qualified_name(&["d\"b", "schema", "na\"me"]),
            r#""d""b"."schema"."na""me""#
        );
        assert_eq!(qualified_name(&["only"]), r#""only""#);
    }

    #[test]
    fn test_literals() {
        assert_eq!(bool_literal(true), "TRUE");
        assert_eq!(bool_literal(false), "FALSE");
        assert_eq!(nullable_string(None), "NULL");
        assert_eq!(nullable_string(Some("")), "NULL");
        assert_eq!(nullable_string(Some("hi")), "'hi'");
    }
}
