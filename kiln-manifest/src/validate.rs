//! Validation context and identifier rules for kiln.toml values.

use std::sync::Arc;

use miette::SourceSpan;

use crate::{Error, Result, error::SourceContext};

/// Validation context that carries source information.
///
/// Holds the shared [`SourceContext`] and the table path being validated
/// (e.g. `["codegen"]`), so error messages can say where a value lives.
///
/// # Example
///
/// ```ignore
/// let ctx = ParseContext::new(src, "kiln.toml").push("codegen");
/// ctx.validate_name("weather_sdk", "module name")?;
/// ```
#[derive(Debug, Clone)]
pub struct ParseContext<'a> {
    source: Arc<SourceContext>,
    path: Vec<&'a str>,
}

impl<'a> ParseContext<'a> {
    pub fn new(src: &str, filename: &str) -> Self {
        Self {
            source: Arc::new(SourceContext::new(src, filename)),
            path: Vec::new(),
        }
    }

    pub fn src(&self) -> &str {
        self.source.src()
    }

    pub fn source_context(&self) -> &SourceContext {
        &self.source
    }

    /// Push a table segment and return a new context.
    pub fn push(&self, segment: &'a str) -> Self {
        let mut path = self.path.clone();
        path.push(segment);
        Self {
            source: Arc::clone(&self.source),
            path,
        }
    }

    /// The current table path, dot-separated.
    pub fn path_string(&self) -> String {
        self.path.join(".")
    }

    /// Describe `kind` relative to the current table, e.g. "module name in 'codegen'".
    pub fn context_for(&self, kind: &str) -> String {
        if self.path.is_empty() {
            kind.to_string()
        } else {
            format!("{} in '{}'", kind, self.path_string())
        }
    }

    /// Span of the quoted string value `value` in the source.
    pub fn find_value_span(&self, value: &str) -> Option<SourceSpan> {
        find_value_spans(self.src(), value).into_iter().next()
    }

    pub fn validation_error(&self, message: impl Into<String>, value: &str) -> Box<Error> {
        self.source
            .validation_error(message, self.find_value_span(value))
    }

    /// Check that `name` can be used as a Rust identifier once dashes are
    /// turned into underscores.
    pub fn validate_name(&self, name: &str, kind: &str) -> Result<()> {
        let span = self.find_value_span(name);
        if is_rust_keyword(name) {
            return Err(self
                .source
                .reserved_keyword_error(name, self.context_for(kind), span));
        }
        if let Some(reason) = validate_identifier(name) {
            return Err(self.source.invalid_identifier_error(
                name,
                self.context_for(kind),
                reason,
                span,
            ));
        }
        Ok(())
    }
}

/// Rust reserved keywords that cannot be used as identifiers
/// Source: https://doc.rust-lang.org/reference/keywords.html
pub(crate) const RUST_KEYWORDS: &[&str] = &[
    // Strict keywords
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum", "extern",
    "false", "fn", "for", "gen", "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut",
    "pub", "ref", "return", "self", "Self", "static", "struct", "super", "trait", "true", "type",
    "unsafe", "use", "where", "while",
    // Reserved keywords
    "abstract", "become", "box", "do", "final", "macro", "override", "priv", "try", "typeof",
    "unsized", "virtual", "yield",
    // Weak keywords
    "union",
];

pub(crate) fn is_rust_keyword(name: &str) -> bool {
    RUST_KEYWORDS.contains(&name)
}

/// Spans of every `"value"` occurrence in the source, pointing inside the quotes.
pub(crate) fn find_value_spans(src: &str, value: &str) -> Vec<SourceSpan> {
    let quoted = format!("\"{}\"", value);
    src.match_indices(&quoted)
        .map(|(pos, _)| SourceSpan::from((pos + 1, value.len())))
        .collect()
}

/// Returns None if `name` is a valid (possibly dashed) identifier,
/// Some(reason) otherwise.
///
/// Dashes are allowed (`weather-sdk`) and become underscores in generated
/// Rust paths.
pub(crate) fn validate_identifier(name: &str) -> Option<&'static str> {
    if name.is_empty() {
        return Some("name cannot be empty");
    }

    if is_rust_keyword(name) {
        return Some("name is a Rust reserved keyword");
    }
    if is_rust_keyword(&name.replace('-', "_")) {
        return Some("name converts to a Rust reserved keyword");
    }

    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        Some(_) => return Some("name must start with a letter or underscore"),
        None => return Some("name cannot be empty"),
    }

    let mut prev_was_dash = false;
    for c in chars {
        if c == '-' {
            if prev_was_dash {
                return Some("name cannot contain consecutive dashes");
            }
            prev_was_dash = true;
        } else if c.is_ascii_alphanumeric() || c == '_' {
            prev_was_dash = false;
        } else {
            return Some("name must contain only letters, numbers, underscores, and dashes");
        }
    }

    if prev_was_dash {
        return Some("name cannot end with a dash");
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_identifiers() {
        assert!(validate_identifier("weather_sdk").is_none());
        assert!(validate_identifier("WeatherSdk").is_none());
        assert!(validate_identifier("_private").is_none());
        assert!(validate_identifier("s3").is_none());
        assert!(validate_identifier("weather-sdk").is_none());
    }

    #[test]
    fn test_reserved_keywords() {
        for keyword in ["fn", "struct", "crate", "self", "Self", "type", "gen"] {
            assert!(validate_identifier(keyword).is_some(), "{keyword}");
        }
    }

    #[test]
    fn test_invalid_identifiers() {
        assert!(validate_identifier("").is_some());
        assert!(validate_identifier("1st").is_some());
        assert!(validate_identifier("-sdk").is_some());
        assert!(validate_identifier("sdk-").is_some());
        assert!(validate_identifier("weather--sdk").is_some());
        assert!(validate_identifier("weather.sdk").is_some());
    }

    #[test]
    fn test_find_value_spans() {
        let src = r#"enabled = ["s3", "sdk-config", "s3"]"#;
        let spans = find_value_spans(src, "s3");
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].offset(), 12);
        assert_eq!(spans[0].len(), 2);
        assert_eq!(spans[1].offset(), 32);
    }

    #[test]
    fn test_context_for() {
        let ctx = ParseContext::new("", "kiln.toml");
        assert_eq!(ctx.context_for("module name"), "module name");
        assert_eq!(
            ctx.push("codegen").context_for("module name"),
            "module name in 'codegen'"
        );
    }

    #[test]
    fn test_validate_name_reports_keyword_with_span() {
        let src = "[codegen]\nmodule-name = \"crate\"\n";
        let ctx = ParseContext::new(src, "kiln.toml").push("codegen");
        let err = ctx.validate_name("crate", "module name").unwrap_err();

        assert!(err.to_string().contains("reserved keyword"));
        match *err {
            Error::ReservedKeyword { span, .. } => {
                assert_eq!(span.map(|s| s.offset()), Some(25));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
