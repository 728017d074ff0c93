//! Code fragments: the unit decorators and generators exchange.
//!
//! A fragment tree is rendered lazily by [`CodeBuilder`](super::CodeBuilder),
//! which owns indentation. Fragments never carry absolute indentation, so a
//! fragment produced for one section can be appended after any other.

use super::CodeBuilder;

/// A piece of generated code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeFragment {
    /// A single line (newline appended).
    Line(String),
    Blank,
    /// Raw text without newline or indentation.
    Raw(String),
    /// Multi-line text; every non-empty line is indented at the current level.
    Text(String),
    /// A header line, indented body and optional closing line.
    Block {
        header: String,
        body: Vec<CodeFragment>,
        close: Option<String>,
    },
    Indent(Vec<CodeFragment>),
    Sequence(Vec<CodeFragment>),
    /// A `///` doc comment; multi-line text becomes one comment line per line.
    RustDoc(String),
}

impl CodeFragment {
    pub fn line(s: impl Into<String>) -> Self {
        Self::Line(s.into())
    }

    pub fn blank() -> Self {
        Self::Blank
    }

    pub fn raw(s: impl Into<String>) -> Self {
        Self::Raw(s.into())
    }

    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    pub fn block(
        header: impl Into<String>,
        body: Vec<CodeFragment>,
        close: Option<String>,
    ) -> Self {
        Self::Block {
            header: header.into(),
            body,
            close,
        }
    }

    /// A `{ ... }` block closed by `}`.
    pub fn braced(header: impl Into<String>, body: Vec<CodeFragment>) -> Self {
        Self::block(header, body, Some("}".to_string()))
    }

    pub fn indent(fragments: Vec<CodeFragment>) -> Self {
        Self::Indent(fragments)
    }

    pub fn sequence(fragments: Vec<CodeFragment>) -> Self {
        Self::Sequence(fragments)
    }

    pub fn rust_doc(s: impl Into<String>) -> Self {
        Self::RustDoc(s.into())
    }

    /// Does rendering this fragment produce no output at all?
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Raw(s) | Self::Text(s) => s.is_empty(),
            Self::Indent(fragments) | Self::Sequence(fragments) => {
                fragments.iter().all(CodeFragment::is_empty)
            }
            Self::Line(_) | Self::Blank | Self::Block { .. } | Self::RustDoc(_) => false,
        }
    }

    /// Render with Rust indentation starting at level zero.
    pub fn render(&self) -> String {
        let mut builder = CodeBuilder::rust();
        builder.emit(self);
        builder.build()
    }
}

/// Types that can be turned into code fragments.
pub trait Renderable {
    fn to_fragments(&self) -> Vec<CodeFragment>;
}

impl Renderable for CodeFragment {
    fn to_fragments(&self) -> Vec<CodeFragment> {
        vec![self.clone()]
    }
}

impl Renderable for Vec<CodeFragment> {
    fn to_fragments(&self) -> Vec<CodeFragment> {
        self.clone()
    }
}

impl<T: Renderable + ?Sized> Renderable for &T {
    fn to_fragments(&self) -> Vec<CodeFragment> {
        (*self).to_fragments()
    }
}

impl<T: Renderable + ?Sized> Renderable for Box<T> {
    fn to_fragments(&self) -> Vec<CodeFragment> {
        self.as_ref().to_fragments()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_braced_block_renders_with_indent() {
        let block = CodeFragment::braced(
            "impl Config {",
            vec![CodeFragment::line("pub fn new() -> Self { Self {} }")],
        );
        assert_eq!(
            block.render(),
            "impl Config {\n    pub fn new() -> Self { Self {} }\n}\n"
        );
    }

    #[test]
    fn test_text_indents_each_line() {
        let fragment = CodeFragment::braced(
            "fn f() {",
            vec![CodeFragment::text("let a = 1;\n\nlet b = a;\n")],
        );
        assert_eq!(fragment.render(), "fn f() {\n    let a = 1;\n\n    let b = a;\n}\n");
    }

    #[test]
    fn test_multiline_doc() {
        let doc = CodeFragment::rust_doc("First line.\n\nSecond paragraph.");
        assert_eq!(doc.render(), "/// First line.\n///\n/// Second paragraph.\n");
    }

    #[test]
    fn test_is_empty() {
        assert!(CodeFragment::sequence(vec![]).is_empty());
        assert!(CodeFragment::sequence(vec![CodeFragment::text("")]).is_empty());
        assert!(!CodeFragment::blank().is_empty());
        assert!(!CodeFragment::braced("{", vec![]).is_empty());
    }
}
