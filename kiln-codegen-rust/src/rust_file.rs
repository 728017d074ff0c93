//! Whole-file layout for generated Rust sources.

use kiln_codegen::builder::{CodeBuilder, CodeFragment, Indent, Renderable};

/// A generated Rust source file.
///
/// Layout, top to bottom: inner doc comment, inner attributes, then body
/// items separated by blank lines. The generated header is added by the
/// file rules when the file is written.
#[derive(Debug, Default)]
pub struct RustFile {
    doc: Option<String>,
    attributes: Vec<CodeFragment>,
    body: Vec<CodeFragment>,
}

impl RustFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Module documentation (`//!`).
    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Inner attributes, typically a section rendering.
    pub fn attributes(mut self, attributes: CodeFragment) -> Self {
        if !attributes.is_empty() {
            self.attributes.push(attributes);
        }
        self
    }

    /// Add a body item; empty fragments are dropped so no stray blank
    /// lines appear.
    #[allow(clippy::should_implement_trait)]
    pub fn add<R: Renderable>(mut self, node: R) -> Self {
        let item = CodeFragment::sequence(node.to_fragments());
        if !item.is_empty() {
            self.body.push(item);
        }
        self
    }

    pub fn add_all<R: Renderable>(self, nodes: impl IntoIterator<Item = R>) -> Self {
        nodes.into_iter().fold(self, RustFile::add)
    }

    pub fn is_empty(&self) -> bool {
        self.doc.is_none() && self.attributes.is_empty() && self.body.is_empty()
    }

    pub fn render(&self) -> String {
        let mut builder = CodeBuilder::new(Indent::RUST);
        let mut sections = 0;

        if let Some(doc) = &self.doc {
            for line in doc.lines() {
                if line.is_empty() {
                    builder.push_line("//!");
                } else {
                    builder.push_line(&format!("//! {}", line));
                }
            }
            sections += 1;
        }
        if !self.attributes.is_empty() {
            if sections > 0 {
                builder.push_blank();
            }
            for attributes in &self.attributes {
                builder.emit(attributes);
            }
            sections += 1;
        }
        for item in &self.body {
            if sections > 0 {
                builder.push_blank();
            }
            builder.emit(item);
            sections += 1;
        }
        builder.build()
    }
}
