//! Rust impl block builder.

use kiln_codegen::builder::{CodeFragment, Renderable};

use super::Fn;

/// Builder for Rust impl blocks.
#[derive(Debug, Clone)]
pub struct Impl {
    type_name: String,
    generics: Vec<String>,
    trait_name: Option<String>,
    where_clauses: Vec<String>,
    items: Vec<CodeFragment>,
}

impl Impl {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            generics: Vec::new(),
            trait_name: None,
            where_clauses: Vec::new(),
            items: Vec::new(),
        }
    }

    /// Create an impl block for a trait.
    pub fn for_trait(mut self, trait_name: impl Into<String>) -> Self {
        self.trait_name = Some(trait_name.into());
        self
    }

    pub fn generic(mut self, param: impl Into<String>) -> Self {
        self.generics.push(param.into());
        self
    }

    pub fn where_clause(mut self, clause: impl Into<String>) -> Self {
        self.where_clauses.push(clause.into());
        self
    }

    pub fn method(mut self, method: Fn) -> Self {
        self.items.push(method.to_fragment());
        self
    }

    /// Add an arbitrary item; empty fragments are dropped.
    pub fn item(mut self, item: CodeFragment) -> Self {
        if !item.is_empty() {
            self.items.push(item);
        }
        self
    }

    fn header(&self) -> String {
        let generics = if self.generics.is_empty() {
            String::new()
        } else {
            format!("<{}>", self.generics.join(", "))
        };
        match &self.trait_name {
            Some(trait_name) => format!("impl{} {} for {}", generics, trait_name, self.type_name),
            None => format!("impl{} {}", generics, self.type_name),
        }
    }

    pub fn to_fragment(&self) -> CodeFragment {
        let mut body = Vec::new();
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                body.push(CodeFragment::blank());
            }
            body.push(item.clone());
        }
        if self.where_clauses.is_empty() {
            return CodeFragment::braced(format!("{} {{", self.header()), body);
        }
        let clauses = self
            .where_clauses
            .iter()
            .map(|c| CodeFragment::line(format!("{},", c)))
            .collect();
        CodeFragment::sequence(vec![
            CodeFragment::block(self.header(), Vec::new(), None),
            CodeFragment::block("where", clauses, None),
            CodeFragment::braced("{", body),
        ])
    }

    pub fn build(&self) -> String {
        self.to_fragment().render()
    }
}

impl Renderable for Impl {
    fn to_fragments(&self) -> Vec<CodeFragment> {
        vec![self.to_fragment()]
    }
}
