//! Rust function builder.

use kiln_codegen::builder::{CodeFragment, Renderable, Visibility};

/// A parameter in a Rust function.
#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub ty: String,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
        }
    }

    /// A receiver such as `&self` or `mut self`.
    pub fn receiver(receiver: impl Into<String>) -> Self {
        Self::new(receiver, "")
    }

    fn render(&self) -> String {
        if self.ty.is_empty() {
            self.name.clone()
        } else {
            format!("{}: {}", self.name, self.ty)
        }
    }
}

/// Builder for Rust functions and methods.
#[derive(Debug, Clone)]
pub struct Fn {
    name: String,
    doc: Option<String>,
    attrs: Vec<String>,
    visibility: Visibility,
    generics: Vec<String>,
    params: Vec<Param>,
    return_type: Option<String>,
    where_clauses: Vec<String>,
    body: Vec<CodeFragment>,
}

impl Fn {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: None,
            attrs: Vec::new(),
            visibility: Visibility::Public,
            generics: Vec::new(),
            params: Vec::new(),
            return_type: None,
            where_clauses: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn attr(mut self, attr: impl Into<String>) -> Self {
        self.attrs.push(attr.into());
        self
    }

    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn private(self) -> Self {
        self.visibility(Visibility::Private)
    }

    pub fn generic(mut self, param: impl Into<String>) -> Self {
        self.generics.push(param.into());
        self
    }

    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    pub fn returns(mut self, ty: impl Into<String>) -> Self {
        self.return_type = Some(ty.into());
        self
    }

    pub fn where_clause(mut self, clause: impl Into<String>) -> Self {
        self.where_clauses.push(clause.into());
        self
    }

    /// Add a line to the function body.
    pub fn body_line(mut self, line: impl Into<String>) -> Self {
        self.body.push(CodeFragment::line(line));
        self
    }

    /// Add a fragment (often a section rendering) to the body.
    pub fn body(mut self, fragment: CodeFragment) -> Self {
        self.body.push(fragment);
        self
    }

    fn signature(&self) -> String {
        let vis = match self.visibility {
            Visibility::Public => "pub ",
            Visibility::Crate => "pub(crate) ",
            Visibility::Private => "",
        };
        let generics = if self.generics.is_empty() {
            String::new()
        } else {
            format!("<{}>", self.generics.join(", "))
        };
        let params = self
            .params
            .iter()
            .map(Param::render)
            .collect::<Vec<_>>()
            .join(", ");
        let ret = self
            .return_type
            .as_ref()
            .map(|ty| format!(" -> {}", ty))
            .unwrap_or_default();
        format!("{}fn {}{}({}){}", vis, self.name, generics, params, ret)
    }

    pub fn to_fragment(&self) -> CodeFragment {
        let mut out = Vec::new();
        if let Some(doc) = &self.doc {
            out.push(CodeFragment::rust_doc(doc.as_str()));
        }
        out.extend(self.attrs.iter().map(|a| CodeFragment::line(format!("#[{}]", a))));

        let block = if self.where_clauses.is_empty() {
            CodeFragment::braced(format!("{} {{", self.signature()), self.body.clone())
        } else {
            let clauses = self
                .where_clauses
                .iter()
                .map(|c| CodeFragment::line(format!("{},", c)))
                .collect();
            CodeFragment::sequence(vec![
                CodeFragment::block(self.signature(), Vec::new(), None),
                CodeFragment::block("where", clauses, None),
                CodeFragment::braced("{", self.body.clone()),
            ])
        };
        out.push(block);
        CodeFragment::sequence(out)
    }

    pub fn build(&self) -> String {
        self.to_fragment().render()
    }
}

impl Renderable for Fn {
    fn to_fragments(&self) -> Vec<CodeFragment> {
        vec![self.to_fragment()]
    }
}
