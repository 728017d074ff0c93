//! Rust rendering of [`StructSpec`] and [`EnumSpec`].

use kiln_codegen::builder::{
    AttributeArg, AttributeSpec, CodeFragment, EnumSpec, FieldSpec, StructSpec,
    StructureRenderer, VariantKind, VariantSpec, Visibility,
};

/// Renders structure specs as Rust items.
#[derive(Debug, Clone, Copy, Default)]
pub struct RustStructureRenderer;

impl RustStructureRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Doc comment, attributes and derives above an item.
    fn preamble(
        &self,
        doc: Option<&str>,
        attributes: &[AttributeSpec],
        derives: &[String],
    ) -> Vec<CodeFragment> {
        let mut out = Vec::new();
        if let Some(doc) = doc {
            out.push(CodeFragment::rust_doc(doc));
        }
        if !derives.is_empty() {
            out.push(CodeFragment::line(format!("#[derive({})]", derives.join(", "))));
        }
        out.extend(
            attributes
                .iter()
                .map(|attr| CodeFragment::line(self.render_attribute(attr))),
        );
        out
    }

    fn prefixed(&self, visibility: Visibility, rest: String) -> String {
        match self.render_visibility(visibility) {
            "" => rest,
            vis => format!("{} {}", vis, rest),
        }
    }

    fn render_field(&self, field: &FieldSpec) -> CodeFragment {
        let mut out = self.preamble(field.doc.as_deref(), &field.attributes, &[]);
        out.push(CodeFragment::line(self.prefixed(
            field.visibility,
            format!("{}: {},", field.name, field.ty),
        )));
        CodeFragment::sequence(out)
    }

    fn render_variant(&self, variant: &VariantSpec) -> CodeFragment {
        let mut out = self.preamble(variant.doc.as_deref(), &variant.attributes, &[]);
        out.push(match &variant.kind {
            VariantKind::Unit => CodeFragment::line(format!("{},", variant.name)),
            VariantKind::Tuple(types) => {
                CodeFragment::line(format!("{}({}),", variant.name, types.join(", ")))
            }
            VariantKind::Struct(fields) => CodeFragment::block(
                format!("{} {{", variant.name),
                fields
                    .iter()
                    .map(|f| CodeFragment::line(format!("{}: {},", f.name, f.ty)))
                    .collect(),
                Some("},".to_string()),
            ),
        });
        CodeFragment::sequence(out)
    }
}

impl StructureRenderer for RustStructureRenderer {
    fn render_struct(&self, spec: &StructSpec) -> CodeFragment {
        let mut out = self.preamble(spec.doc.as_deref(), &spec.attributes, &spec.derives);
        let decl = self.prefixed(spec.visibility, format!("struct {}", spec.name));
        if spec.has_fields() {
            out.push(CodeFragment::braced(
                format!("{} {{", decl),
                spec.fields.iter().map(|f| self.render_field(f)).collect(),
            ));
        } else {
            out.push(CodeFragment::line(format!("{} {{}}", decl)));
        }
        CodeFragment::sequence(out)
    }

    fn render_enum(&self, spec: &EnumSpec) -> CodeFragment {
        let mut out = self.preamble(spec.doc.as_deref(), &spec.attributes, &spec.derives);
        let decl = self.prefixed(spec.visibility, format!("enum {}", spec.name));
        out.push(CodeFragment::braced(
            format!("{} {{", decl),
            spec.variants.iter().map(|v| self.render_variant(v)).collect(),
        ));
        CodeFragment::sequence(out)
    }

    fn render_attribute(&self, spec: &AttributeSpec) -> String {
        if spec.args.is_empty() {
            return format!("#[{}]", spec.path);
        }
        let args: Vec<String> = spec
            .args
            .iter()
            .map(|arg| match arg {
                AttributeArg::Positional(value) => value.clone(),
                AttributeArg::Named(name, value) => format!("{} = {}", name, value),
            })
            .collect();
        format!("#[{}({})]", spec.path, args.join(", "))
    }

    fn render_visibility(&self, vis: Visibility) -> &'static str {
        match vis {
            Visibility::Public => "pub",
            Visibility::Crate => "pub(crate)",
            Visibility::Private => "",
        }
    }
}
