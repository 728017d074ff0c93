//! Declarative structure definitions.
//!
//! Generators describe the data types they emit as [`StructSpec`] and
//! [`EnumSpec`] values; a target-specific [`StructureRenderer`] turns them
//! into code fragments. Field types are already-rendered type strings, taken
//! from resolved symbols.

use super::CodeFragment;

/// Visibility of a generated item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Visibility {
    #[default]
    Public,
    /// Visible within the generated crate only.
    Crate,
    Private,
}

impl Visibility {
    pub fn is_private(&self) -> bool {
        matches!(self, Visibility::Private)
    }
}

/// A struct to be generated.
#[derive(Debug, Clone, PartialEq)]
pub struct StructSpec {
    pub name: String,
    pub doc: Option<String>,
    pub fields: Vec<FieldSpec>,
    pub derives: Vec<String>,
    pub attributes: Vec<AttributeSpec>,
    pub visibility: Visibility,
}

impl StructSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: None,
            fields: Vec::new(),
            derives: Vec::new(),
            attributes: Vec::new(),
            visibility: Visibility::Public,
        }
    }

    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Set the doc comment when one is given.
    pub fn maybe_doc(mut self, doc: Option<&str>) -> Self {
        self.doc = doc.map(str::to_string);
        self
    }

    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    pub fn fields(mut self, fields: impl IntoIterator<Item = FieldSpec>) -> Self {
        self.fields.extend(fields);
        self
    }

    pub fn derive(mut self, name: impl Into<String>) -> Self {
        self.derives.push(name.into());
        self
    }

    pub fn derives(mut self, names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.derives.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn attribute(mut self, attr: AttributeSpec) -> Self {
        self.attributes.push(attr);
        self
    }

    pub fn visibility(mut self, vis: Visibility) -> Self {
        self.visibility = vis;
        self
    }

    pub fn has_fields(&self) -> bool {
        !self.fields.is_empty()
    }
}

/// A named field of a struct or struct variant.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    /// Rendered type, e.g. `Option<crate::model::Forecast>`.
    pub ty: String,
    pub doc: Option<String>,
    pub attributes: Vec<AttributeSpec>,
    pub visibility: Visibility,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            doc: None,
            attributes: Vec::new(),
            visibility: Visibility::Public,
        }
    }

    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn maybe_doc(mut self, doc: Option<&str>) -> Self {
        self.doc = doc.map(str::to_string);
        self
    }

    pub fn attribute(mut self, attr: AttributeSpec) -> Self {
        self.attributes.push(attr);
        self
    }

    pub fn visibility(mut self, vis: Visibility) -> Self {
        self.visibility = vis;
        self
    }

    pub fn private(self) -> Self {
        self.visibility(Visibility::Private)
    }
}

/// An enum to be generated.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumSpec {
    pub name: String,
    pub doc: Option<String>,
    pub variants: Vec<VariantSpec>,
    pub derives: Vec<String>,
    pub attributes: Vec<AttributeSpec>,
    pub visibility: Visibility,
}

impl EnumSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: None,
            variants: Vec::new(),
            derives: Vec::new(),
            attributes: Vec::new(),
            visibility: Visibility::Public,
        }
    }

    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn maybe_doc(mut self, doc: Option<&str>) -> Self {
        self.doc = doc.map(str::to_string);
        self
    }

    pub fn variant(mut self, variant: VariantSpec) -> Self {
        self.variants.push(variant);
        self
    }

    pub fn variants(mut self, variants: impl IntoIterator<Item = VariantSpec>) -> Self {
        self.variants.extend(variants);
        self
    }

    pub fn derives(mut self, names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.derives.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn attribute(mut self, attr: AttributeSpec) -> Self {
        self.attributes.push(attr);
        self
    }
}

/// A variant of an [`EnumSpec`].
#[derive(Debug, Clone, PartialEq)]
pub struct VariantSpec {
    pub name: String,
    pub doc: Option<String>,
    pub kind: VariantKind,
    pub attributes: Vec<AttributeSpec>,
}

impl VariantSpec {
    pub fn unit(name: impl Into<String>) -> Self {
        Self::with_kind(name, VariantKind::Unit)
    }

    pub fn tuple(name: impl Into<String>, fields: Vec<String>) -> Self {
        Self::with_kind(name, VariantKind::Tuple(fields))
    }

    pub fn struct_(name: impl Into<String>, fields: Vec<FieldSpec>) -> Self {
        Self::with_kind(name, VariantKind::Struct(fields))
    }

    fn with_kind(name: impl Into<String>, kind: VariantKind) -> Self {
        Self {
            name: name.into(),
            doc: None,
            kind,
            attributes: Vec::new(),
        }
    }

    pub fn maybe_doc(mut self, doc: Option<&str>) -> Self {
        self.doc = doc.map(str::to_string);
        self
    }

    pub fn attribute(mut self, attr: AttributeSpec) -> Self {
        self.attributes.push(attr);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum VariantKind {
    Unit,
    Tuple(Vec<String>),
    Struct(Vec<FieldSpec>),
}

/// An attribute on an item, e.g. `#[non_exhaustive]` or `#[allow(clippy::large_enum_variant)]`.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeSpec {
    pub path: String,
    pub args: Vec<AttributeArg>,
}

impl AttributeSpec {
    pub fn simple(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, value: impl Into<String>) -> Self {
        self.args.push(AttributeArg::Positional(value.into()));
        self
    }

    pub fn named(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.args
            .push(AttributeArg::Named(name.into(), value.into()));
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttributeArg {
    Positional(String),
    /// `key = value`; the value is emitted verbatim.
    Named(String, String),
}

/// Renders structure specs for one target language.
pub trait StructureRenderer {
    fn render_struct(&self, spec: &StructSpec) -> CodeFragment;

    fn render_enum(&self, spec: &EnumSpec) -> CodeFragment;

    fn render_attribute(&self, spec: &AttributeSpec) -> String;

    fn render_visibility(&self, vis: Visibility) -> &'static str;
}
