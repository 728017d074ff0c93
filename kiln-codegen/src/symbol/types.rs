//! Target-language symbols.

use std::{collections::BTreeSet, fmt};

use crate::builder::Visibility;

/// Shape of a target-language type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SymbolType {
    /// A named type, optionally qualified by a path (`crate::model`).
    Opaque {
        name: String,
        namespace: Option<String>,
    },
    Option(Box<SymbolType>),
    Vec(Box<SymbolType>),
    Map {
        key: Box<SymbolType>,
        value: Box<SymbolType>,
    },
    Box(Box<SymbolType>),
    Reference(Box<SymbolType>),
}

impl SymbolType {
    pub fn opaque(name: impl Into<String>, namespace: Option<&str>) -> Self {
        SymbolType::Opaque {
            name: name.into(),
            namespace: namespace.map(str::to_string),
        }
    }

    /// The innermost named type.
    pub fn base(&self) -> (&str, Option<&str>) {
        match self {
            SymbolType::Opaque { name, namespace } => (name, namespace.as_deref()),
            SymbolType::Option(inner)
            | SymbolType::Vec(inner)
            | SymbolType::Box(inner)
            | SymbolType::Reference(inner) => inner.base(),
            SymbolType::Map { value, .. } => value.base(),
        }
    }

    /// Fully qualified rendering, e.g. `Option<Box<crate::model::Node>>`.
    pub fn render(&self) -> String {
        match self {
            SymbolType::Opaque {
                name,
                namespace: Some(ns),
            } => format!("{}::{}", ns, name),
            SymbolType::Opaque {
                name,
                namespace: None,
            } => name.clone(),
            SymbolType::Option(inner) => format!("Option<{}>", inner.render()),
            SymbolType::Vec(inner) => format!("Vec<{}>", inner.render()),
            SymbolType::Map { key, value } => format!(
                "std::collections::HashMap<{}, {}>",
                key.render(),
                value.render()
            ),
            SymbolType::Box(inner) => format!("Box<{}>", inner.render()),
            SymbolType::Reference(inner) => format!("&{}", inner.render()),
        }
    }

    /// Apply `f` to the type below any `Option` wrapper.
    fn map_non_optional(self, f: impl FnOnce(SymbolType) -> SymbolType) -> SymbolType {
        match self {
            SymbolType::Option(inner) => SymbolType::Option(Box::new(f(*inner))),
            other => f(other),
        }
    }
}

/// Traits a generated type derives.
///
/// Declaration order is the rendering order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Derive {
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Default,
}

impl Derive {
    pub fn as_str(&self) -> &'static str {
        match self {
            Derive::Debug => "Debug",
            Derive::Clone => "Clone",
            Derive::Copy => "Copy",
            Derive::PartialEq => "PartialEq",
            Derive::Eq => "Eq",
            Derive::Hash => "Hash",
            Derive::PartialOrd => "PartialOrd",
            Derive::Ord => "Ord",
            Derive::Default => "Default",
        }
    }
}

impl fmt::Display for Derive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Annotations attached to a symbol by metadata stages.
///
/// Metadata never changes which type a symbol names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SymbolMetadata {
    pub derives: BTreeSet<Derive>,
    pub visibility: Visibility,
    /// The symbol is wrapped in `Option`.
    pub nullable: bool,
    /// The type was substituted by a runtime wrapper (byte streams, FFI types).
    pub wrapped: bool,
    /// The type is behind a `Box` to break a recursive cycle.
    pub boxed: bool,
}

impl SymbolMetadata {
    pub fn with_derives(derives: impl IntoIterator<Item = Derive>) -> Self {
        Self {
            derives: derives.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn derive_names(&self) -> Vec<&'static str> {
        self.derives.iter().map(Derive::as_str).collect()
    }
}

/// A target-language symbol resolved from a shape.
///
/// Symbols are values: stages build new symbols rather than mutating shared
/// ones.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Symbol {
    pub ty: SymbolType,
    /// Generated module that defines the type (`model`, `input`, ...);
    /// `None` for types that come from std or the runtime crates.
    pub module: Option<String>,
    pub metadata: SymbolMetadata,
}

impl Symbol {
    /// A named type that is not generated.
    pub fn external(name: impl Into<String>, namespace: Option<&str>) -> Self {
        Self {
            ty: SymbolType::opaque(name, namespace),
            module: None,
            metadata: SymbolMetadata::default(),
        }
    }

    /// A type generated into `crate::<module>`.
    pub fn generated(name: impl Into<String>, module: &str) -> Self {
        Self {
            ty: SymbolType::opaque(name, Some(&format!("crate::{}", module))),
            module: Some(module.to_string()),
            metadata: SymbolMetadata::default(),
        }
    }

    pub fn with_type(ty: SymbolType) -> Self {
        Self {
            ty,
            module: None,
            metadata: SymbolMetadata::default(),
        }
    }

    pub fn with_metadata(mut self, metadata: SymbolMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Unqualified name of the innermost named type.
    pub fn name(&self) -> &str {
        self.ty.base().0
    }

    pub fn namespace(&self) -> Option<&str> {
        self.ty.base().1
    }

    pub fn full_name(&self) -> String {
        self.ty.render()
    }

    pub fn is_generated(&self) -> bool {
        self.module.is_some()
    }

    pub fn is_optional(&self) -> bool {
        matches!(self.ty, SymbolType::Option(_))
    }

    /// Wrap in `Option` unless already optional.
    pub fn make_optional(mut self) -> Self {
        if !self.is_optional() {
            self.ty = SymbolType::Option(Box::new(self.ty));
            self.metadata.nullable = true;
        }
        self
    }

    /// Drop an `Option` wrapper if present.
    pub fn make_required(mut self) -> Self {
        if let SymbolType::Option(inner) = self.ty {
            self.ty = *inner;
        }
        self.metadata.nullable = false;
        self
    }

    /// Box the type, keeping any `Option` on the outside.
    pub fn make_boxed(mut self) -> Self {
        if !self.metadata.boxed {
            self.ty = self.ty.map_non_optional(|ty| SymbolType::Box(Box::new(ty)));
            self.metadata.boxed = true;
        }
        self
    }

    /// Rename the innermost named type.
    pub fn renamed(mut self, new_name: impl Into<String>) -> Self {
        rename_base(&mut self.ty, new_name.into());
        self
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name())
    }
}

fn rename_base(ty: &mut SymbolType, new_name: String) {
    match ty {
        SymbolType::Opaque { name, .. } => *name = new_name,
        SymbolType::Option(inner)
        | SymbolType::Vec(inner)
        | SymbolType::Box(inner)
        | SymbolType::Reference(inner) => rename_base(inner, new_name),
        SymbolType::Map { value, .. } => rename_base(value, new_name),
    }
}
