//! Code generation building blocks.
//!
//! - [`CodeBuilder`] - fluent API for building indented code
//! - [`CodeFragment`] - composable pieces of code, the currency of sections
//! - [`Renderable`] - types that can be converted to code fragments
//! - [`StructSpec`], [`EnumSpec`] - declarative type definitions
//! - [`Indent`] - indentation configuration

mod code_builder;
mod indent;
mod renderable;
mod structure;

pub use code_builder::CodeBuilder;
pub use indent::Indent;
pub use renderable::{CodeFragment, Renderable};
pub use structure::{
    AttributeArg, AttributeSpec, EnumSpec, FieldSpec, StructSpec, StructureRenderer, VariantKind,
    VariantSpec, Visibility,
};
