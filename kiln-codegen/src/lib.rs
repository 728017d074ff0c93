//! Language-agnostic engine of the kiln SDK generator.
//!
//! This crate turns a [`Model`](kiln_model::Model) into target-language
//! symbols and composes customizations into the generated code. Target
//! crates (e.g., `kiln-codegen-rust`) plug in the concrete symbol stages,
//! protocols, decorators and file generators.
//!
//! # Module Organization
//!
//! - [`builder`] - Code generation building blocks (CodeBuilder, CodeFragment, StructSpec)
//! - [`symbol`] - Symbols, the symbol provider chain and the symbol table
//! - [`customize`] - Sections, decorators and the section registry
//! - [`protocol`] - Protocol generators and request specs
//! - [`pipeline`] - Phases, lints and diagnostics
//! - [`generation`] - Output management (FileRegistry)
//! - [`language`] - Target-language abstractions (LanguageCodegen, NamingConvention)
//! - [`testing`] - Test fixtures (feature-gated)

pub mod builder;
mod context;
pub mod customize;
mod error;
pub mod generation;
pub mod language;
pub mod pipeline;
pub mod protocol;
pub mod symbol;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use context::CodegenContext;
pub use error::CodegenError;
