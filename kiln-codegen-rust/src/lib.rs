//! Rust target of the kiln SDK generator.
//!
//! Turns a compiled service model into a Rust crate: a server with a
//! typed builder and router, or a client with its configuration and
//! error parsers.

mod generator;
mod naming;
mod resolve;
mod rust_file;
mod structure_renderer;

pub mod ast;
pub mod decorators;
pub mod generators;
pub mod protocols;
pub mod symbol;

pub use generator::Generator;
pub use kiln_codegen::language::{GenerateResult, LanguageCodegen, PreviewFile};
pub use naming::RUST_NAMING;
pub use resolve::ResolvePhase;
pub use rust_file::RustFile;
pub use structure_renderer::RustStructureRenderer;
