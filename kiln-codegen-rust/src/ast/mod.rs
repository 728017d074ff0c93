//! Rust item builders for the generated files.
//!
//! Items render to [`CodeFragment`](kiln_codegen::builder::CodeFragment)s,
//! so section contributions can be spliced into function bodies and impl
//! blocks directly.

mod fns;
mod impls;

pub use fns::{Fn, Param};
pub use impls::Impl;
