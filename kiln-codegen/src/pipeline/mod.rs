//! Compilation pipeline for code generation.
//!
//! A [`Pipeline`] runs explicit phases over a [`CompilationContext`]:
//!
//! - Built-in phases (transform → validate)
//! - Target phases appended with [`Pipeline::phase`] (symbol resolution)
//! - Plugin hooks before and after each phase
//! - Diagnostics collected across phases
//!
//! # Example
//!
//! ```ignore
//! use kiln_codegen::pipeline::Pipeline;
//!
//! let ctx = Pipeline::new(decorators).run(codegen)?;
//!
//! for diag in ctx.warnings() {
//!     eprintln!("{diag}");
//! }
//! ```

mod context;
mod diagnostic;
mod phase;
pub mod phases;
mod plugin;
mod runner;

pub use context::CompilationContext;
pub use diagnostic::{Diagnostic, Severity};
pub use phase::Phase;
pub use plugin::{DenyWarnings, Plugin};
pub use runner::Pipeline;
