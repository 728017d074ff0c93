//! Built-in pipeline phases.
//!
//! - [`TransformPhase`] - decorator model transforms, then operation normalization
//! - [`ValidatePhase`] - runs lints and collects diagnostics

mod transform;
mod validate;

pub use transform::TransformPhase;
pub use validate::{
    EmptyServiceLint, Lint, LintInfo, OperationNamingLint, ProtocolLint, StreamingTargetLint,
    ValidatePhase,
};
