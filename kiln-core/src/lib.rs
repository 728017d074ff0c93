//! Core utilities and types for the kiln SDK generator.
//!
//! This crate provides fundamental types and utilities used across
//! the kiln workspace: identifier case conversion, generated file
//! writing rules and semantic versions for generated manifests.

mod file;
mod utils;
mod version;

// File operations
pub use file::{FileRules, GENERATED_HEADER, GeneratedFile, Overwrite, WriteResult, write_file};
// String utilities
pub use utils::{to_pascal_case, to_snake_case};
pub use version::Version;
