//! kiln.toml parsing and validation.
//!
//! Errors carry the manifest source and spans so the CLI can render them
//! with miette.

// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

mod error;
mod manifest;
mod validate;

pub use error::{Error, Result, SourceContext};
pub use manifest::{
    CodegenSettings, DecoratorSettings, KilnToml, Manifest, Mode, RuntimeConfig, parse_manifest,
};
pub use validate::ParseContext;
