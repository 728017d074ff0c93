//! Core operations.
//!
//! This module contains the business logic for kiln commands,
//! separated from CLI argument parsing and output rendering.

pub mod check;
pub mod generate;
pub mod info;

pub use check::check;
pub use generate::{GenerateOptions, generate};
pub use info::info;

use eyre::{Context, Result};
use kiln_codegen::pipeline::Diagnostic;
use kiln_manifest::KilnToml;
use kiln_model::Model;

/// Parse the model text read from the manifest's `model` path.
pub fn load_model(kiln_toml: &KilnToml, source: &str) -> Result<Model> {
    Model::from_json_str(source)
        .wrap_err_with(|| format!("Failed to load model {}", kiln_toml.model_path().display()))
}

/// One-line message plus the shape it points at, if any.
fn describe(diagnostic: &Diagnostic) -> String {
    match &diagnostic.location {
        Some(loc) => format!("{}\n  --> {}", diagnostic.message, loc),
        None => diagnostic.message.clone(),
    }
}
