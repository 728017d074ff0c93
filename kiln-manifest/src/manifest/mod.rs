//! Manifest types and parsing for kiln.toml files.

mod file;
mod parse;

use std::{fmt, path::PathBuf};

pub use file::KilnToml;
use kiln_core::Version;
use kiln_model::ShapeId;
pub use parse::parse_manifest;
use serde::Deserialize;

/// Root manifest for kiln.toml
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// What to generate
    pub codegen: CodegenSettings,

    /// Runtime crates the generated code links against
    #[serde(default)]
    pub runtime: RuntimeConfig,

    /// Which built-in decorators take part in the run
    #[serde(default)]
    pub decorators: DecoratorSettings,
}

/// `[codegen]` table.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct CodegenSettings {
    /// Absolute id of the service to generate (`example.weather#Weather`)
    pub service: ShapeId,

    /// Path of the JSON model, relative to kiln.toml
    pub model: PathBuf,

    /// Name of the generated crate
    pub module_name: String,

    #[serde(default = "default_version")]
    pub module_version: Version,

    /// Description for the generated Cargo.toml
    pub module_description: Option<String>,

    #[serde(default)]
    pub mode: Mode,

    /// Substitute runtime wrapper types for blobs, timestamps and byte
    /// streams (used by FFI bindings that cannot share the native types)
    #[serde(default)]
    pub wrapper_types: bool,
}

impl CodegenSettings {
    /// The crate name as it appears in Rust paths (`weather-sdk` -> `weather_sdk`).
    pub fn module_use_name(&self) -> String {
        self.module_name.replace('-', "_")
    }
}

/// Which side of the service is generated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Server,
    Client,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Server => "server",
            Mode::Client => "client",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `[runtime]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RuntimeConfig {
    /// Runtime crates are named `<prefix>-server`, `<prefix>-types`, ...
    #[serde(default = "default_crate_prefix")]
    pub crate_prefix: String,

    #[serde(default = "default_version")]
    pub version: Version,

    /// Local checkout of the runtime crates; path dependencies are emitted
    /// instead of registry versions when set
    pub path: Option<PathBuf>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            crate_prefix: default_crate_prefix(),
            version: default_version(),
            path: None,
        }
    }
}

impl RuntimeConfig {
    /// Cargo package name of a runtime crate (`kiln-server`).
    pub fn crate_name(&self, suffix: &str) -> String {
        format!("{}-{}", self.crate_prefix, suffix)
    }

    /// Rust path root of a runtime crate (`kiln_server`).
    pub fn crate_ident(&self, suffix: &str) -> String {
        self.crate_name(suffix).replace('-', "_")
    }
}

/// `[decorators]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DecoratorSettings {
    /// Registry names of the decorators to run; every built-in when absent
    pub enabled: Option<Vec<String>>,
}

fn default_version() -> Version {
    Version::new(0, 1, 0)
}

fn default_crate_prefix() -> String {
    "kiln".to_string()
}
