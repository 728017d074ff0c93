//! File generators for the Rust target.
//!
//! Each generator renders one file of the generated crate from the
//! resolved [`SymbolTable`] and the run's [`SectionRegistry`]:
//!
//! - [`StructureGenerator`] - `model.rs`, `input.rs`, `output.rs`, `error.rs`, `operation.rs`
//! - [`ServiceGenerator`] - `service.rs` (server builder and router, or client handle)
//! - [`ConfigGenerator`] - `config.rs` (client mode)
//! - [`ErrorParserGenerator`] - `protocol_serde.rs` (client mode)
//! - [`LibRsGenerator`] - `lib.rs`
//! - [`CargoToml`] - `Cargo.toml`

mod cargo_toml;
mod config;
mod error_parser;
mod lib_rs;
mod service;
mod structures;

use std::sync::Arc;

use kiln_codegen::{
    CodegenContext, customize::SectionRegistry, protocol::Protocol, symbol::SymbolTable,
};

pub use cargo_toml::CargoToml;
pub use config::ConfigGenerator;
pub use error_parser::ErrorParserGenerator;
pub use lib_rs::LibRsGenerator;
pub use service::ServiceGenerator;
pub use structures::{MODULES, StructureGenerator};

/// Everything a file generator reads.
pub struct GeneratorContext<'a> {
    pub codegen: &'a CodegenContext,
    pub symbols: &'a SymbolTable,
    pub sections: &'a SectionRegistry<'a>,
    pub protocol: Arc<dyn Protocol>,
}

impl<'a> GeneratorContext<'a> {
    /// Rust path of the server runtime crate.
    pub fn server_crate(&self) -> String {
        self.codegen.runtime_crate("server")
    }

    /// Rust path of the types runtime crate.
    pub fn types_crate(&self) -> String {
        self.codegen.runtime_crate("types")
    }
}
