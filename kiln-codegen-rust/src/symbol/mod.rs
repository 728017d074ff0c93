//! Rust symbol provider stages.
//!
//! [`rust_symbol_provider`] assembles the default chain, from the base
//! outwards:
//!
//! 1. [`SymbolVisitor`] - structural mapping of shapes to Rust types
//! 2. [`StreamingShapeSymbolProvider`] - byte streams for streaming blobs
//! 3. [`WrapperSymbolProvider`] - runtime wrapper types (opt-in)
//! 4. [`RecursiveShapeBoxer`] - `Box` for recursive members
//! 5. [`StreamingShapeMetadataProvider`] - drops `PartialEq` from streaming structures
//! 6. [`RustReservedWordSymbolProvider`] - renames reserved type names
//!
//! Decorators may append stages; the resolve phase adds memoization last.

mod boxer;
mod metadata;
mod reserved;
mod streaming;
mod visitor;
mod wrapper;

use std::sync::Arc;

use kiln_codegen::{CodegenContext, symbol::SymbolProviderChain};

pub use boxer::RecursiveShapeBoxer;
pub use metadata::StreamingShapeMetadataProvider;
pub use reserved::RustReservedWordSymbolProvider;
pub use streaming::StreamingShapeSymbolProvider;
pub use visitor::{SymbolVisitor, SymbolVisitorConfig};
pub use wrapper::WrapperSymbolProvider;

/// The default Rust chain for a run.
pub fn rust_symbol_provider(ctx: &CodegenContext) -> SymbolProviderChain {
    let model = Arc::clone(ctx.model());
    let server = ctx.runtime_crate("server");
    let config = SymbolVisitorConfig::from_context(ctx);

    let chain = SymbolProviderChain::new(SymbolVisitor::new(Arc::clone(&model), config));
    let chain = {
        let model = Arc::clone(&model);
        let server = server.clone();
        chain.wrap(move |inner| StreamingShapeSymbolProvider::new(inner, model, server))
    };
    let chain = if ctx.settings().wrapper_types {
        let model = Arc::clone(&model);
        chain.wrap(move |inner| WrapperSymbolProvider::new(inner, model, server))
    } else {
        chain
    };
    let chain = {
        let model = Arc::clone(&model);
        chain.wrap(move |inner| RecursiveShapeBoxer::new(inner, model))
    };
    chain
        .wrap(move |inner| StreamingShapeMetadataProvider::new(inner, model))
        .wrap(RustReservedWordSymbolProvider::new)
}
