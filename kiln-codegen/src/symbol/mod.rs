//! Symbol resolution: mapping shapes to target-language symbols.
//!
//! - [`Symbol`] - a resolved type plus the metadata stages attach to it
//! - [`SymbolProvider`] - one stage of resolution
//! - [`SymbolProviderChain`] - explicit, ordered composition of stages
//! - [`SymbolTable`] - all symbols of a service, checked for collisions

mod provider;
mod table;
mod types;

pub use provider::{MemoizingSymbolProvider, SymbolProvider, SymbolProviderChain};
pub use table::SymbolTable;
pub use types::{Derive, Symbol, SymbolMetadata, SymbolType};
