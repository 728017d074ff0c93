//! Generated output management.
//!
//! - [`FileRegistry`] - Declarative file registration and writing

mod registry;

pub use registry::{FileCategory, FileEntry, FileRegistry, PreviewEntry, WriteStats};
