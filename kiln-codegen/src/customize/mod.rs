//! Decorators and the sections they contribute to.
//!
//! - [`Section`] / [`SectionName`] - typed extension points and their keys
//! - [`SectionRegistry`] - ordered contributions per section for one run
//! - [`Decorator`] - a unit of customization
//! - [`CombinedDecorator`] - the decorators of a run in effective order

mod decorator;
mod registry;
mod section;

pub use decorator::{CombinedDecorator, Decorator, ExtraSection};
pub use registry::{RenderFn, SectionDef, SectionRegistry};
pub use section::{
    ConfigSection, LibRsSection, OperationSection, SdkConfigSection, Section, SectionName,
    ServiceSection,
};
