//! Section registry: ordered contributions per extension point.

use indexmap::IndexMap;

use super::{Section, SectionName};
use crate::{CodegenError, builder::CodeFragment};

/// Renders one contribution for a section; `Ok(None)` contributes nothing.
pub type RenderFn<'a> = Box<dyn Fn(&Section<'_>) -> eyre::Result<Option<CodeFragment>> + 'a>;

/// A registered section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionDef {
    pub name: SectionName,
    pub description: &'static str,
}

impl SectionDef {
    pub fn builtin(name: SectionName) -> Self {
        Self {
            name,
            description: name.description(),
        }
    }

    /// Every built-in section.
    pub fn catalog() -> impl Iterator<Item = SectionDef> {
        SectionName::ALL.into_iter().map(SectionDef::builtin)
    }
}

struct Contribution<'a> {
    decorator: String,
    order: i8,
    render: RenderFn<'a>,
}

struct Slot<'a> {
    def: SectionDef,
    /// Kept sorted by `order`, ties in registration order.
    contributions: Vec<Contribution<'a>>,
}

/// Contributions for every section of one run.
///
/// Each contribution must render a self-contained fragment: rendered
/// fragments are appended one after the other with nothing in between.
#[derive(Default)]
pub struct SectionRegistry<'a> {
    slots: IndexMap<SectionName, Slot<'a>>,
}

impl<'a> SectionRegistry<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the built-in catalog registered.
    pub fn with_catalog() -> Self {
        let mut registry = Self::new();
        for def in SectionDef::catalog() {
            registry.slots.insert(
                def.name,
                Slot {
                    def,
                    contributions: Vec::new(),
                },
            );
        }
        registry
    }

    pub fn register(&mut self, def: SectionDef) -> Result<(), CodegenError> {
        if self.slots.contains_key(&def.name) {
            return Err(CodegenError::DuplicateSection { section: def.name });
        }
        self.slots.insert(
            def.name,
            Slot {
                def,
                contributions: Vec::new(),
            },
        );
        Ok(())
    }

    /// Add a contribution to a registered section.
    ///
    /// Contributions render in ascending `order`; equal orders keep the
    /// order they were contributed in.
    pub fn contribute<F>(
        &mut self,
        name: SectionName,
        decorator: impl Into<String>,
        order: i8,
        render: F,
    ) -> Result<(), CodegenError>
    where
        F: Fn(&Section<'_>) -> eyre::Result<Option<CodeFragment>> + 'a,
    {
        let slot = self
            .slots
            .get_mut(&name)
            .ok_or(CodegenError::UnknownSection { section: name })?;
        let at = slot
            .contributions
            .iter()
            .position(|c| c.order > order)
            .unwrap_or(slot.contributions.len());
        slot.contributions.insert(
            at,
            Contribution {
                decorator: decorator.into(),
                order,
                render: Box::new(render),
            },
        );
        Ok(())
    }

    /// Render every contribution to `section`, in order.
    ///
    /// The first failing contribution aborts rendering and is reported with
    /// the decorator and section it came from.
    pub fn render(&self, section: &Section<'_>) -> Result<Vec<CodeFragment>, CodegenError> {
        let name = section.name();
        let slot = self
            .slots
            .get(&name)
            .ok_or(CodegenError::UnknownSection { section: name })?;

        let mut fragments = Vec::new();
        for contribution in &slot.contributions {
            match (contribution.render)(section) {
                Ok(Some(fragment)) => {
                    tracing::debug!(section = %name, decorator = %contribution.decorator, "contributed");
                    fragments.push(fragment);
                }
                Ok(None) => {}
                Err(source) => {
                    return Err(CodegenError::Composition {
                        decorator: contribution.decorator.clone(),
                        section: name,
                        source: source.into(),
                    });
                }
            }
        }
        Ok(fragments)
    }

    /// Render a section into one fragment.
    pub fn render_sequence(&self, section: &Section<'_>) -> Result<CodeFragment, CodegenError> {
        Ok(CodeFragment::sequence(self.render(section)?))
    }

    pub fn sections(&self) -> impl Iterator<Item = &SectionDef> {
        self.slots.values().map(|slot| &slot.def)
    }

    /// Decorators contributing to `name`, in render order.
    pub fn contributors(&self, name: SectionName) -> Vec<&str> {
        self.slots
            .get(&name)
            .map(|slot| {
                slot.contributions
                    .iter()
                    .map(|c| c.decorator.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }
}
