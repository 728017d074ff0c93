//! The crate root (`lib.rs`).

use eyre::Result;
use kiln_codegen::{
    builder::CodeFragment,
    customize::{LibRsSection, Section},
};
use kiln_manifest::Mode;

use super::{GeneratorContext, MODULES};
use crate::rust_file::RustFile;

pub struct LibRsGenerator<'a> {
    ctx: &'a GeneratorContext<'a>,
}

impl<'a> LibRsGenerator<'a> {
    pub fn new(ctx: &'a GeneratorContext<'a>) -> Self {
        Self { ctx }
    }

    /// Public modules, sorted.
    fn modules(&self) -> Vec<&'static str> {
        let mut modules: Vec<&'static str> = MODULES.iter().map(|(name, _)| *name).collect();
        if self.ctx.codegen.mode() == Mode::Client {
            modules.extend(["config", "protocol_serde"]);
        }
        modules.sort_unstable();
        modules
    }

    pub fn render(&self) -> Result<String> {
        let settings = self.ctx.codegen.settings();
        let name = self.ctx.codegen.service_name();
        let doc = settings
            .module_description
            .clone()
            .unwrap_or_else(|| format!("Generated {} for the `{}` service.", settings.mode, name));

        let mods = self
            .modules()
            .into_iter()
            .map(|module| CodeFragment::line(format!("pub mod {};", module)))
            .chain([CodeFragment::line("mod service;")])
            .collect();
        let exports = match self.ctx.codegen.mode() {
            Mode::Server => vec![CodeFragment::line(format!(
                "pub use service::{{{name}, {name}Builder}};"
            ))],
            Mode::Client => vec![
                CodeFragment::line("pub use config::Config;"),
                CodeFragment::line(format!("pub use service::{};", name)),
            ],
        };

        Ok(RustFile::new()
            .doc(doc)
            .attributes(
                self.ctx
                    .sections
                    .render_sequence(&Section::LibRs(LibRsSection::Attributes))?,
            )
            .add(CodeFragment::sequence(mods))
            .add(CodeFragment::sequence(exports))
            .add(
                self.ctx
                    .sections
                    .render_sequence(&Section::LibRs(LibRsSection::Body))?,
            )
            .render())
    }
}
