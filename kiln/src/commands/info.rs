use std::path::PathBuf;

use clap::Args;
use eyre::Result;
use kiln_manifest::KilnToml;

use super::UnwrapOrExit;
use crate::{
    ops,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct InfoCommand {
    /// Path to kiln.toml (defaults to ./kiln.toml)
    #[arg(short, long, default_value = "kiln.toml")]
    pub config: PathBuf,
}

impl InfoCommand {
    pub fn run(&self) -> Result<()> {
        let kiln_toml = KilnToml::open(&self.config).unwrap_or_exit();
        let source = kiln_toml.read_model().unwrap_or_exit();
        let model = ops::load_model(&kiln_toml, &source)?;

        let report = ops::info(&kiln_toml, model, &self.config)?;
        report.render(&mut TerminalOutput::new());

        Ok(())
    }
}
