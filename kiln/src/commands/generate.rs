use std::path::PathBuf;

use clap::Args;
use eyre::Result;
use kiln_manifest::KilnToml;

use super::UnwrapOrExit;
use crate::{
    ops::{self, GenerateOptions},
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct GenerateCommand {
    /// Path to kiln.toml (defaults to ./kiln.toml)
    #[arg(short, long, default_value = "kiln.toml")]
    pub config: PathBuf,

    /// Output directory (defaults to current directory)
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,

    /// Preview generated code without writing to disk
    #[arg(long)]
    pub dry_run: bool,

    /// Treat validation warnings as errors
    #[arg(long)]
    pub deny_warnings: bool,
}

impl GenerateCommand {
    pub fn run(&self) -> Result<()> {
        let kiln_toml = KilnToml::open(&self.config).unwrap_or_exit();
        let source = kiln_toml.read_model().unwrap_or_exit();
        let model = ops::load_model(&kiln_toml, &source)?;

        let report = ops::generate(
            kiln_toml.manifest(),
            model,
            GenerateOptions {
                output_dir: &self.output,
                dry_run: self.dry_run,
                deny_warnings: self.deny_warnings,
            },
        )?;
        report.render(&mut TerminalOutput::new());

        Ok(())
    }
}
