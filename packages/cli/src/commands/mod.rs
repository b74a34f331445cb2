pub mod colors;
pub mod compile;
pub mod init;
pub mod text_styles;

pub use colors::{colors, ColorsArgs};
pub use compile::{compile, CompileArgs};
pub use init::{init, InitArgs};
pub use text_styles::{text_styles, TextStylesArgs};

use crate::config::{load_settings, parse_mode};
use crate::input::InputDocument;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use figwind_assets::AssetPipeline;
use figwind_common::Settings;
use figwind_compiler_tailwind::{CompileOptions, CompileOutcome, Compiler, Conversion};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Where a selection and its settings come from
#[derive(Debug, Args)]
pub struct SourceArgs {
    /// Input document, or a directory of documents
    pub input: PathBuf,

    /// Settings file (defaults to ./figwind.settings.json)
    #[arg(short, long)]
    pub settings: Option<PathBuf>,

    /// Output flavor, overriding the settings file (html, jsx)
    #[arg(short, long)]
    pub mode: Option<String>,

    /// Directory holding exported `<id>.png` / `<id>.svg` files
    #[arg(long)]
    pub assets_dir: Option<PathBuf>,
}

impl SourceArgs {
    pub fn settings(&self, cwd: &Path) -> Result<Settings> {
        let mut settings = load_settings(cwd, self.settings.as_deref())?;
        if let Some(mode) = &self.mode {
            settings.generation_mode = parse_mode(mode)?;
        }
        Ok(settings)
    }
}

/// Convert one document. An empty selection is reported as an error here
/// since there is nothing to print.
pub async fn convert_document(
    path: &Path,
    source: &SourceArgs,
    settings: &Settings,
    assets: Arc<AssetPipeline>,
    options: &CompileOptions,
) -> Result<Conversion> {
    let document = InputDocument::load(path)?;
    let host = document.host(source.assets_dir.as_deref())?;
    let compiler = Compiler::new(Arc::new(host), assets);

    match compiler.compile(&document.selection, settings, options).await? {
        CompileOutcome::Converted(conversion) => Ok(conversion),
        CompileOutcome::EmptySelection => Err(anyhow!("Selection is empty")),
    }
}

pub fn print_warnings(warnings: &[String]) {
    for warning in warnings {
        eprintln!("  {} {}", "⚠".yellow(), warning.yellow());
    }
}
