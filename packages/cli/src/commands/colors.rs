use super::{convert_document, SourceArgs};
use crate::input::find_documents;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use figwind_assets::AssetPipeline;
use figwind_common::parse_hex;
use figwind_compiler_tailwind::{ColorEntry, CompileOptions};
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Args)]
pub struct ColorsArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn colors(args: ColorsArgs, cwd: &Path) -> Result<()> {
    let settings = args.source.settings(cwd)?;
    let assets = Arc::new(AssetPipeline::http());
    let options = CompileOptions::default();

    for document in find_documents(&args.source.input)? {
        let conversion =
            convert_document(&document, &args.source, &settings, assets.clone(), &options).await?;

        if args.json {
            println!("{}", serde_json::to_string_pretty(&conversion.colors)?);
            continue;
        }

        println!("{}", document.display().to_string().bright_blue().bold());
        if conversion.colors.is_empty() {
            println!("  {}", "No solid colors".dimmed());
        }
        for entry in &conversion.colors {
            println!("  {}", format_entry(entry));
        }
    }
    Ok(())
}

fn format_entry(entry: &ColorEntry) -> String {
    let swatch = match parse_hex(&entry.hex) {
        Some(color) => {
            let [r, g, b] = color.to_bytes();
            "  ".on_truecolor(r, g, b).to_string()
        }
        None => "  ".to_string(),
    };
    format!(
        "{} {} {:<24} {:<16} {:>5.2} on white  {:>5.2} on black",
        swatch,
        entry.hex,
        entry.token,
        entry.name.dimmed(),
        entry.contrast_white,
        entry.contrast_black
    )
}
