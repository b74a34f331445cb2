use super::{convert_document, print_warnings, SourceArgs};
use crate::input::find_documents;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use figwind_assets::AssetPipeline;
use figwind_compiler_tailwind::{CompileOptions, Conversion};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Args)]
pub struct CompileArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Print the HTML preview instead of the code; images are inlined
    #[arg(long)]
    pub preview: bool,

    /// Print the whole conversion as JSON
    #[arg(long)]
    pub json: bool,

    /// Write one file per document instead of printing
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,
}

pub async fn compile(args: CompileArgs, cwd: &Path) -> Result<()> {
    let settings = args.source.settings(cwd)?;
    let documents = find_documents(&args.source.input)?;

    if documents.is_empty() {
        println!("{}", "⚠️  No input documents found".yellow());
        return Ok(());
    }

    // One pipeline for the whole run so identical assets upload once
    let assets = Arc::new(AssetPipeline::http());
    let options = CompileOptions {
        is_preview: args.preview,
        trigger_type: Some("cli".to_string()),
    };

    let mut success_count = 0;
    let mut error_count = 0;

    for document in &documents {
        let jsx = settings.generation_mode.is_jsx();
        let result = convert_document(document, &args.source, &settings, assets.clone(), &options)
            .await
            .and_then(|conversion| write_output(document, &conversion, &args, jsx));

        match result {
            Ok(destination) => {
                success_count += 1;
                if let Some(destination) = destination {
                    println!("  {} {} → {}", "✓".green(), document.display(), destination);
                }
            }
            Err(e) => {
                error_count += 1;
                eprintln!(
                    "  {} {} - {}",
                    "✗".red(),
                    document.display(),
                    e.to_string().red()
                );
            }
        }
    }

    if args.out_dir.is_some() || documents.len() > 1 {
        println!();
        if error_count == 0 {
            println!("{} Compiled {} documents", "✅".green(), success_count);
        } else {
            println!(
                "{} Compiled {} documents, {} errors",
                "⚠️".yellow(),
                success_count,
                error_count
            );
        }
    }

    if error_count > 0 && success_count == 0 {
        anyhow::bail!("No document compiled");
    }
    Ok(())
}

/// Print or write one conversion. Returns the written path, if any.
fn write_output(
    document: &Path,
    conversion: &Conversion,
    args: &CompileArgs,
    jsx: bool,
) -> Result<Option<String>> {
    print_warnings(&conversion.warnings);

    let (output, extension) = if args.json {
        (serde_json::to_string_pretty(conversion)?, "json")
    } else if args.preview {
        (conversion.preview.content.clone(), "html")
    } else if jsx {
        (conversion.code.clone(), "jsx")
    } else {
        (conversion.code.clone(), "html")
    };

    let Some(out_dir) = &args.out_dir else {
        println!("{}", output);
        return Ok(None);
    };

    let stem = document.file_stem().unwrap_or(document.as_os_str());
    let output_file = out_dir.join(stem).with_extension(extension);
    fs::create_dir_all(out_dir)?;
    fs::write(&output_file, output)?;
    Ok(Some(output_file.display().to_string()))
}
