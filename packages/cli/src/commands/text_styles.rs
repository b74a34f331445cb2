use super::{convert_document, SourceArgs};
use crate::input::find_documents;
use anyhow::Result;
use clap::Args;
use figwind_assets::AssetPipeline;
use figwind_compiler_tailwind::{render_text_styles, CompileOptions};
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Args)]
pub struct TextStylesArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

pub async fn text_styles(args: TextStylesArgs, cwd: &Path) -> Result<()> {
    let settings = args.source.settings(cwd)?;
    let assets = Arc::new(AssetPipeline::http());
    let options = CompileOptions::default();

    for document in find_documents(&args.source.input)? {
        let conversion =
            convert_document(&document, &args.source, &settings, assets.clone(), &options).await?;
        println!("{}", render_text_styles(&conversion.text_styles));
    }
    Ok(())
}
