mod commands;
mod config;
mod input;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    colors, compile, init, text_styles, ColorsArgs, CompileArgs, InitArgs, TextStylesArgs,
};
use tracing_subscriber::EnvFilter;

/// Figwind CLI - design selections to Tailwind markup
#[derive(Parser, Debug)]
#[command(name = "figwind")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log pipeline details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write default settings and an example document
    Init(InitArgs),

    /// Compile documents to HTML or JSX
    Compile(CompileArgs),

    /// List the solid colors of a selection
    Colors(ColorsArgs),

    /// List the text styles of a selection
    TextStyles(TextStylesArgs),
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match std::env::current_dir() {
        Ok(cwd) => match cli.command {
            Command::Init(args) => init(args, &cwd),
            Command::Compile(args) => compile(args, &cwd).await,
            Command::Colors(args) => colors(args, &cwd).await,
            Command::TextStyles(args) => text_styles(args, &cwd).await,
        },
        Err(e) => Err(anyhow::anyhow!("Cannot get current directory: {}", e)),
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
