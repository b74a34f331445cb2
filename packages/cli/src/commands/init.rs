use crate::config::{settings_path, DEFAULT_SETTINGS_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use figwind_common::Settings;
use std::fs;
use std::path::Path;

const EXAMPLE_DOCUMENT_NAME: &str = "selection.json";

const EXAMPLE_DOCUMENT: &str = r##"{
  "selection": [
    {
      "id": "1:1",
      "name": "Card",
      "type": "FRAME",
      "width": 320,
      "height": 120,
      "layoutMode": "VERTICAL",
      "itemSpacing": 8,
      "paddingTop": 16,
      "paddingRight": 16,
      "paddingBottom": 16,
      "paddingLeft": 16,
      "cornerRadius": 8,
      "fills": [{ "type": "SOLID", "color": { "r": 1, "g": 1, "b": 1 } }],
      "children": [
        {
          "id": "1:2",
          "name": "Title",
          "type": "TEXT",
          "characters": "Hello from Figwind",
          "textAutoResize": "WIDTH_AND_HEIGHT",
          "textSegments": [
            { "characters": "Hello from Figwind", "fontSize": 20, "fontWeight": 600 }
          ]
        },
        {
          "id": "1:3",
          "name": "#prompt: make the card clickable",
          "type": "RECTANGLE"
        }
      ]
    }
  ],
  "variables": {}
}
"##;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Output flavor written to the settings file (html, jsx)
    #[arg(short, long)]
    pub mode: Option<String>,

    /// Force overwrite existing settings
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &Path) -> Result<()> {
    let path = settings_path(cwd);

    if path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_SETTINGS_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Initializing Figwind settings...".bright_blue().bold());

    let mut settings = Settings::default();
    if let Some(mode) = &args.mode {
        settings.generation_mode = crate::config::parse_mode(mode)?;
    }
    fs::write(&path, serde_json::to_string_pretty(&settings)?)?;
    println!("  {} Created {}", "✓".green(), DEFAULT_SETTINGS_NAME);

    let example = cwd.join(EXAMPLE_DOCUMENT_NAME);
    if !example.exists() {
        fs::write(&example, EXAMPLE_DOCUMENT)?;
        println!("  {} Created {}", "✓".green(), EXAMPLE_DOCUMENT_NAME);
    }

    println!();
    println!("{}", "✅ Ready!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Export a selection to {}", EXAMPLE_DOCUMENT_NAME);
    println!("  2. Run: figwind compile {}", EXAMPLE_DOCUMENT_NAME);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_settings;
    use crate::input::InputDocument;
    use figwind_common::GenerationMode;

    #[test]
    fn test_init_writes_loadable_files() {
        let dir = tempfile::tempdir().unwrap();
        init(
            InitArgs {
                mode: Some("html".to_string()),
                force: false,
            },
            dir.path(),
        )
        .unwrap();

        let settings = load_settings(dir.path(), None).unwrap();
        assert_eq!(settings.generation_mode, GenerationMode::Html);

        let document = InputDocument::load(&dir.path().join(EXAMPLE_DOCUMENT_NAME)).unwrap();
        assert_eq!(document.selection.len(), 1);
        assert_eq!(document.selection[0].children.len(), 2);
    }

    #[test]
    fn test_init_keeps_existing_settings() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(settings_path(dir.path()), "{\"customClassPrefix\": \"x-\"}").unwrap();

        init(InitArgs { mode: None, force: false }, dir.path()).unwrap();

        let settings = load_settings(dir.path(), None).unwrap();
        assert_eq!(settings.custom_class_prefix, "x-");
    }
}
