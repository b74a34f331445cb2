use anyhow::{anyhow, Context};
use figwind_common::{GenerationMode, Settings};
use std::path::{Path, PathBuf};

pub const DEFAULT_SETTINGS_NAME: &str = "figwind.settings.json";

/// Settings from `explicit`, else `figwind.settings.json` in `cwd`, else
/// defaults.
pub fn load_settings(cwd: &Path, explicit: Option<&Path>) -> anyhow::Result<Settings> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let path = cwd.join(DEFAULT_SETTINGS_NAME);
            if !path.exists() {
                tracing::debug!("No settings file, using defaults");
                return Ok(Settings::default());
            }
            path
        }
    };

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Cannot read settings file {}", path.display()))?;
    Settings::from_json_str(&content)
        .with_context(|| format!("Invalid settings file {}", path.display()))
}

pub fn settings_path(cwd: &Path) -> PathBuf {
    cwd.join(DEFAULT_SETTINGS_NAME)
}

pub fn parse_mode(mode: &str) -> anyhow::Result<GenerationMode> {
    match mode.to_ascii_lowercase().as_str() {
        "html" => Ok(GenerationMode::Html),
        "jsx" => Ok(GenerationMode::Jsx),
        other => Err(anyhow!("Unknown mode: {}. Use: html or jsx", other)),
    }
}
