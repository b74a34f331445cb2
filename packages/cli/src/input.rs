//! Input documents: an exported selection plus what the host would answer.

use anyhow::Context;
use figwind_normalizer::{MemoryHost, SceneNode};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::DEFAULT_SETTINGS_NAME;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDocument {
    pub selection: Vec<SceneNode>,
    /// Variable id -> variable name
    #[serde(default)]
    pub variables: BTreeMap<String, String>,
}

impl InputDocument {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read {}", path.display()))?;
        serde_json::from_str(&content).with_context(|| format!("Invalid document {}", path.display()))
    }

    /// Host answering variable lookups from the document and exports from
    /// `assets_dir`
    pub fn host(&self, assets_dir: Option<&Path>) -> anyhow::Result<MemoryHost> {
        let mut host = MemoryHost::new();
        for (id, name) in &self.variables {
            host = host.with_variable(id.as_str(), name.as_str());
        }

        let Some(dir) = assets_dir else {
            return Ok(host);
        };
        let mut ids = Vec::new();
        for root in &self.selection {
            collect_ids(root, &mut ids);
        }
        for id in ids {
            let stem = asset_file_stem(id);
            let png = dir.join(format!("{}.png", stem));
            if png.is_file() {
                host = host.with_png(id, std::fs::read(&png)?);
            }
            let svg = dir.join(format!("{}.svg", stem));
            if svg.is_file() {
                host = host.with_svg(id, std::fs::read_to_string(&svg)?);
            }
        }
        Ok(host)
    }
}

fn collect_ids<'a>(node: &'a SceneNode, ids: &mut Vec<&'a str>) {
    ids.push(&node.id);
    for child in &node.children {
        collect_ids(child, ids);
    }
}

/// File name stem for a node id: `12:34` -> `12_34`
pub fn asset_file_stem(id: &str) -> String {
    id.replace([':', ';'], "_")
}

/// `path` itself, or every `.json` document below it
pub fn find_documents(path: &Path) -> anyhow::Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if !path.is_dir() {
        anyhow::bail!("Input path does not exist: {}", path.display());
    }

    let mut files: Vec<PathBuf> = WalkDir::new(path)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.extension().and_then(|s| s.to_str()) == Some("json")
                && path.file_name().and_then(|s| s.to_str()) != Some(DEFAULT_SETTINGS_NAME)
        })
        .collect();
    files.sort();
    Ok(files)
}
