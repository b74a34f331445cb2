use crate::emitter::{Emitter, ImageMode};
use crate::preview::{render_preview, Preview};
use crate::report::{colors_report, ColorEntry, TextStyleEntry};
use figwind_assets::AssetPipeline;
use figwind_common::Settings;
use figwind_normalizer::{normalize, DesignHost, NormalizeError, SceneNode};
use futures::FutureExt;
use serde::Serialize;
use std::any::Any;
use std::collections::HashSet;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, instrument};

/// The one error a conversion can end with
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    #[error("Internal compiler error: {0}")]
    Internal(String),
}

pub type CompileResult<T> = Result<T, CompileError>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompileOptions {
    /// Live conversion: the code inlines bitmaps it would otherwise replace
    /// with placeholders
    pub is_preview: bool,
    /// Echoed back so callers can tell conversions apart
    pub trigger_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversion {
    pub code: String,
    pub preview: Preview,
    pub warnings: Vec<String>,
    pub colors: Vec<ColorEntry>,
    pub text_styles: Vec<TextStyleEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CompileOutcome {
    /// Nothing was selected; not an error
    EmptySelection,
    Converted(Conversion),
}

/// Design-to-code compiler bound to one host and one asset pipeline.
///
/// The pipeline's upload cache lives as long as the compiler, so repeated
/// conversions of the same images upload once.
#[derive(Clone)]
pub struct Compiler {
    host: Arc<dyn DesignHost>,
    assets: Arc<AssetPipeline>,
}

impl Compiler {
    pub fn new(host: Arc<dyn DesignHost>, assets: Arc<AssetPipeline>) -> Self {
        Self { host, assets }
    }

    pub fn assets(&self) -> &AssetPipeline {
        &self.assets
    }

    /// Convert a selection into markup, a preview and reports.
    ///
    /// Either a whole conversion or a single error comes back. A panic
    /// anywhere in the pass is caught and reported as
    /// [`CompileError::Internal`].
    #[instrument(skip_all, fields(roots = roots.len(), mode = ?settings.generation_mode))]
    pub async fn compile(
        &self,
        roots: &[SceneNode],
        settings: &Settings,
        options: &CompileOptions,
    ) -> CompileResult<CompileOutcome> {
        if roots.is_empty() {
            debug!("Empty selection");
            return Ok(CompileOutcome::EmptySelection);
        }

        let conversion = AssertUnwindSafe(self.run(roots, settings, options))
            .catch_unwind()
            .await
            .map_err(|payload| {
                let message = panic_message(payload.as_ref());
                error!(message = %message, "Conversion panicked");
                CompileError::Internal(message)
            })??;

        info!(
            code_len = conversion.code.len(),
            warnings = conversion.warnings.len(),
            "Conversion complete"
        );
        Ok(CompileOutcome::Converted(conversion))
    }

    async fn run(
        &self,
        roots: &[SceneNode],
        settings: &Settings,
        options: &CompileOptions,
    ) -> CompileResult<Conversion> {
        let host = self.host.as_ref();
        let assets = self.assets.as_ref();
        let normalized = normalize(roots, settings, host, assets).await?;

        let images = if options.is_preview {
            ImageMode::Inline
        } else {
            ImageMode::Code
        };
        let emitter = Emitter::new(settings, host, assets, images);
        let (code, preview) = futures::join!(
            emitter.emit(&normalized.nodes),
            render_preview(&normalized.nodes, settings, host, assets)
        );

        let warnings = dedup(normalized.warnings.into_iter().chain(code.warnings));
        Ok(Conversion {
            code: code.markup.trim_start_matches('\n').to_string(),
            preview,
            warnings,
            colors: colors_report(&normalized.nodes, settings),
            text_styles: code.text_styles,
            trigger_type: options.trigger_type.clone(),
        })
    }
}

/// Keep the first occurrence of each message
fn dedup(messages: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    messages
        .into_iter()
        .filter(|message| seen.insert(message.clone()))
        .collect()
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
