use crate::error::ConfigError;
use crate::result::ConfigResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Upper bound for `rounding.thresholdPercent`
pub const MAX_THRESHOLD_PERCENT: f64 = 50.0;

/// Markup flavor produced by the emitter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    Html,
    #[default]
    Jsx,
}

impl GenerationMode {
    pub fn is_jsx(self) -> bool {
        matches!(self, GenerationMode::Jsx)
    }
}

/// How one kind of asset is resolved in generated code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetStrategy {
    #[default]
    Upload,
    Placeholder,
}

/// Rounding of sizes, spacing and colors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RoundingSettings {
    /// Snap pixel values onto the spacing scale
    pub values: bool,
    /// Snap colors onto the named palette
    pub colors: bool,
    /// Maximum relative difference (percent) accepted when snapping values
    pub threshold_percent: f64,
}

impl Default for RoundingSettings {
    fn default() -> Self {
        Self {
            values: true,
            colors: true,
            threshold_percent: 15.0,
        }
    }
}

impl RoundingSettings {
    /// Threshold clamped into `0..=50`
    pub fn threshold(&self) -> f64 {
        if self.threshold_percent.is_nan() {
            return 0.0;
        }
        self.threshold_percent.clamp(0.0, MAX_THRESHOLD_PERCENT)
    }
}

/// Network upload of exported images and vectors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssetUploadSettings {
    pub enabled: bool,
    pub endpoint: String,
    /// Shared secret sent as `X-Upload-Secret`
    pub upload_secret: String,
    /// Carried for the persistence layer; not enforced by the in-memory cache.
    #[serde(rename = "cacheTTLHours")]
    pub cache_ttl_hours: f64,
    pub max_concurrent_uploads: usize,
    pub bitmap_strategy: AssetStrategy,
    pub vector_strategy: AssetStrategy,
}

impl Default for AssetUploadSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: String::new(),
            upload_secret: String::new(),
            cache_ttl_hours: 24.0,
            max_concurrent_uploads: 5,
            bitmap_strategy: AssetStrategy::Upload,
            vector_strategy: AssetStrategy::Upload,
        }
    }
}

impl AssetUploadSettings {
    /// Concurrency limit, never below one
    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent_uploads.max(1)
    }

    pub fn uploads_bitmaps(&self) -> bool {
        self.enabled && self.bitmap_strategy == AssetStrategy::Upload
    }

    pub fn uploads_vectors(&self) -> bool {
        self.enabled && self.vector_strategy == AssetStrategy::Upload
    }
}

/// Configuration for one compilation pass.
///
/// Read by the normalizer, resolvers and asset pipeline; never mutated
/// during a pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    #[serde(alias = "tailwindGenerationMode")]
    pub generation_mode: GenerationMode,
    pub rounding: RoundingSettings,
    pub use_color_variables: bool,
    pub embed_images: bool,
    pub embed_vectors: bool,
    #[serde(alias = "customTailwindPrefix")]
    pub custom_class_prefix: String,
    pub base_font_size: f64,
    pub base_font_family: String,
    /// Class key -> font families rendered with `font-<key>`
    pub font_family_custom_config: BTreeMap<String, Vec<String>>,
    pub show_layer_names: bool,
    pub asset_upload: AssetUploadSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            generation_mode: GenerationMode::Jsx,
            rounding: RoundingSettings::default(),
            use_color_variables: true,
            embed_images: false,
            embed_vectors: false,
            custom_class_prefix: String::new(),
            base_font_size: 16.0,
            base_font_family: String::new(),
            font_family_custom_config: BTreeMap::new(),
            show_layer_names: false,
            asset_upload: AssetUploadSettings::default(),
        }
    }
}

impl Settings {
    /// Parse settings from JSON; missing keys take their defaults.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Base font size, falling back to 16 for non-positive values
    pub fn base_font_size(&self) -> f64 {
        if self.base_font_size.is_finite() && self.base_font_size > 0.0 {
            self.base_font_size
        } else {
            16.0
        }
    }

    /// Apply one change coming from a settings surface.
    ///
    /// `key` is a camelCase path such as `embedVectors` or
    /// `rounding.thresholdPercent`. On error the current settings are left
    /// untouched.
    pub fn apply_change(&mut self, key: &str, value: Value) -> ConfigResult<()> {
        let mut document = serde_json::to_value(&*self)?;
        let slot = key
            .split('.')
            .try_fold(&mut document, |node, part| node.get_mut(part))
            .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
        *slot = value;

        let updated: Settings =
            serde_json::from_value(document).map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        updated.validate(key)?;

        tracing::debug!(key, "Applied settings change");
        *self = updated;
        Ok(())
    }

    /// Set the custom font family config from raw JSON text.
    ///
    /// Blank text clears the config. Invalid JSON leaves the previous value.
    pub fn set_font_family_config_json(&mut self, text: &str) -> ConfigResult<()> {
        if text.trim().is_empty() {
            self.font_family_custom_config.clear();
            return Ok(());
        }
        let config: BTreeMap<String, Vec<String>> = serde_json::from_str(text)?;
        self.font_family_custom_config = config;
        Ok(())
    }

    fn validate(&self, key: &str) -> ConfigResult<()> {
        let threshold = self.rounding.threshold_percent;
        if !(0.0..=MAX_THRESHOLD_PERCENT).contains(&threshold) {
            return Err(ConfigError::InvalidValue {
                key: key.to_string(),
                message: format!("thresholdPercent must be within 0..=50, got {}", threshold),
            });
        }
        if !self.base_font_size.is_finite() || self.base_font_size <= 0.0 {
            return Err(ConfigError::InvalidValue {
                key: key.to_string(),
                message: "baseFontSize must be positive".to_string(),
            });
        }
        Ok(())
    }
}
