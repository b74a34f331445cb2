//! Style resolvers: one intermediate node in, utility classes out.
//!
//! Every resolver is pure. Anything that needs I/O (image fills) is left to
//! the emitter.

pub mod color;
pub mod layout;
pub mod scale;
pub mod shape;
pub mod typography;

use figwind_common::Settings;

/// Classes and inline declarations for one element
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleResolution {
    prefix: String,
    classes: Vec<String>,
    styles: Vec<(String, String)>,
}

impl StyleResolution {
    pub fn new(settings: &Settings) -> Self {
        Self {
            prefix: settings.custom_class_prefix.clone(),
            ..Default::default()
        }
    }

    /// Add a class token. The prefix is applied here; duplicates are dropped.
    pub fn add(&mut self, token: impl AsRef<str>) {
        let token = token.as_ref();
        if token.is_empty() {
            return;
        }
        let class = format!("{}{}", self.prefix, token);
        if !self.classes.contains(&class) {
            self.classes.push(class);
        }
    }

    pub fn add_style(&mut self, property: &str, value: impl Into<String>) {
        self.styles.push((property.to_string(), value.into()));
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn styles(&self) -> &[(String, String)] {
        &self.styles
    }

    pub fn class_string(&self) -> String {
        self.classes.join(" ")
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty() && self.styles.is_empty()
    }
}
