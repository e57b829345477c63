//! Editor configuration and host-embedded page data, both parsed from JSON.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::consts::{
    BOX_COLOR, HANDLE_RADIUS_PX, LABEL_FONT, LINE_WIDTH, MIN_BOX_SIZE_PX, NEW_BOX_SIZE_PX, PENDING_FILL,
    PENDING_LINE_WIDTH, RECENT_NAMES_STORAGE_KEY, SELECTED_LINE_WIDTH,
};
use crate::doc::TagRecord;
use crate::hit::HitPolicy;
use crate::input::Keymap;

/// Errors produced while reading configuration or page data.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The JSON could not be parsed.
    #[error("config parse failed: {0}")]
    Parse(String),

    /// A value parsed but is out of range or inconsistent.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Tunables for the tag editor. Every field falls back to its default when
/// absent from the JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub handle_radius: f64,
    pub min_box_size: f64,
    pub new_box_size: f64,
    pub box_color: String,
    pub pending_fill: String,
    pub label_font: String,
    pub line_width: f64,
    pub selected_line_width: f64,
    pub pending_line_width: f64,
    pub hit_policy: HitPolicy,
    /// Pointer-down on empty canvas starts drawing a new box.
    pub drag_to_create: bool,
    pub keymap: Keymap,
    /// Prefix for endpoint paths. Empty means "same origin as the page".
    pub api_base: String,
    pub storage_key: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            handle_radius: HANDLE_RADIUS_PX,
            min_box_size: MIN_BOX_SIZE_PX,
            new_box_size: NEW_BOX_SIZE_PX,
            box_color: BOX_COLOR.into(),
            pending_fill: PENDING_FILL.into(),
            label_font: LABEL_FONT.into(),
            line_width: LINE_WIDTH,
            selected_line_width: SELECTED_LINE_WIDTH,
            pending_line_width: PENDING_LINE_WIDTH,
            hit_policy: HitPolicy::default(),
            drag_to_create: false,
            keymap: Keymap::default(),
            api_base: String::new(),
            storage_key: RECENT_NAMES_STORAGE_KEY.into(),
        }
    }
}

impl EditorConfig {
    /// Parse and validate a JSON config.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::Invalid`] when validation fails.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check sizes are positive and no key is bound twice.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sizes = [
            ("handle_radius", self.handle_radius),
            ("min_box_size", self.min_box_size),
            ("new_box_size", self.new_box_size),
            ("line_width", self.line_width),
            ("selected_line_width", self.selected_line_width),
            ("pending_line_width", self.pending_line_width),
        ];
        for (field, value) in sizes {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Invalid(format!("{field} must be a positive number, got {value}")));
            }
        }
        if self.storage_key.is_empty() {
            return Err(ConfigError::Invalid("storage_key must not be empty".into()));
        }

        let bindings = self.keymap.bindings();
        for (i, (key, _)) in bindings.iter().enumerate() {
            if key.is_empty() {
                return Err(ConfigError::Invalid("keymap entries must not be empty".into()));
            }
            if key.len() == 1 && key.chars().all(|c| c.is_ascii_digit()) {
                return Err(ConfigError::Invalid(format!("key '{key}' is reserved for recent names")));
            }
            if bindings[..i].iter().any(|(other, _)| other == key) {
                return Err(ConfigError::Invalid(format!("key '{key}' is bound more than once")));
            }
        }
        Ok(())
    }
}

/// Photo and tags embedded in the host page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageData {
    /// Backend identifier of the photo being tagged.
    pub src_filename: String,
    /// Displayed photo width; the overlay canvas matches it.
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub tags: Vec<TagRecord>,
    /// Every person name known to the backend, for prompt suggestions.
    #[serde(default)]
    pub names: Vec<String>,
}

impl PageData {
    /// Parse page data JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::Invalid`] for an empty filename or non-positive size.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let page: Self = serde_json::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))?;
        if page.src_filename.is_empty() {
            return Err(ConfigError::Invalid("src_filename must not be empty".into()));
        }
        if !(page.width > 0.0 && page.height > 0.0) {
            return Err(ConfigError::Invalid(format!("photo size {}x{} is not positive", page.width, page.height)));
        }
        Ok(page)
    }
}
