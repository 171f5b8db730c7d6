//! Session and widget configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{FlexFilterError, Result};
use crate::matching::MatchMode;

/// Cosmetic settings passed through to the rendering surface.
///
/// None of these affect the session's behavior.
///
/// # Example
///
/// ```
/// use flexfilter::WidgetConfig;
///
/// let config = WidgetConfig::default()
///     .with_width(480)
///     .with_placeholder("Filter issues");
/// assert_eq!(config.primary_color, "#adf09f");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WidgetConfig {
    /// Width of the widget.
    ///
    /// Default: 700
    pub width: u32,

    /// Background of active filter chips.
    ///
    /// Default: `#adf09f`
    pub primary_color: String,

    /// Background of per-filter inputs.
    ///
    /// Default: `#e8f3f1`
    pub secondary_color: String,

    /// Background of the remove control.
    ///
    /// Default: `#cfee8e`
    pub remove_button_color: String,

    /// Placeholder of the main search box.
    ///
    /// Default: `Search`
    pub placeholder_text: String,

    /// Extra class name for the root container.
    pub class_name: String,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            width: 700,
            primary_color: "#adf09f".to_string(),
            secondary_color: "#e8f3f1".to_string(),
            remove_button_color: "#cfee8e".to_string(),
            placeholder_text: "Search".to_string(),
            class_name: String::new(),
        }
    }
}

impl WidgetConfig {
    /// Creates a widget config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the width.
    pub fn with_width(mut self, width: u32) -> Self {
        self.width = width;
        self
    }

    /// Sets the chip background.
    pub fn with_primary_color(mut self, color: impl Into<String>) -> Self {
        self.primary_color = color.into();
        self
    }

    /// Sets the input background.
    pub fn with_secondary_color(mut self, color: impl Into<String>) -> Self {
        self.secondary_color = color.into();
        self
    }

    /// Sets the remove control background.
    pub fn with_remove_button_color(mut self, color: impl Into<String>) -> Self {
        self.remove_button_color = color.into();
        self
    }

    /// Sets the main search placeholder.
    pub fn with_placeholder(mut self, text: impl Into<String>) -> Self {
        self.placeholder_text = text.into();
        self
    }

    /// Sets the root class name.
    pub fn with_class_name(mut self, name: impl Into<String>) -> Self {
        self.class_name = name.into();
        self
    }
}

/// Configuration of a [`FilterSession`](crate::FilterSession).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionConfig {
    /// How queries are matched against labels.
    ///
    /// Default: [`MatchMode::Contains`]
    pub match_mode: MatchMode,

    /// Cosmetic settings for the rendering surface.
    pub widget: WidgetConfig,
}

impl SessionConfig {
    /// Creates a session config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the match mode.
    pub fn with_match_mode(mut self, mode: MatchMode) -> Self {
        self.match_mode = mode;
        self
    }

    /// Sets the widget settings.
    pub fn with_widget(mut self, widget: WidgetConfig) -> Self {
        self.widget = widget;
        self
    }

    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a config file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json =
            std::fs::read_to_string(path).map_err(|e| FlexFilterError::io(path, e))?;
        Self::from_json(&json)
    }
}
