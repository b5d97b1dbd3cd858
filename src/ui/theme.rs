//! Marker colours, text colours and ANSI escape sequence generation.
//!
//! Every event type maps to a marker colour; unknown types use the default
//! marker colour. The built-in palette can be overridden by a TOML file, and
//! any key the file leaves out keeps its built-in value.
//!
//! # TOML Format
//!
//! ```toml
//! name = "night"
//! default_marker = "#2196F3"
//!
//! [markers]
//! music = "#FF4081"
//! sport = "#7C4DFF"
//!
//! [colors]
//! header_fg = "#ffffff"
//! text_dim = "#888888"
//! ```
//!
//! # Example
//!
//! ```rust
//! use eventmap::ui::theme::Theme;
//!
//! let theme = Theme::default();
//! assert_eq!(theme.marker_color("music"), "#FF4081");
//! assert_eq!(theme.marker_color("karaoke"), "#2196F3");
//! ```

use crate::domain::error::{EventMapError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Marker colour for event types without an entry.
pub const DEFAULT_MARKER_COLOR: &str = "#2196F3";

const BUILTIN_MARKERS: [(&str, &str); 6] = [
    ("music", "#FF4081"),
    ("sport", "#7C4DFF"),
    ("conference", "#00BCD4"),
    ("art", "#FF9800"),
    ("theatre", "#4CAF50"),
    ("festival", "#9C27B0"),
];

/// Colour scheme for markers and list rendering.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Theme {
    /// Human-readable theme name.
    pub name: String,
    /// Event type to marker colour.
    pub markers: BTreeMap<String, String>,
    /// Colour for types missing from `markers`.
    pub default_marker: String,
    /// Colours of the text list.
    pub colors: ThemeColors,
}

/// Text colours used by the list renderer.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ThemeColors {
    pub header_fg: String,
    pub text_normal: String,
    /// Secondary info: dates, distances, hints.
    pub text_dim: String,
    /// Active filter indicators and the open event.
    pub active_fg: String,
    pub empty_state_fg: String,
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            header_fg: "#ECEFF1".to_string(),
            text_normal: "#CFD8DC".to_string(),
            text_dim: "#78909C".to_string(),
            active_fg: "#FFC107".to_string(),
            empty_state_fg: "#2196F3".to_string(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            markers: BUILTIN_MARKERS
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
            default_marker: DEFAULT_MARKER_COLOR.to_string(),
            colors: ThemeColors::default(),
        }
    }
}

impl Theme {
    /// Loads a theme from a TOML file on top of the built-in palette.
    ///
    /// # Errors
    ///
    /// Returns [`EventMapError::Config`] if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| EventMapError::Config(format!("failed to read theme file {}: {e}", path.display())))?;
        Self::from_toml(&contents)
    }

    /// Parses TOML on top of the built-in palette.
    ///
    /// # Errors
    ///
    /// Returns [`EventMapError::Config`] on malformed TOML.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let overrides: Self = toml::from_str(contents)
            .map_err(|e| EventMapError::Config(format!("failed to parse theme TOML: {e}")))?;

        let mut theme = Self::default();
        theme.name = overrides.name;
        theme.markers.extend(overrides.markers);
        theme.default_marker = overrides.default_marker;
        theme.colors = overrides.colors;
        Ok(theme)
    }

    /// Marker colour for `event_type`.
    #[must_use]
    pub fn marker_color(&self, event_type: &str) -> &str {
        self.markers
            .get(event_type)
            .map_or(self.default_marker.as_str(), String::as_str)
    }

    /// Converts a hex colour to an RGB tuple. Malformed input yields white.
    fn hex_to_rgb(hex: &str) -> (u8, u8, u8) {
        let hex = hex.trim_start_matches('#').trim();

        if hex.len() != 6 || !hex.is_ascii() {
            return (255, 255, 255);
        }

        let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(255);
        let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(255);
        let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(255);

        (r, g, b)
    }

    /// ANSI 24-bit foreground colour escape sequence.
    #[must_use]
    pub fn fg(hex: &str) -> String {
        let (r, g, b) = Self::hex_to_rgb(hex);
        format!("\u{001b}[38;2;{r};{g};{b}m")
    }

    #[must_use]
    pub const fn bold() -> &'static str {
        "\u{001b}[1m"
    }

    #[must_use]
    pub const fn dim() -> &'static str {
        "\u{001b}[2m"
    }

    #[must_use]
    pub const fn reset() -> &'static str {
        "\u{001b}[0m"
    }
}
