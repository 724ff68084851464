//! Editor settings.
//!
//! Every field has a default, so a host may deserialize a partial JSON
//! object and leave the rest alone.

use crate::history::DEFAULT_CAPACITY;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use wm_core::{ShapeStyle, Viewport};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    pub viewport: Viewport,
    /// Undo steps kept before the oldest is dropped.
    pub history_capacity: usize,
    /// Delay between automatic presentation steps.
    pub autoplay_delay_ms: u64,
    pub shape_style: ShapeStyle,
    pub text_font_size: f64,
    pub text_color: String,
    pub pen_color: String,
    pub pen_width: f64,
    pub icon_size: f64,
    /// Pixel size given to a rectangle or triangle released without dragging.
    pub default_box: (f64, f64),
    /// Pixel radius given to a circle released without dragging.
    pub default_radius: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            history_capacity: DEFAULT_CAPACITY,
            autoplay_delay_ms: 2000,
            shape_style: ShapeStyle::default(),
            text_font_size: 16.0,
            text_color: "#000000".to_string(),
            pen_color: "#000000".to_string(),
            pen_width: 2.0,
            icon_size: 24.0,
            default_box: (100.0, 80.0),
            default_radius: 50.0,
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn autoplay_delay(&self) -> Duration {
        Duration::from_millis(self.autoplay_delay_ms)
    }
}
