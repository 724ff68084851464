//! Text measurement seam.
//!
//! Exact glyph metrics belong to whatever surface draws the text. Hit
//! testing and handle placement only need a width, so they go through
//! [`TextMeasure`] and headless callers use [`ApproxMeasure`].

use wm_core::FontWeight;

pub trait TextMeasure {
    /// Rendered width in pixels of `text` at `font_size`.
    fn width(&self, text: &str, font_size: f64, weight: FontWeight) -> f64;
}

/// Fixed advance per character, slightly wider for bold.
#[derive(Debug, Clone, Copy)]
pub struct ApproxMeasure {
    /// Advance of one character as a fraction of the font size.
    pub advance: f64,
}

impl Default for ApproxMeasure {
    fn default() -> Self {
        Self { advance: 0.6 }
    }
}

impl TextMeasure for ApproxMeasure {
    fn width(&self, text: &str, font_size: f64, weight: FontWeight) -> f64 {
        let factor = match weight {
            FontWeight::Normal => 1.0,
            FontWeight::Bold => 1.1,
        };
        text.chars().count() as f64 * font_size * self.advance * factor
    }
}
