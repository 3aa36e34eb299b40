//! Page geometry and typography shared by every document.

use std::str::FromStr;

use crate::error::Error;

use super::font::FontFace;

/// Points per millimetre
pub const MM: f32 = 72.0 / 25.4;

/// Convert millimetres to PDF points
pub fn mm(value: f32) -> f32 {
    value * MM
}

/// A4 portrait, in points
pub const A4: (f32, f32) = (595.28, 841.89);

/// The fourteen fonts every PDF reader ships with
pub const BASE14_FONTS: [&str; 14] = [
    "Helvetica",
    "Helvetica-Bold",
    "Helvetica-Oblique",
    "Helvetica-BoldOblique",
    "Times-Roman",
    "Times-Bold",
    "Times-Italic",
    "Times-BoldItalic",
    "Courier",
    "Courier-Bold",
    "Courier-Oblique",
    "Courier-BoldOblique",
    "Symbol",
    "ZapfDingbats",
];

/// Room for a card title and a four-row table
const MIN_LINES_PER_PAGE: f32 = 8.0;

/// RGB colour with components in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color(pub f32, pub f32, pub f32);

impl Color {
    pub const BLACK: Color = Color(0.0, 0.0, 0.0);
    pub const GREY: Color = Color(0.5, 0.5, 0.5);
    pub const RED: Color = Color(0.85, 0.1, 0.1);
    pub const WHITESMOKE: Color = Color(0.96, 0.96, 0.96);
    pub const PLACEHOLDER: Color = Color(0.95, 0.95, 0.95);
}

/// Which specification table a card carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpecLayout {
    /// 2 rows x 8 cells, four label/value pairs per row
    #[default]
    Wide,
    /// 4 rows x 4 cells, with image count and source link
    Classic,
}

impl FromStr for SpecLayout {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wide" => Ok(SpecLayout::Wide),
            "classic" => Ok(SpecLayout::Classic),
            other => Err(Error::Config(format!(
                "unknown spec layout {:?} (expected \"wide\" or \"classic\")",
                other
            ))),
        }
    }
}

/// Font size and line height for one kind of text
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size: f32,
    pub leading: f32,
}

/// Process-wide rendering settings, fixed at startup
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub font: FontFace,
    pub page_width: f32,
    pub page_height: f32,
    pub margin: f32,
    pub thumb_width: f32,
    pub thumb_height: f32,
    pub thumbs_per_row: usize,
    pub spec_layout: SpecLayout,
    pub brand: TextStyle,
    pub card_title: TextStyle,
    pub body: TextStyle,
    pub table: TextStyle,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            font: FontFace::default(),
            page_width: A4.0,
            page_height: A4.1,
            margin: mm(12.0),
            thumb_width: mm(60.0),
            thumb_height: mm(42.0),
            thumbs_per_row: 3,
            spec_layout: SpecLayout::Wide,
            brand: TextStyle { size: 20.0, leading: 24.0 },
            card_title: TextStyle { size: 12.0, leading: 16.0 },
            body: TextStyle { size: 10.0, leading: 14.0 },
            table: TextStyle { size: 9.0, leading: 11.0 },
        }
    }
}

impl RenderConfig {
    /// Width of the area between the left and right margins
    pub fn frame_width(&self) -> f32 {
        self.page_width - 2.0 * self.margin
    }

    /// Height of the area between the top and bottom margins
    pub fn frame_height(&self) -> f32 {
        self.page_height - 2.0 * self.margin
    }

    pub fn validate(&self) -> Result<(), Error> {
        if let FontFace::Standard(name) = &self.font {
            if !BASE14_FONTS.contains(&name.as_str()) {
                return Err(Error::Config(format!(
                    "font {:?} is not a standard PDF font",
                    name
                )));
            }
        }
        if self.thumbs_per_row == 0 {
            return Err(Error::Config("thumbs per row must be at least 1".into()));
        }
        if self.frame_width() <= 0.0 || self.frame_height() <= 0.0 {
            return Err(Error::Config("margins leave no room on the page".into()));
        }
        if self.thumb_width <= 0.0 || self.thumb_height <= 0.0 {
            return Err(Error::Config("thumbnail size must be positive".into()));
        }
        if self.thumb_height > self.frame_height() {
            return Err(Error::Config(format!(
                "thumbnails of {:.1}pt do not fit in a {:.1}pt tall frame",
                self.thumb_height,
                self.frame_height()
            )));
        }
        let tallest_line = [self.brand, self.card_title, self.body, self.table]
            .iter()
            .map(|style| style.leading)
            .fold(0.0, f32::max);
        if tallest_line * MIN_LINES_PER_PAGE > self.frame_height() {
            return Err(Error::Config(format!(
                "a {:.1}pt frame cannot hold {} lines of {:.1}pt",
                self.frame_height(),
                MIN_LINES_PER_PAGE,
                tallest_line
            )));
        }
        if self.thumb_width * self.thumbs_per_row as f32 > self.frame_width() {
            return Err(Error::Config(format!(
                "{} thumbnails of {:.1}pt do not fit in a {:.1}pt frame",
                self.thumbs_per_row,
                self.thumb_width,
                self.frame_width()
            )));
        }
        Ok(())
    }
}
