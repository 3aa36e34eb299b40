//! Type faces: one of the standard PDF fonts, or a TrueType file embedded
//! into every document so Hangul and other scripts render.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use ttf_parser::{Face, GlyphId};

use crate::error::{Error, Result};

use super::style::BASE14_FONTS;
use super::text::{encode_win_ansi, fit_measured, helvetica_width};

/// Font used when nothing is configured
pub const DEFAULT_FONT: &str = "Helvetica";

/// The face every text element of a document is set in
#[derive(Debug, Clone)]
pub enum FontFace {
    /// Base-14 font, WinAnsi encoded, Helvetica metrics
    Standard(String),
    /// TrueType program written into the PDF, addressed by glyph id
    Embedded(Arc<EmbeddedFont>),
}

impl Default for FontFace {
    fn default() -> Self {
        FontFace::Standard(DEFAULT_FONT.to_string())
    }
}

impl FontFace {
    /// A base-14 name, or else a path to a `.ttf`/`.otf` file
    pub fn from_setting(value: &str) -> Result<Self> {
        let value = value.trim();
        if BASE14_FONTS.contains(&value) {
            return Ok(FontFace::Standard(value.to_string()));
        }

        let path = Path::new(value);
        let is_font_file = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| matches!(ext.to_ascii_lowercase().as_str(), "ttf" | "otf"))
            .unwrap_or(false);
        if !is_font_file && !path.is_file() {
            return Err(Error::Config(format!(
                "font {:?} is neither a standard PDF font nor a font file",
                value
            )));
        }

        Ok(FontFace::Embedded(Arc::new(EmbeddedFont::load(path)?)))
    }

    /// PDF name of the face
    pub fn name(&self) -> &str {
        match self {
            FontFace::Standard(name) => name,
            FontFace::Embedded(font) => font.name(),
        }
    }

    /// Advance of each character, in 1/1000 em
    pub fn advances(&self, text: &str) -> Vec<f32> {
        match self {
            FontFace::Standard(_) => text.chars().map(helvetica_width).collect(),
            FontFace::Embedded(font) => font.advances(text),
        }
    }

    /// Width of `text` set in `size` points
    pub fn text_width(&self, text: &str, size: f32) -> f32 {
        self.advances(text).iter().sum::<f32>() * size / 1000.0
    }

    /// Shorten `text` with a trailing "..." so it fits within `max_width`
    pub fn fit_text(&self, text: &str, size: f32, max_width: f32) -> String {
        let ellipsis: f32 = self.advances("...").iter().sum();
        fit_measured(text, &self.advances(text), ellipsis, size, max_width)
    }

    /// Bytes for a `Tj` operand: WinAnsi for standard fonts, big-endian
    /// glyph ids for embedded ones
    pub fn encode(&self, text: &str) -> Vec<u8> {
        match self {
            FontFace::Standard(_) => encode_win_ansi(text),
            FontFace::Embedded(font) => font.encode(text),
        }
    }
}

/// Vertical metrics scaled to 1000 units per em
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontMetrics {
    pub ascent: i64,
    pub descent: i64,
    pub cap_height: i64,
    pub bbox: [i64; 4],
}

/// A glyph placed by at least one character of a document
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UsedGlyph {
    pub ch: char,
    /// Advance in 1/1000 em
    pub width: f32,
}

/// A parsed TrueType/OpenType file kept in memory
pub struct EmbeddedFont {
    name: String,
    data: Vec<u8>,
    units_per_em: f32,
    metrics: FontMetrics,
}

impl fmt::Debug for EmbeddedFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmbeddedFont")
            .field("name", &self.name)
            .field("bytes", &self.data.len())
            .finish()
    }
}

impl EmbeddedFont {
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)
            .map_err(|e| Error::Config(format!("cannot read font {}: {}", path.display(), e)))?;
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("Embedded");
        Self::from_bytes(stem, data)
    }

    /// Parse font bytes; `name` becomes the PDF BaseFont
    pub fn from_bytes(name: &str, data: Vec<u8>) -> Result<Self> {
        let face = Face::parse(&data, 0)
            .map_err(|e| Error::Config(format!("invalid font {:?}: {}", name, e)))?;

        let units_per_em = f32::from(face.units_per_em());
        let scale = |v: i16| (f32::from(v) * 1000.0 / units_per_em).round() as i64;
        let bbox = face.global_bounding_box();
        let metrics = FontMetrics {
            ascent: scale(face.ascender()),
            descent: scale(face.descender()),
            cap_height: scale(face.capital_height().unwrap_or(face.ascender())),
            bbox: [
                scale(bbox.x_min),
                scale(bbox.y_min),
                scale(bbox.x_max),
                scale(bbox.y_max),
            ],
        };

        let name: String = name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
            .collect();
        let name = if name.is_empty() { "Embedded".to_string() } else { name };

        Ok(Self {
            name,
            data,
            units_per_em,
            metrics,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The raw font program
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn metrics(&self) -> FontMetrics {
        self.metrics
    }

    fn face(&self) -> Option<Face<'_>> {
        Face::parse(&self.data, 0).ok()
    }

    /// Glyph id and advance (1/1000 em) per character; characters the face
    /// lacks fall back to its `?` glyph, then to `.notdef`
    fn glyphs(&self, text: &str) -> Vec<(char, u16, f32)> {
        let Some(face) = self.face() else {
            return text.chars().map(|c| (c, 0, 0.0)).collect();
        };
        let fallback = face.glyph_index('?').unwrap_or(GlyphId(0));

        text.chars()
            .map(|c| {
                let glyph = face.glyph_index(c).unwrap_or(fallback);
                let advance = face.glyph_hor_advance(glyph).unwrap_or(0);
                (c, glyph.0, f32::from(advance) * 1000.0 / self.units_per_em)
            })
            .collect()
    }

    pub fn advances(&self, text: &str) -> Vec<f32> {
        self.glyphs(text).into_iter().map(|(_, _, w)| w).collect()
    }

    pub fn encode(&self, text: &str) -> Vec<u8> {
        self.glyphs(text)
            .into_iter()
            .flat_map(|(_, glyph, _)| glyph.to_be_bytes())
            .collect()
    }

    /// Every glyph the given texts need, keyed by glyph id. The first
    /// character mapped to a glyph wins.
    pub fn used_glyphs<'a>(&self, texts: impl Iterator<Item = &'a str>) -> BTreeMap<u16, UsedGlyph> {
        let mut used = BTreeMap::new();
        for text in texts {
            for (ch, glyph, width) in self.glyphs(text) {
                used.entry(glyph).or_insert(UsedGlyph { ch, width });
            }
        }
        used
    }
}

/// Minimal TrueType file with a format 12 cmap, used by tests across the
/// render module. Glyph `n` maps to `chars[n - 1]` and advances 500 units
/// of a 1000 unit em; glyph 0 is `.notdef`.
#[cfg(test)]
pub(crate) fn test_font_bytes(chars: &[char]) -> Vec<u8> {
    fn table(tag: &[u8; 4], body: Vec<u8>) -> ([u8; 4], Vec<u8>) {
        (*tag, body)
    }

    let num_glyphs = chars.len() as u16 + 1;

    let mut cmap = Vec::new();
    cmap.extend(0u16.to_be_bytes()); // version
    cmap.extend(1u16.to_be_bytes()); // encoding records
    cmap.extend(3u16.to_be_bytes()); // Windows
    cmap.extend(10u16.to_be_bytes()); // Unicode full repertoire
    cmap.extend(12u32.to_be_bytes()); // subtable offset
    cmap.extend(12u16.to_be_bytes()); // format
    cmap.extend(0u16.to_be_bytes());
    cmap.extend((16 + 12 * chars.len() as u32).to_be_bytes());
    cmap.extend(0u32.to_be_bytes()); // language
    cmap.extend((chars.len() as u32).to_be_bytes());
    let mut groups: Vec<(u32, u32)> = chars
        .iter()
        .enumerate()
        .map(|(i, c)| (*c as u32, i as u32 + 1))
        .collect();
    groups.sort();
    for (code, glyph) in groups {
        cmap.extend(code.to_be_bytes());
        cmap.extend(code.to_be_bytes());
        cmap.extend(glyph.to_be_bytes());
    }

    let mut head = Vec::new();
    head.extend(0x0001_0000u32.to_be_bytes()); // version
    head.extend(0x0001_0000u32.to_be_bytes()); // revision
    head.extend(0u32.to_be_bytes()); // checksum adjustment
    head.extend(0x5F0F_3CF5u32.to_be_bytes()); // magic
    head.extend(0u16.to_be_bytes()); // flags
    head.extend(1000u16.to_be_bytes()); // units per em
    head.extend([0u8; 16]); // created, modified
    for v in [0i16, -200, 1000, 800] {
        head.extend(v.to_be_bytes());
    }
    head.extend(0u16.to_be_bytes()); // mac style
    head.extend(8u16.to_be_bytes()); // lowest rec ppem
    head.extend(2i16.to_be_bytes()); // direction hint
    head.extend(0i16.to_be_bytes()); // short loca
    head.extend(0i16.to_be_bytes()); // glyph data format

    let mut hhea = Vec::new();
    hhea.extend(0x0001_0000u32.to_be_bytes());
    hhea.extend(800i16.to_be_bytes()); // ascender
    hhea.extend((-200i16).to_be_bytes()); // descender
    hhea.extend(0i16.to_be_bytes()); // line gap
    hhea.extend(500u16.to_be_bytes()); // advance max
    hhea.extend([0u8; 22]); // side bearings, caret, reserved, metric format
    hhea.extend(num_glyphs.to_be_bytes());

    let mut hmtx = Vec::new();
    for _ in 0..num_glyphs {
        hmtx.extend(500u16.to_be_bytes());
        hmtx.extend(0i16.to_be_bytes());
    }

    let mut maxp = Vec::new();
    maxp.extend(0x0000_5000u32.to_be_bytes());
    maxp.extend(num_glyphs.to_be_bytes());

    let tables = [
        table(b"cmap", cmap),
        table(b"head", head),
        table(b"hhea", hhea),
        table(b"hmtx", hmtx),
        table(b"maxp", maxp),
    ];

    let mut out = Vec::new();
    out.extend(0x0001_0000u32.to_be_bytes());
    out.extend((tables.len() as u16).to_be_bytes());
    out.extend([0u8; 6]); // search range, entry selector, range shift

    let mut offset = 12 + 16 * tables.len() as u32;
    let mut bodies = Vec::new();
    for (tag, body) in &tables {
        out.extend(tag);
        out.extend(0u32.to_be_bytes());
        out.extend(offset.to_be_bytes());
        out.extend((body.len() as u32).to_be_bytes());

        let mut padded = body.clone();
        padded.resize((body.len() + 3) / 4 * 4, 0);
        offset += padded.len() as u32;
        bodies.extend(padded);
    }
    out.extend(bodies);
    out
}
