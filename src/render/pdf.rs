//! Serialize a [`Layout`] into PDF bytes with lopdf.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::io::Write;

use chrono::Utc;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document as LopdfDocument, Object, ObjectId, Stream, StringFormat};

use crate::error::Result;

use super::font::{EmbeddedFont, FontFace, UsedGlyph};
use super::images::Thumbnail;
use super::layout::{Element, Layout, Stroke};
use super::style::{Color, RenderConfig};

const FONT_KEY: &str = "F1";

/// Entries per `bfchar` section of a ToUnicode CMap
const BFCHAR_CHUNK: usize = 100;

fn real(value: f32) -> Object {
    Object::Real(value)
}

fn color_operands(color: Color) -> Vec<Object> {
    vec![real(color.0), real(color.1), real(color.2)]
}

fn image_key(index: usize) -> String {
    format!("Im{}", index)
}

/// PDF text string for document metadata: UTF-16BE with a byte order mark
fn text_string(text: &str) -> Object {
    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend(unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

fn name(value: &str) -> Object {
    Object::Name(value.as_bytes().to_vec())
}

/// CMap mapping glyph ids back to Unicode so text can be searched and copied
fn to_unicode_cmap(glyphs: &BTreeMap<u16, UsedGlyph>) -> String {
    let mut cmap = String::from(
        "/CIDInit /ProcSet findresource begin\n\
         12 dict begin\n\
         begincmap\n\
         /CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n\
         /CMapName /Adobe-Identity-UCS def\n\
         /CMapType 2 def\n\
         1 begincodespacerange\n\
         <0000> <FFFF>\n\
         endcodespacerange\n",
    );

    let entries: Vec<(&u16, &UsedGlyph)> = glyphs.iter().collect();
    for chunk in entries.chunks(BFCHAR_CHUNK) {
        let _ = writeln!(cmap, "{} beginbfchar", chunk.len());
        for (glyph, used) in chunk {
            let mut units = [0u16; 2];
            let target: String = used
                .ch
                .encode_utf16(&mut units)
                .iter()
                .map(|u| format!("{:04X}", u))
                .collect();
            let _ = writeln!(cmap, "<{:04X}> <{}>", glyph, target);
        }
        cmap.push_str("endbfchar\n");
    }

    cmap.push_str(
        "endcmap\n\
         CMapName currentdict /CMap defineresource pop\n\
         end\n\
         end\n",
    );
    cmap
}

/// Embed a TrueType face as a Type0 font with Identity-H encoding.
///
/// Only the widths of glyphs the layout uses are listed; the whole font
/// program is written as `FontFile2`.
fn embed_font(doc: &mut LopdfDocument, font: &EmbeddedFont, layout: &Layout) -> ObjectId {
    let glyphs = font.used_glyphs(layout.texts());
    let metrics = font.metrics();

    let file_id = doc.add_object(Stream::new(
        dictionary! { "Length1" => font.data().len() as i64 },
        font.data().to_vec(),
    ));

    let descriptor_id = doc.add_object(dictionary! {
        "Type" => "FontDescriptor",
        "FontName" => name(font.name()),
        "Flags" => 32i64,
        "FontBBox" => metrics.bbox.iter().map(|v| Object::Integer(*v)).collect::<Vec<_>>(),
        "ItalicAngle" => 0i64,
        "Ascent" => metrics.ascent,
        "Descent" => metrics.descent,
        "CapHeight" => metrics.cap_height,
        "StemV" => 80i64,
        "FontFile2" => file_id,
    });

    let mut widths = Vec::with_capacity(glyphs.len() * 2);
    for (glyph, used) in &glyphs {
        widths.push(Object::Integer(i64::from(*glyph)));
        widths.push(Object::Array(vec![Object::Integer(used.width.round() as i64)]));
    }

    let cid_font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "CIDFontType2",
        "BaseFont" => name(font.name()),
        "CIDSystemInfo" => dictionary! {
            "Registry" => Object::string_literal("Adobe"),
            "Ordering" => Object::string_literal("Identity"),
            "Supplement" => 0i64,
        },
        "FontDescriptor" => descriptor_id,
        "DW" => 1000i64,
        "W" => widths,
        "CIDToGIDMap" => "Identity",
    });

    let to_unicode_id = doc.add_object(Stream::new(
        Dictionary::new(),
        to_unicode_cmap(&glyphs).into_bytes(),
    ));

    doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type0",
        "BaseFont" => name(font.name()),
        "Encoding" => "Identity-H",
        "DescendantFonts" => vec![Object::Reference(cid_font_id)],
        "ToUnicode" => to_unicode_id,
    })
}

/// `D:YYYYMMDDHHmmSSZ`
fn pdf_date() -> Object {
    Object::string_literal(Utc::now().format("D:%Y%m%d%H%M%SZ").to_string())
}

fn image_stream(thumb: &Thumbnail) -> Result<Stream> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&thumb.rgb)?;
    let data = encoder.finish()?;

    let dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => thumb.width as i64,
        "Height" => thumb.height as i64,
        "ColorSpace" => "DeviceRGB",
        "BitsPerComponent" => 8i64,
        "Filter" => "FlateDecode",
    };
    Ok(Stream::new(dict, data).with_compression(false))
}

/// Content-stream operations for one page. `page_height` flips the top-down
/// layout coordinates into PDF user space.
fn page_operations(elements: &[Element], font: &FontFace, page_height: f32) -> Vec<Operation> {
    let mut ops = Vec::new();

    for element in elements {
        match element {
            Element::Text {
                x,
                y,
                size,
                color,
                text,
            } => {
                ops.push(Operation::new("BT", vec![]));
                ops.push(Operation::new("Tf", vec![FONT_KEY.into(), real(*size)]));
                ops.push(Operation::new("rg", color_operands(*color)));
                ops.push(Operation::new("Td", vec![real(*x), real(page_height - y)]));
                ops.push(Operation::new(
                    "Tj",
                    vec![Object::String(font.encode(text), StringFormat::Hexadecimal)],
                ));
                ops.push(Operation::new("ET", vec![]));
            }
            Element::Rect {
                x,
                y,
                width,
                height,
                fill,
                stroke,
            } => {
                if fill.is_none() && stroke.is_none() {
                    continue;
                }
                ops.push(Operation::new("q", vec![]));
                if let Some(fill) = fill {
                    ops.push(Operation::new("rg", color_operands(*fill)));
                }
                if let Some(Stroke { color, width }) = stroke {
                    ops.push(Operation::new("RG", color_operands(*color)));
                    ops.push(Operation::new("w", vec![real(*width)]));
                }
                ops.push(Operation::new(
                    "re",
                    vec![
                        real(*x),
                        real(page_height - y - height),
                        real(*width),
                        real(*height),
                    ],
                ));
                let paint = match (fill.is_some(), stroke.is_some()) {
                    (true, true) => "B",
                    (true, false) => "f",
                    _ => "S",
                };
                ops.push(Operation::new(paint, vec![]));
                ops.push(Operation::new("Q", vec![]));
            }
            Element::Image {
                x,
                y,
                width,
                height,
                image,
            } => {
                ops.push(Operation::new("q", vec![]));
                ops.push(Operation::new(
                    "cm",
                    vec![
                        real(*width),
                        real(0.0),
                        real(0.0),
                        real(*height),
                        real(*x),
                        real(page_height - y - height),
                    ],
                ));
                ops.push(Operation::new("Do", vec![Object::Name(image_key(*image).into_bytes())]));
                ops.push(Operation::new("Q", vec![]));
            }
        }
    }

    ops
}

/// Write the layout as a complete PDF file
pub fn write_pdf(layout: &Layout, config: &RenderConfig) -> Result<Vec<u8>> {
    let mut doc = LopdfDocument::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = match &config.font {
        FontFace::Standard(base) => doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => name(base),
            "Encoding" => "WinAnsiEncoding",
        }),
        FontFace::Embedded(font) => embed_font(&mut doc, font, layout),
    };

    let mut xobjects = Dictionary::new();
    for (index, thumb) in layout.images.iter().enumerate() {
        let image_id = doc.add_object(image_stream(thumb)?);
        xobjects.set(image_key(index), image_id);
    }

    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { FONT_KEY => font_id },
        "XObject" => xobjects,
    });

    let media_box: Vec<Object> = vec![
        Object::Integer(0),
        Object::Integer(0),
        real(config.page_width),
        real(config.page_height),
    ];

    let mut kids: Vec<Object> = Vec::with_capacity(layout.pages.len());
    for page in &layout.pages {
        let content = Content {
            operations: page_operations(&page.elements, &config.font, config.page_height),
        };
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.encode()?));
        let page_id: ObjectId = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => media_box.clone(),
        });
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => text_string(&layout.title),
        "Producer" => Object::string_literal("encar-pdf"),
        "CreationDate" => pdf_date(),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(bytes)
}
