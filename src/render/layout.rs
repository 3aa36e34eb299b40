//! Block layout and pagination.
//!
//! Coordinates here are top-down: `y` grows from the top edge of the page.
//! The PDF writer flips them when it emits content streams.

use tracing::warn;

use super::font::FontFace;
use super::images::Thumbnail;
use super::style::{Color, RenderConfig, TextStyle};

/// Label drawn inside a grid cell whose image could not be loaded
pub const IMAGE_UNAVAILABLE: &str = "Image unavailable";

const TABLE_PADDING_X: f32 = 4.0;
const TABLE_PADDING_Y: f32 = 3.0;
const GRID_PADDING: f32 = 2.0;
const PLACEHOLDER_LABEL_SIZE: f32 = 9.0;

/// Cap height of the base fonts relative to their size
const CAP_HEIGHT: f32 = 0.72;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f32,
}

/// A drawing primitive placed on a page
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    /// Single line of text; `y` is the baseline
    Text {
        x: f32,
        y: f32,
        size: f32,
        color: Color,
        text: String,
    },
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        fill: Option<Color>,
        stroke: Option<Stroke>,
    },
    /// Reference into [`Layout::images`], stretched to the given box
    Image {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        image: usize,
    },
}

#[derive(Debug, Clone, Default)]
pub struct Page {
    pub elements: Vec<Element>,
}

impl Page {
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.elements.iter().filter_map(|e| match e {
            Element::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn image_count(&self) -> usize {
        self.elements
            .iter()
            .filter(|e| matches!(e, Element::Image { .. }))
            .count()
    }
}

/// A fully paginated document, ready for serialization
#[derive(Debug, Clone, Default)]
pub struct Layout {
    pub title: String,
    pub pages: Vec<Page>,
    pub images: Vec<Thumbnail>,
}

impl Layout {
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().flat_map(|p| p.texts())
    }

    pub fn image_count(&self) -> usize {
        self.pages.iter().map(Page::image_count).sum()
    }
}

/// One cell of a photo grid row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridCell {
    /// Index into [`Layout::images`]
    Image(usize),
    /// The fetch or decode failed
    Unavailable,
    /// Padding at the end of a short last row
    Blank,
}

/// Label/value table; cells are given in reading order and laid out
/// right-to-left, so the first column sits at the right edge.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub rows: Vec<Vec<String>>,
    pub col_widths: Vec<f32>,
    pub style: TextStyle,
    pub header_fill: Color,
}

impl Table {
    pub fn row_height(&self) -> f32 {
        self.style.leading + 2.0 * TABLE_PADDING_Y
    }

    pub fn width(&self) -> f32 {
        self.col_widths.iter().sum()
    }
}

/// Vertical building blocks of a document
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Spacer(f32),
    /// One right-aligned line of text
    Line { text: String, style: TextStyle },
    Table(Table),
    /// One row of a photo grid; cells run left to right
    GridRow {
        cells: Vec<GridCell>,
        cell_width: f32,
        cell_height: f32,
    },
}

impl Block {
    pub fn height(&self) -> f32 {
        match self {
            Block::Spacer(h) => *h,
            Block::Line { style, .. } => style.leading,
            Block::Table(table) => table.rows.len() as f32 * table.row_height(),
            Block::GridRow { cell_height, .. } => *cell_height,
        }
    }

    fn draw(&self, font: &FontFace, left: f32, width: f32, top: f32, out: &mut Vec<Element>) {
        let right = left + width;

        match self {
            Block::Spacer(_) => {}
            Block::Line { text, style } => {
                let text = font.fit_text(text, style.size, width);
                out.push(Element::Text {
                    x: right - font.text_width(&text, style.size),
                    y: baseline(top, style.leading, style.size),
                    size: style.size,
                    color: Color::BLACK,
                    text,
                });
            }
            Block::Table(table) => draw_table(font, table, right, top, out),
            Block::GridRow {
                cells,
                cell_width,
                cell_height,
            } => {
                let grid_left = right - cells.len() as f32 * cell_width;
                for (i, cell) in cells.iter().enumerate() {
                    let x = grid_left + i as f32 * cell_width;
                    draw_grid_cell(font, *cell, x, top, *cell_width, *cell_height, out);
                }
            }
        }
    }
}

/// Baseline that vertically centres capitals inside a line box
fn baseline(top: f32, height: f32, size: f32) -> f32 {
    top + height / 2.0 + size * CAP_HEIGHT / 2.0
}

fn draw_table(font: &FontFace, table: &Table, right: f32, top: f32, out: &mut Vec<Element>) {
    let row_height = table.row_height();
    let total_width = table.width();
    let size = table.style.size;

    out.push(Element::Rect {
        x: right - total_width,
        y: top,
        width: total_width,
        height: row_height,
        fill: Some(table.header_fill),
        stroke: None,
    });

    for (r, row) in table.rows.iter().enumerate() {
        let row_top = top + r as f32 * row_height;
        let mut cell_right = right;

        for (value, col_width) in row.iter().zip(&table.col_widths) {
            out.push(Element::Rect {
                x: cell_right - col_width,
                y: row_top,
                width: *col_width,
                height: row_height,
                fill: None,
                stroke: Some(Stroke {
                    color: Color::GREY,
                    width: 0.5,
                }),
            });

            let text = font.fit_text(value, size, col_width - 2.0 * TABLE_PADDING_X);
            if !text.is_empty() {
                out.push(Element::Text {
                    x: cell_right - TABLE_PADDING_X - font.text_width(&text, size),
                    y: baseline(row_top, row_height, size),
                    size,
                    color: Color::BLACK,
                    text,
                });
            }

            cell_right -= col_width;
        }
    }

    out.push(Element::Rect {
        x: right - total_width,
        y: top,
        width: total_width,
        height: row_height * table.rows.len() as f32,
        fill: None,
        stroke: Some(Stroke {
            color: Color::BLACK,
            width: 0.8,
        }),
    });
}

fn draw_grid_cell(
    font: &FontFace,
    cell: GridCell,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    out: &mut Vec<Element>,
) {
    let (x, y) = (x + GRID_PADDING, y + GRID_PADDING);
    let (width, height) = (width - 2.0 * GRID_PADDING, height - 2.0 * GRID_PADDING);

    match cell {
        GridCell::Image(image) => out.push(Element::Image {
            x,
            y,
            width,
            height,
            image,
        }),
        GridCell::Unavailable => {
            out.push(Element::Rect {
                x,
                y,
                width,
                height,
                fill: Some(Color::PLACEHOLDER),
                stroke: Some(Stroke {
                    color: Color::RED,
                    width: 0.8,
                }),
            });
            let label = font.fit_text(IMAGE_UNAVAILABLE, PLACEHOLDER_LABEL_SIZE, width);
            out.push(Element::Text {
                x: x + (width - font.text_width(&label, PLACEHOLDER_LABEL_SIZE)) / 2.0,
                y: baseline(y, height, PLACEHOLDER_LABEL_SIZE),
                size: PLACEHOLDER_LABEL_SIZE,
                color: Color::GREY,
                text: label,
            });
        }
        GridCell::Blank => out.push(Element::Rect {
            x,
            y,
            width,
            height,
            fill: Some(Color::PLACEHOLDER),
            stroke: Some(Stroke {
                color: Color::GREY,
                width: 0.8,
            }),
        }),
    }
}

/// Places blocks down the page, starting new pages as space runs out
pub struct Flow<'a> {
    config: &'a RenderConfig,
    pages: Vec<Page>,
    cursor: f32,
}

impl<'a> Flow<'a> {
    pub fn new(config: &'a RenderConfig) -> Self {
        Self {
            config,
            pages: vec![Page::default()],
            cursor: config.margin,
        }
    }

    fn bottom(&self) -> f32 {
        self.config.page_height - self.config.margin
    }

    fn remaining(&self) -> f32 {
        self.bottom() - self.cursor
    }

    fn at_page_top(&self) -> bool {
        self.cursor <= self.config.margin + f32::EPSILON
    }

    fn new_page(&mut self) {
        self.pages.push(Page::default());
        self.cursor = self.config.margin;
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Place one block, breaking to a new page first if it does not fit
    pub fn add(&mut self, block: &Block) {
        let height = block.height();

        if let Block::Spacer(_) = block {
            self.cursor = (self.cursor + height).min(self.bottom());
            return;
        }

        if height > self.remaining() && !self.at_page_top() {
            self.new_page();
        }
        if height > self.config.frame_height() {
            warn!(
                "Block of {:.1}pt is taller than the {:.1}pt frame and will be clipped",
                height,
                self.config.frame_height()
            );
        }

        let top = self.cursor;
        let (left, width) = (self.config.margin, self.config.frame_width());
        if let Some(page) = self.pages.last_mut() {
            block.draw(&self.config.font, left, width, top, &mut page.elements);
        }
        self.cursor += height;
    }

    /// Place blocks that belong together on one page.
    ///
    /// If the group does not fit in the remaining space it starts on a fresh
    /// page. A group taller than a whole page flows block by block instead.
    pub fn add_group(&mut self, blocks: &[Block]) {
        let content_height = group_height(blocks);

        if content_height > self.remaining()
            && !self.at_page_top()
            && content_height <= self.config.frame_height()
        {
            self.new_page();
        }

        for block in blocks {
            self.add(block);
        }
    }

    pub fn finish(self) -> Vec<Page> {
        self.pages
    }
}

/// Height of a group ignoring trailing spacers, which may be cut at a page end
fn group_height(blocks: &[Block]) -> f32 {
    let end = blocks
        .iter()
        .rposition(|b| !matches!(b, Block::Spacer(_)))
        .map_or(0, |i| i + 1);
    blocks[..end].iter().map(Block::height).sum()
}
