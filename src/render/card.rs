//! Card layout: title line, specification table and photo grid per listing.

use crate::models::Listing;

use super::layout::{Block, GridCell, Table};
use super::style::{mm, Color, RenderConfig, SpecLayout};

/// Shown instead of the grid when a listing has no photos
pub const NO_IMAGES: &str = "No images available for this listing.";

const SEPARATOR: &str = " \u{2014} ";

/// Column proportions of the 2x8 table, in reading order (right to left)
const WIDE_COLUMNS: [f32; 8] = [24.0, 24.0, 20.0, 22.0, 20.0, 24.0, 24.0, 28.0];

/// Column proportions of the 4x4 table
const CLASSIC_COLUMNS: [f32; 4] = [24.0, 60.0, 24.0, 60.0];

pub fn card_title(listing: &Listing, layout: SpecLayout) -> String {
    match layout {
        SpecLayout::Wide => format!("{}{}ID: {}", listing.model(), SEPARATOR, listing.id()),
        SpecLayout::Classic => format!(
            "{}{}{}{}ID: {}",
            listing.model(),
            SEPARATOR,
            listing.year(),
            SEPARATOR,
            listing.id()
        ),
    }
}

fn pairs(cells: &[(&str, &str)]) -> Vec<String> {
    cells
        .iter()
        .flat_map(|(label, value)| [label.to_string(), value.to_string()])
        .collect()
}

fn scale(proportions: &[f32], total: f32) -> Vec<f32> {
    let sum: f32 = proportions.iter().sum();
    proportions.iter().map(|p| p / sum * total).collect()
}

pub fn spec_table(listing: &Listing, config: &RenderConfig) -> Table {
    let (rows, columns) = match config.spec_layout {
        SpecLayout::Wide => {
            let car = format!("{} {}", listing.model(), listing.year())
                .trim()
                .to_string();
            (
                vec![
                    pairs(&[
                        ("Paint", listing.paint()),
                        ("Fuel", listing.fuel()),
                        ("Mileage", listing.mileage()),
                        ("Opening price", listing.opening_price()),
                    ]),
                    pairs(&[
                        ("Gearbox", listing.gear()),
                        ("Engine", listing.engine()),
                        ("Drive", listing.drive()),
                        ("Car", car.as_str()),
                    ]),
                ],
                &WIDE_COLUMNS[..],
            )
        }
        SpecLayout::Classic => {
            let count = listing.image_count().to_string();
            (
                vec![
                    pairs(&[("Price", listing.price()), ("Mileage", listing.mileage())]),
                    pairs(&[("Gearbox", listing.gear()), ("Engine", listing.engine())]),
                    pairs(&[("Drive", listing.drive()), ("Paint", listing.paint())]),
                    pairs(&[("Images", count.as_str()), ("Source", listing.source_url())]),
                ],
                &CLASSIC_COLUMNS[..],
            )
        }
    };

    Table {
        rows,
        col_widths: scale(columns, config.frame_width()),
        style: config.table,
        header_fill: Color::WHITESMOKE,
    }
}

/// Split grid cells into rows, padding the last row with blanks
pub fn grid_rows(cells: &[GridCell], config: &RenderConfig) -> Vec<Block> {
    let columns = config.thumbs_per_row.max(1);
    cells
        .chunks(columns)
        .map(|chunk| {
            let mut row = chunk.to_vec();
            row.resize(columns, GridCell::Blank);
            Block::GridRow {
                cells: row,
                cell_width: config.thumb_width,
                cell_height: config.thumb_height,
            }
        })
        .collect()
}

/// All blocks of one card, meant to be placed as a single group
pub fn card_blocks(listing: &Listing, cells: &[GridCell], config: &RenderConfig) -> Vec<Block> {
    let mut blocks = vec![
        Block::Line {
            text: card_title(listing, config.spec_layout),
            style: config.card_title,
        },
        Block::Spacer(mm(2.0)),
        Block::Table(spec_table(listing, config)),
        Block::Spacer(mm(2.0)),
    ];

    if cells.is_empty() {
        blocks.push(Block::Line {
            text: NO_IMAGES.to_string(),
            style: config.body,
        });
    } else {
        blocks.extend(grid_rows(cells, config));
    }

    blocks.push(Block::Spacer(mm(5.0)));
    blocks
}
