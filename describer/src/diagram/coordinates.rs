//! Anchor scanning: turning the `{`/`}` glyphs of a diagram into a
//! coordinate table.

use crate::input::layout::*;

pub const LEADING_ANCHOR: char = '{';
pub const TRAILING_ANCHOR: char = '}';

/// Width of the label box drawn at an anchor, minus one. A trailing anchor
/// puts the box to the left of the glyph.
pub const LABEL_OFFSET: i32 = 5;

#[derive(Debug, Default)]
pub struct AnchorScan {
    pub coordinates: CoordinateTable,
    /// Anchor glyphs without a matching slot, as `(row, column)`.
    pub unnamed: Vec<(usize, usize)>,
    /// Slots left over after the last anchor glyph of a row, as `(row, slot)`.
    pub unused: Vec<(usize, usize)>,
}

pub fn anchor_orientation(glyph: char) -> Option<Orientation> {
    match glyph {
        LEADING_ANCHOR => Some(Orientation::Leading),
        TRAILING_ANCHOR => Some(Orientation::Trailing),
        _ => None,
    }
}

pub fn anchor_coordinate(column: usize, row: usize, orientation: Orientation) -> Coordinate {
    let x = match orientation {
        Orientation::Leading => column as i32,
        Orientation::Trailing => column as i32 - LABEL_OFFSET,
    };
    Coordinate { x, y: row as i32, orientation }
}

/// Walk every row left to right, pairing the n-th anchor glyph with the n-th
/// slot. A name anchored twice keeps its last position.
pub fn scan_area(diagram: &Diagram) -> AnchorScan {
    let mut scan = AnchorScan::default();
    for (y, row) in diagram.rows.iter().enumerate() {
        let mut slots = row.anchors.iter();
        let mut used = 0;
        for (x, glyph) in row.cells.chars().enumerate() {
            let orientation = match anchor_orientation(glyph) {
                Some(o) => o,
                None => continue,
            };
            match slots.next() {
                Some(slot) => {
                    used += 1;
                    for name in slot.iter().filter(|n| n.as_str() != PLACEHOLDER_SIGNAL) {
                        scan.coordinates.insert(name.clone(), anchor_coordinate(x, y, orientation));
                    }
                }
                None => scan.unnamed.push((y, x)),
            }
        }
        for extra in used..row.anchors.len() {
            scan.unused.push((y, extra));
        }
    }
    scan
}
