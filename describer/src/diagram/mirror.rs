//! Mirroring of text diagrams, producing the layout as seen from the other
//! end of the line.
//!
//! The diagram is turned half a revolution: rows are reversed, each row's
//! cells are reversed, and direction-sensitive glyphs are swapped for their
//! counterparts so that corners, junctions, anchors and arrows still point
//! the right way. Text labels are re-reversed afterwards so they stay
//! readable. Anchor slots are reversed together with the cells, and the
//! coordinate table is rebuilt from the mirrored anchors.
//!
//! Mirroring twice gives back the original diagram, provided no label
//! touches a row edge and no lone arrow is preceded by a blank.

use regex::Regex;

use crate::input::layout::*;

/// Each glyph maps to the other member of its pair. Applying the table twice
/// is the identity.
pub const GLYPH_PAIRS: &[(char, char)] = &[
    ('{', '}'),
    ('>', '<'),
    ('├', '┤'),
    ('┬', '┴'),
    ('┌', '┘'),
    ('└', '┐'),
    ('▶', '◀'),
];

/// Arrows are drawn two cells wide: the glyph followed by this pad.
pub const ARROW_PAD: char = ' ';

/// Characters that make up a text label.
pub const LABEL_PATTERN: &str = r"[A-Za-z0-9Łł_]+";

pub fn mirror_glyph(c: char) -> char {
    for &(a, b) in GLYPH_PAIRS {
        if c == a {
            return b;
        }
        if c == b {
            return a;
        }
    }
    c
}

fn is_arrow(c: char) -> bool {
    c == '▶' || c == '◀'
}

/// Reverse the cells and swap directional glyphs. An arrow with its pad is
/// kept as a unit so the pad stays behind the glyph.
pub fn mirror_cells(cells: &str) -> String {
    let chars: Vec<char> = cells.chars().collect();
    let mut out = String::with_capacity(cells.len());
    let mut i = chars.len();
    while i > 0 {
        i -= 1;
        if chars[i] == ARROW_PAD && i > 0 && is_arrow(chars[i - 1]) {
            out.push(mirror_glyph(chars[i - 1]));
            out.push(ARROW_PAD);
            i -= 1;
        } else {
            out.push(mirror_glyph(chars[i]));
        }
    }
    out
}

pub struct DiagramMirror {
    label: Regex,
}

impl DiagramMirror {
    pub fn new() -> Result<DiagramMirror, regex::Error> {
        Ok(DiagramMirror { label: Regex::new(LABEL_PATTERN)? })
    }

    /// Re-reverse every label run of an already mirrored row. The last
    /// character of the row never takes part in a run, so a label ending
    /// there is restored without its final character.
    pub fn restore_labels(&self, row: &str) -> String {
        let last = match row.char_indices().last() {
            Some((i, _)) => i,
            None => return String::new(),
        };
        let mut out = String::with_capacity(row.len());
        let mut prev = 0;
        for m in self.label.find_iter(&row[..last]) {
            out.push_str(&row[prev..m.start()]);
            out.extend(m.as_str().chars().rev());
            prev = m.end();
        }
        out.push_str(&row[prev..]);
        out
    }

    pub fn mirror_row(&self, row: &Row) -> Row {
        Row {
            cells: self.restore_labels(&mirror_cells(&row.cells)),
            anchors: row.anchors.iter().rev().cloned().collect(),
        }
    }

    pub fn mirror(&self, diagram: &Diagram) -> Diagram {
        Diagram { rows: diagram.rows.iter().rev().map(|r| self.mirror_row(r)).collect() }
    }

    /// Fixed pseudo-layouts are returned unchanged.
    pub fn mirror_area(&self, area: &Area) -> Area {
        if area.fixed {
            return area.clone();
        }
        Area::new(&area.name, false, self.mirror(&area.diagram))
    }

    /// Mirror every area of the graph. The topology is shared by name and
    /// carries over untouched.
    pub fn mirror_graph(&self, graph: &TrackGraph) -> TrackGraph {
        TrackGraph {
            areas: graph.areas.iter().map(|a| self.mirror_area(a)).collect(),
            topology: graph.topology.clone(),
            known_signals: graph.known_signals.clone(),
        }
    }
}
