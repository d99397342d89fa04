use smallvec::SmallVec;
use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::diagram::coordinates::scan_area;

pub type SignalName = String;
pub type AreaName = String;

/// Placeholder signal name used to fill anchor slots that carry no signal.
pub const PLACEHOLDER_SIGNAL: &str = "§";

/// Separates the cell string of a row from its anchor slots.
pub const SLOT_SEPARATOR: char = '\'';

/// Separates several signal names sharing one anchor glyph.
pub const NAME_SEPARATOR: char = '%';

/// Which side of the anchor glyph the train label is drawn on.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Orientation {
    /// `{` anchor, label starts at the glyph column.
    Leading,
    /// `}` anchor, label ends at the glyph column.
    Trailing,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Coordinate {
    pub x: i32,
    pub y: i32,
    pub orientation: Orientation,
}

pub type CoordinateTable = HashMap<SignalName, Coordinate>;

/// Signal names anchored at one glyph, in declaration order.
pub type AnchorSlot = SmallVec<[SignalName; 2]>;

/// One diagram row: display cells plus the anchor slots for the `{`/`}`
/// glyphs found in the cells, in left-to-right order.
#[derive(Clone, Debug, PartialEq)]
pub struct Row {
    pub cells: String,
    pub anchors: Vec<AnchorSlot>,
}

impl Row {
    /// Parse the asset encoding `CELLS'SLOT'SLOT`, where a slot is a list
    /// of `%`-separated names.
    pub fn parse(line: &str) -> Row {
        let mut parts = line.split(SLOT_SEPARATOR);
        let cells = parts.next().unwrap_or("").to_string();
        let anchors = parts
            .map(|slot| slot.split(NAME_SEPARATOR).map(|n| n.to_string()).collect())
            .collect();
        Row { cells, anchors }
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let sep = NAME_SEPARATOR.to_string();
        write!(f, "{}", self.cells)?;
        for slot in &self.anchors {
            write!(f, "{}{}", SLOT_SEPARATOR, slot.join(sep.as_str()))?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct Diagram {
    pub rows: Vec<Row>,
}

impl Diagram {
    pub fn from_lines<'a, I: IntoIterator<Item = &'a str>>(lines: I) -> Diagram {
        Diagram { rows: lines.into_iter().map(Row::parse).collect() }
    }
}

/// A drawn area of the network: its diagram and the coordinate table
/// derived from the diagram's anchors.
#[derive(Clone, Debug)]
pub struct Area {
    pub name: AreaName,
    /// Non-physical pseudo-layouts (the settings screen) are never mirrored
    /// and their anchors are not signals.
    pub fixed: bool,
    pub diagram: Diagram,
    pub coordinates: CoordinateTable,
}

impl Area {
    pub fn new(name: &str, fixed: bool, diagram: Diagram) -> Area {
        let coordinates = scan_area(&diagram).coordinates;
        Area { name: name.to_string(), fixed, diagram, coordinates }
    }
}

/// Two GPS reference points bounding a stretch of track, `(lat, long)`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Segment {
    pub a: (f64, f64),
    pub b: (f64, f64),
}

/// Symbolic and geometric knowledge used to place trains that the feed
/// reports without a signal in front.
#[derive(Clone, Debug, Default)]
pub struct Topology {
    /// Passed signal -> candidate signals now being approached, first
    /// candidate preferred.
    pub adjacency_fallback: HashMap<SignalName, SmallVec<[SignalName; 2]>>,
    /// Signals after which trains legitimately leave the feed.
    pub sink_signals: HashSet<SignalName>,
    /// Declaration order is the matching order.
    pub geometric_segments: Vec<(SignalName, Segment)>,
    pub closed_track_signals: Vec<SignalName>,
}

impl Topology {
    /// Declare that a train which vanished after any of `passed` is
    /// assumed to be approaching `target`.
    pub fn declare_fallback(&mut self, target: &str, passed: &[&str]) {
        for p in passed {
            self.adjacency_fallback
                .entry(p.to_string())
                .or_insert_with(SmallVec::new)
                .push(target.to_string());
        }
    }
}

/// The whole track layout: every drawn area plus the shared topology.
#[derive(Clone, Debug, Default)]
pub struct TrackGraph {
    pub areas: Vec<Area>,
    pub topology: Topology,
    /// Signal names the feed is known to report. Empty means unknown.
    pub known_signals: HashSet<SignalName>,
}

impl TrackGraph {
    pub fn area(&self, name: &str) -> Option<&Area> {
        self.areas.iter().find(|a| a.name == name)
    }

    /// True if some physical area draws this signal.
    pub fn contains_signal(&self, name: &str) -> bool {
        self.areas.iter().filter(|a| !a.fixed).any(|a| a.coordinates.contains_key(name))
    }

    pub fn coordinate(&self, area: &str, name: &str) -> Option<&Coordinate> {
        self.area(area).and_then(|a| a.coordinates.get(name))
    }

    pub fn fallback_candidates(&self, passed: &str) -> &[SignalName] {
        self.topology.adjacency_fallback.get(passed).map(|c| &c[..]).unwrap_or(&[])
    }

    pub fn is_sink(&self, name: &str) -> bool {
        self.topology.sink_signals.contains(name)
    }
}
