use std::fmt;

use crate::diagram::coordinates::{LEADING_ANCHOR, TRAILING_ANCHOR};
use crate::input::layout::{Area, Orientation};
use crate::input::feed::TrainId;
use crate::telemetry::record::{SpeedBand, TrainRecord};

pub const TRAIN_BOX_WIDTH: usize = 6;
pub const SPEED_BOX_WIDTH: usize = 3;
const TRACK: char = '─';

/// Receives the trains to draw after every cycle.
pub trait Presenter {
    fn present(&mut self, area: &Area, trains: &[TrainRecord]);
}

/// A character grid rendering of one area, with train numbers written over
/// the track at their signals.
///
/// A grid has no colours, so the speed band of the signal in front of each
/// train is listed below the grid instead.
pub struct TextFrame {
    show_speed: bool,
    show_signal_speed: bool,
    grid: Vec<Vec<char>>,
    bands: Vec<(TrainId, SpeedBand)>,
}

impl TextFrame {
    pub fn new(show_speed: bool) -> TextFrame {
        TextFrame { show_speed, show_signal_speed: false, grid: Vec::new(), bands: Vec::new() }
    }

    pub fn with_signal_speed(mut self) -> TextFrame {
        self.show_signal_speed = true;
        self
    }

    pub fn lines(&self) -> Vec<String> {
        self.grid.iter().map(|r| r.iter().collect()).collect()
    }

    /// Trains drawn in the last frame whose signal in front has a speed
    /// band to show, in drawing order.
    pub fn bands(&self) -> &[(TrainId, SpeedBand)] {
        &self.bands
    }

    /// Write `text` right-aligned into a blank box `width` cells wide.
    fn put_box(&mut self, x: i32, y: i32, text: &str, width: usize) {
        let len = text.chars().count();
        let pad = width.saturating_sub(len);
        let cells = std::iter::repeat(' ').take(pad).chain(text.chars());
        for (i, c) in cells.enumerate() {
            self.put(x + i as i32, y, c);
        }
    }

    fn put(&mut self, x: i32, y: i32, c: char) {
        if x < 0 || y < 0 || y as usize >= self.grid.len() {
            return;
        }
        let row = &mut self.grid[y as usize];
        let x = x as usize;
        if row.len() <= x {
            row.resize(x + 1, ' ');
        }
        row[x] = c;
    }
}

impl Presenter for TextFrame {
    fn present(&mut self, area: &Area, trains: &[TrainRecord]) {
        self.grid = area.diagram.rows.iter()
            .map(|r| r.cells.chars()
                 .map(|c| if c == LEADING_ANCHOR || c == TRAILING_ANCHOR { TRACK } else { c })
                 .collect())
            .collect();
        self.bands.clear();
        if area.fixed {
            return;
        }
        for train in trains {
            let coord = match train.signal_name().and_then(|s| area.coordinates.get(s)) {
                Some(c) => *c,
                None => continue,
            };
            self.put_box(coord.x, coord.y, &train.train_id, TRAIN_BOX_WIDTH);
            if self.show_signal_speed {
                let band = train.speed_band();
                if band != SpeedBand::Normal {
                    self.bands.push((train.train_id.clone(), band));
                }
            }
            if self.show_speed && !train.is_closed_track() {
                let x = match coord.orientation {
                    Orientation::Trailing => coord.x + 4,
                    Orientation::Leading => coord.x - 1,
                };
                self.put_box(x, coord.y - 1, &format!("{:.0}", train.velocity), SPEED_BOX_WIDTH);
            }
        }
    }
}

impl fmt::Display for TextFrame {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for line in self.lines() {
            writeln!(f, "{}", line)?;
        }
        for (train, band) in &self.bands {
            if let Some(label) = band.label() {
                writeln!(f, "{} {}", train, label)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::layout::Diagram;
    use crate::telemetry::record::{Distance, Provenance};

    fn train(id: &str, signal: &str, velocity: f64) -> TrainRecord {
        let mut r = TrainRecord::closed_track(signal);
        r.train_id = id.to_string();
        r.velocity = velocity;
        r.assign(signal, Provenance::Live, Distance::Measured(10.0));
        r
    }

    fn area() -> Area {
        Area::new("Line", false, Diagram::from_lines(vec![
            "                  ",
            "─{──────────────}─'A'B",
        ]))
    }

    #[test]
    fn draws_train_numbers() {
        let mut frame = TextFrame::new(false);
        frame.present(&area(), &[train("4521", "A", 80.0), train("123456", "B", 20.0), train("9", "Q", 1.0)]);
        assert_eq!(frame.lines(), vec![
            "                  ".to_string(),
            "─  4521────123456─".to_string(),
        ]);
    }

    #[test]
    fn draws_speed_boxes() {
        let mut frame = TextFrame::new(true);
        frame.present(&area(), &[train("1", "A", 87.4), train("2", "B", 5.0)]);
        assert_eq!(frame.lines()[0], " 87              5");
        assert_eq!(frame.lines()[1], "─     1────     2─");
        let closed = TrainRecord::closed_track("B");
        frame.present(&area(), &[closed]);
        assert_eq!(frame.lines()[0], "                  ");
        assert_eq!(frame.lines()[1], "─────────── 00000─");
    }

    #[test]
    fn lists_signal_speed_bands() {
        let mut fast = train("1", "A", 80.0);
        fast.signal_speed = Some(160.0);
        let mut slow = train("2", "B", 30.0);
        slow.signal_speed = Some(40.0);
        let mut out_of_reach = train("3", "A", 30.0);
        out_of_reach.signal_speed = Some(20.0);
        out_of_reach.distance = Distance::Measured(0.0);

        let mut frame = TextFrame::new(false);
        frame.present(&area(), &[fast.clone(), slow.clone()]);
        assert!(frame.bands().is_empty());

        let mut frame = TextFrame::new(false).with_signal_speed();
        frame.present(&area(), &[fast, slow, out_of_reach, TrainRecord::closed_track("B")]);
        assert_eq!(frame.bands(), &[("1".to_string(), SpeedBand::Yellow),
                                    ("2".to_string(), SpeedBand::Orange)][..]);
        assert!(frame.to_string().ends_with("\n1 yel\n2 org\n"));
    }

    #[test]
    fn fixed_area_has_no_trains() {
        let mut frame = TextFrame::new(false);
        let settings = Area::new("Settings", true, Diagram::from_lines(vec!["SERVER {'A"]));
        frame.present(&settings, &[train("1", "A", 1.0)]);
        assert_eq!(frame.to_string(), "SERVER ─\n");
    }
}
