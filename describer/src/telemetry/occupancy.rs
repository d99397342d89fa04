use std::collections::HashMap;

use super::record::TrainRecord;
use crate::input::layout::SignalName;
use crate::output::diagnostics::Diagnostic;

/// The trains to draw, one per section.
#[derive(Debug, Default)]
pub struct Occupancy {
    pub kept: Vec<TrainRecord>,
    /// Sections that had more than one train, one entry per train dropped.
    pub duplicates: Vec<SignalName>,
}

impl Occupancy {
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.duplicates.iter().cloned().map(Diagnostic::DuplicateOccupancy).collect()
    }
}

/// Keep the nearest train of every section. Only one train can be at the
/// head of a block; on equal distance the one listed first wins. Trains
/// without a section are left out.
pub fn dedupe(records: &[TrainRecord]) -> Occupancy {
    let mut nearest: HashMap<&str, usize> = HashMap::new();
    for (i, r) in records.iter().enumerate() {
        if let Some(name) = r.signal_name() {
            let best = nearest.entry(name).or_insert(i);
            if r.distance.key() < records[*best].distance.key() {
                *best = i;
            }
        }
    }

    let mut occupancy = Occupancy::default();
    for (i, r) in records.iter().enumerate() {
        if let Some(name) = r.signal_name() {
            if nearest.get(name) == Some(&i) {
                occupancy.kept.push(r.clone());
            } else {
                occupancy.duplicates.push(name.to_string());
            }
        }
    }
    occupancy
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::record::{Distance, Provenance};

    fn at(id: &str, signal: Option<&str>, distance: Distance) -> TrainRecord {
        let mut r = TrainRecord {
            train_id: id.to_string(),
            signal: None,
            distance,
            signal_speed: None,
            velocity: 50.0,
            position: None,
        };
        if let Some(s) = signal {
            r.assign(s, Provenance::Live, distance);
        }
        r
    }

    fn ids(o: &Occupancy) -> Vec<&str> {
        o.kept.iter().map(|r| r.train_id.as_str()).collect()
    }

    #[test]
    fn nearest_train_wins() {
        let o = dedupe(&[
            at("far", Some("X"), Distance::Measured(48.0)),
            at("other", Some("Y"), Distance::Measured(100.0)),
            at("near", Some("X"), Distance::Measured(12.0)),
        ]);
        assert_eq!(ids(&o), vec!["other", "near"]);
        assert_eq!(o.duplicates, vec!["X".to_string()]);
        assert_eq!(o.diagnostics(), vec![Diagnostic::DuplicateOccupancy("X".to_string())]);
    }

    #[test]
    fn ties_keep_first() {
        let o = dedupe(&[
            at("a", Some("X"), Distance::Measured(5.0)),
            at("b", Some("X"), Distance::Measured(5.0)),
            at("c", Some("X"), Distance::BeyondRange),
        ]);
        assert_eq!(ids(&o), vec!["a"]);
        assert_eq!(o.duplicates.len(), 2);
    }

    #[test]
    fn unmeasured_loses_to_measured() {
        let o = dedupe(&[
            at("inferred", Some("X"), Distance::BeyondRange),
            at("live", Some("X"), Distance::Measured(900.0)),
        ]);
        assert_eq!(ids(&o), vec!["live"]);
    }

    #[test]
    fn unresolved_are_skipped() {
        let o = dedupe(&[at("lost", None, Distance::Measured(0.0)), at("a", Some("X"), Distance::Measured(1.0))]);
        assert_eq!(ids(&o), vec!["a"]);
        assert!(o.duplicates.is_empty());
    }
}
