use std::collections::HashMap;

use crate::input::feed::TrainId;
use crate::input::layout::SignalName;
use crate::telemetry::record::TrainRecord;

/// Signals each train has been placed at, in order, without consecutive
/// repeats. Handy for writing fallback declarations for a layout.
#[derive(Debug, Default)]
pub struct SignalTrail {
    trails: HashMap<TrainId, Vec<SignalName>>,
}

impl SignalTrail {
    pub fn new() -> SignalTrail {
        SignalTrail::default()
    }

    pub fn record(&mut self, records: &[TrainRecord]) {
        for r in records.iter().filter(|r| !r.is_closed_track()) {
            if let Some(name) = r.signal_name() {
                let trail = self.trails.entry(r.train_id.clone()).or_insert_with(Vec::new);
                if trail.last().map(|l| l.as_str()) != Some(name) {
                    trail.push(name.to_string());
                }
            }
        }
    }

    pub fn get(&self, train: &str) -> Option<&[SignalName]> {
        self.trails.get(train).map(|t| &t[..])
    }

    /// One train per line: `trainname signal signal ...`, sorted by train.
    pub fn listing(&self) -> Result<String, failure::Error> {
        use std::fmt::Write;
        let mut trains: Vec<&TrainId> = self.trails.keys().collect();
        trains.sort();
        let mut s = String::new();
        for t in trains {
            writeln!(s, "{} {}", t, self.trails[t].join(" "))?;
        }
        Ok(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::record::{Distance, Provenance};

    fn at(id: &str, signal: &str) -> TrainRecord {
        let mut r = TrainRecord::closed_track(signal);
        r.train_id = id.to_string();
        r.assign(signal, Provenance::Live, Distance::Measured(1.0));
        r
    }

    #[test]
    fn keeps_distinct_consecutive_signals() {
        let mut trail = SignalTrail::new();
        trail.record(&[at("2", "X"), at("1", "A"), TrainRecord::closed_track("K")]);
        trail.record(&[at("1", "A")]);
        trail.record(&[at("1", "B")]);
        trail.record(&[at("1", "A")]);
        assert_eq!(trail.get("1").unwrap(), &["A".to_string(), "B".to_string(), "A".to_string()][..]);
        assert!(trail.get("00000").is_none());
        assert_eq!(trail.listing().unwrap(), "1 A B A\n2 X\n");
    }
}
