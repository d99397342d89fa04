use super::record::TrainRecord;

/// The resolved trains of the previous cycle. Replaced as a whole at the end
/// of every cycle; nothing older is kept.
#[derive(Debug, Default, Clone)]
pub struct SnapshotStore {
    records: Vec<TrainRecord>,
}

impl SnapshotStore {
    pub fn new() -> SnapshotStore {
        SnapshotStore::default()
    }

    pub fn replace(&mut self, records: Vec<TrainRecord>) {
        self.records = records;
    }

    pub fn records(&self) -> &[TrainRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The last record for this train that had a signal assigned.
    pub fn last_seen(&self, train_id: &str) -> Option<&TrainRecord> {
        self.records
            .iter()
            .filter(|r| r.train_id == train_id && r.signal.is_some())
            .last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::record::{Distance, Provenance};

    fn record(id: &str, signal: Option<&str>) -> TrainRecord {
        let mut r = TrainRecord {
            train_id: id.to_string(),
            signal: None,
            distance: Distance::Measured(0.0),
            signal_speed: None,
            velocity: 0.0,
            position: None,
        };
        if let Some(s) = signal {
            r.assign(s, Provenance::Live, Distance::Measured(1.0));
        }
        r
    }

    #[test]
    fn last_seen_skips_unresolved() {
        let mut store = SnapshotStore::new();
        assert!(store.last_seen("1").is_none());
        store.replace(vec![record("1", Some("A")), record("2", Some("B")), record("1", None)]);
        assert_eq!(store.last_seen("1").and_then(|r| r.signal_name()), Some("A"));
        store.replace(vec![record("1", None)]);
        assert!(store.last_seen("1").is_none());
        assert!(store.last_seen("2").is_none());
    }
}
