use log::{info, warn};

use crate::input::feed::TrainId;
use crate::input::layout::SignalName;

/// Conditions noticed during a cycle. All of them are recovered from
/// locally and reported; none of them stops the cycle.
#[derive(Debug, Fail, Clone, PartialEq)]
pub enum Diagnostic {
    #[fail(display = "train {} could not be placed at any signal", _0)]
    UnresolvedTrain(TrainId),
    #[fail(display = "train {} lost track of signal {} ({} from it when last seen)", train, signal, distance)]
    TrackingAnomaly { train: TrainId, signal: SignalName, distance: f64 },
    #[fail(display = "section {} has more than one train on it", _0)]
    DuplicateOccupancy(SignalName),
    #[fail(display = "signal {} is not drawn in any layout", _0)]
    UnknownSignalReference(SignalName),
}

/// Everything reported during one processing cycle.
#[derive(Debug, Default, Clone)]
pub struct CycleReport {
    pub diagnostics: Vec<Diagnostic>,
}

impl CycleReport {
    pub fn push(&mut self, d: Diagnostic) {
        self.diagnostics.push(d);
    }

    pub fn extend<I: IntoIterator<Item = Diagnostic>>(&mut self, ds: I) {
        self.diagnostics.extend(ds);
    }

    pub fn unresolved(&self) -> Vec<&str> {
        self.diagnostics.iter().filter_map(|d| match d {
            Diagnostic::UnresolvedTrain(t) => Some(t.as_str()),
            _ => None,
        }).collect()
    }

    pub fn duplicates(&self) -> Vec<&str> {
        self.diagnostics.iter().filter_map(|d| match d {
            Diagnostic::DuplicateOccupancy(s) => Some(s.as_str()),
            _ => None,
        }).collect()
    }

    pub fn anomalies(&self) -> usize {
        self.diagnostics.iter().filter(|d| match d {
            Diagnostic::TrackingAnomaly { .. } => true,
            _ => false,
        }).count()
    }

    pub fn unknown_signals(&self) -> Vec<&str> {
        self.diagnostics.iter().filter_map(|d| match d {
            Diagnostic::UnknownSignalReference(s) => Some(s.as_str()),
            _ => None,
        }).collect()
    }

    /// Log the listings that are reported once per cycle. Anomalies and
    /// unknown signals are logged where they are found.
    pub fn log_summary(&self) {
        let unresolved = self.unresolved();
        if !unresolved.is_empty() {
            info!("Trains not found: {}", unresolved.join(", "));
        }
        let duplicates = self.duplicates();
        if !duplicates.is_empty() {
            warn!("Some sections have more than one train on them: {}", duplicates.join(", "));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listings() {
        let mut r = CycleReport::default();
        r.push(Diagnostic::UnresolvedTrain("1".to_string()));
        r.push(Diagnostic::DuplicateOccupancy("X".to_string()));
        r.push(Diagnostic::TrackingAnomaly { train: "2".to_string(), signal: "S".to_string(), distance: 900.0 });
        r.push(Diagnostic::UnresolvedTrain("3".to_string()));
        assert_eq!(r.unresolved(), vec!["1", "3"]);
        assert_eq!(r.duplicates(), vec!["X"]);
        assert_eq!(r.anomalies(), 1);
        assert!(r.unknown_signals().is_empty());
        assert_eq!(format!("{}", r.diagnostics[1]), "section X has more than one train on it");
    }
}
