//! Placing trains that the feed reports without a signal in front.
//!
//! The feed sometimes loses track of the signal a train is approaching.
//! Such trains are placed from what was known about them one cycle earlier,
//! from the declared successors of the signal they were last seen at, or,
//! as a last resort, from their position relative to surveyed stretches of
//! track. A train last seen close to a signal that is neither a sink nor has
//! a declared successor keeps that signal instead of being dropped as
//! unresolved.
//!
//! Inferred records carry no distance. The distance measured before the
//! feed lost the signal is only used to pick the rule, once.

use log::{debug, info, warn};
use std::collections::HashSet;

use super::record::*;
use super::snapshot::SnapshotStore;
use crate::input::feed::{GeoPoint, RawTrain};
use crate::input::layout::{Segment, SignalName, TrackGraph};
use crate::output::diagnostics::Diagnostic;

#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// A train last seen further than this from its signal is assumed not
    /// to have reached it yet.
    pub carry_over_threshold: f64,
    /// Allowed difference between `|AC| + |CB|` and `|AB|` after rounding.
    pub geometric_epsilon: f64,
    pub geometric_decimals: i32,
}

impl Default for EngineConfig {
    fn default() -> EngineConfig {
        EngineConfig {
            carry_over_threshold: 500.0,
            geometric_epsilon: 0.0,
            geometric_decimals: 6,
        }
    }
}

#[derive(Debug, Default)]
pub struct Resolution {
    pub records: Vec<TrainRecord>,
    pub diagnostics: Vec<Diagnostic>,
}

fn distance(a: GeoPoint, b: GeoPoint) -> f64 {
    ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt()
}

fn round_to(x: f64, decimals: i32) -> f64 {
    let f = 10f64.powi(decimals);
    (x * f).round() / f
}

/// True if `c` lies between the segment's end points, i.e. the detour
/// `|AC| + |CB|` equals `|AB|` once both are rounded.
pub fn on_segment(c: GeoPoint, seg: &Segment, decimals: i32, epsilon: f64) -> bool {
    let ab = round_to(distance(seg.a, seg.b), decimals);
    let acb = round_to(distance(seg.a, c) + distance(c, seg.b), decimals);
    (acb - ab).abs() <= epsilon
}

pub struct InferenceEngine {
    config: EngineConfig,
    reported_unknown: HashSet<SignalName>,
}

impl InferenceEngine {
    pub fn new(config: EngineConfig) -> InferenceEngine {
        InferenceEngine { config, reported_unknown: HashSet::new() }
    }

    pub fn resolve(&mut self, batch: &[RawTrain], previous: &SnapshotStore, graph: &TrackGraph) -> Resolution {
        let mut res = Resolution::default();
        for raw in batch {
            let mut record = TrainRecord::unresolved(raw);
            match raw.reported_signal {
                Some(ref name) if graph.contains_signal(name) => {
                    record.assign(name, Provenance::Live, Distance::reported(raw.distance_to_signal));
                }
                Some(ref name) => self.report_unknown(name, &mut res.diagnostics),
                None => self.infer(&mut record, raw, previous, graph, &mut res.diagnostics),
            }
            if record.state() == TrackingState::Unresolved {
                res.diagnostics.push(Diagnostic::UnresolvedTrain(raw.train_id.clone()));
            }
            res.records.push(record);
        }
        for name in &graph.topology.closed_track_signals {
            res.records.push(TrainRecord::closed_track(name));
        }
        res
    }

    fn report_unknown(&mut self, name: &str, diagnostics: &mut Vec<Diagnostic>) {
        if self.reported_unknown.insert(name.to_string()) {
            warn!("Feed refers to signal {}, which is not drawn in any layout", name);
            diagnostics.push(Diagnostic::UnknownSignalReference(name.to_string()));
        }
    }

    fn infer(&self, record: &mut TrainRecord, raw: &RawTrain, previous: &SnapshotStore,
             graph: &TrackGraph, diagnostics: &mut Vec<Diagnostic>) {
        let last = previous.last_seen(&raw.train_id);

        if let Some(last) = last {
            if let Some((name, provenance, dist)) = self.from_history(last, graph, diagnostics) {
                record.assign(&name, provenance, dist);
                return;
            }
        }

        if let Some(name) = raw.position.and_then(|p| self.match_segment(p, graph)) {
            info!("Train {} located by coordinates, assumed to be heading towards signal {}",
                  raw.train_id, name);
            record.assign(name, Provenance::GeometricMatch, Distance::BeyondRange);
            return;
        }

        // Seen close to a signal without known successors: stay with it.
        if let Some(last) = last {
            if let Some(ref s) = last.signal {
                debug!("Train {} has no known successor after signal {}", raw.train_id, s.name);
                record.assign(&s.name, Provenance::HistoryCarryOver, Distance::BeyondRange);
            }
        }
    }

    fn from_history(&self, last: &TrainRecord, graph: &TrackGraph, diagnostics: &mut Vec<Diagnostic>)
                    -> Option<(SignalName, Provenance, Distance)> {
        let signal = &last.signal.as_ref()?.name;
        match last.distance {
            Distance::BeyondRange => {
                let provenance = match last.provenance() {
                    Some(Provenance::SinkCarryOver) => Provenance::SinkCarryOver,
                    _ => Provenance::HistoryCarryOver,
                };
                Some((signal.clone(), provenance, Distance::BeyondRange))
            }
            Distance::Measured(d) if d > self.config.carry_over_threshold => {
                warn!("Train {} lost track of signal {}", last.train_id, signal);
                diagnostics.push(Diagnostic::TrackingAnomaly {
                    train: last.train_id.clone(),
                    signal: signal.clone(),
                    distance: d,
                });
                Some((signal.clone(), Provenance::HistoryCarryOver, Distance::BeyondRange))
            }
            Distance::Measured(_) => {
                if graph.is_sink(signal) {
                    return Some((signal.clone(), Provenance::SinkCarryOver, Distance::BeyondRange));
                }
                let next = graph.fallback_candidates(signal).first()?;
                info!("Train {} passed signal {}; without further information, \
                       it's assumed to be heading towards signal {}", last.train_id, signal, next);
                Some((next.clone(), Provenance::AdjacencyFallback, Distance::BeyondRange))
            }
        }
    }

    fn match_segment<'a>(&self, position: GeoPoint, graph: &'a TrackGraph) -> Option<&'a str> {
        graph.topology.geometric_segments.iter()
            .find(|(_, seg)| on_segment(position, seg, self.config.geometric_decimals,
                                        self.config.geometric_epsilon))
            .map(|(name, _)| name.as_str())
    }
}
