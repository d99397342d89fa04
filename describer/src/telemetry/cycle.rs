use log::debug;

use super::inference::{EngineConfig, InferenceEngine};
use super::occupancy::{dedupe, Occupancy};
use super::record::TrainRecord;
use super::snapshot::SnapshotStore;
use crate::diagram::orientation::LayoutState;
use crate::input::feed::RawTrain;
use crate::input::layout::TrackGraph;
use crate::output::diagnostics::CycleReport;
use crate::output::frame::Presenter;
use crate::output::trail::SignalTrail;

/// Outcome of the feed fetch when a tick fires.
#[derive(Debug)]
pub enum Fetch {
    /// The fetch has not completed; the tick is skipped.
    Pending,
    Ready(Vec<RawTrain>),
}

#[derive(Debug)]
pub struct Cycle {
    /// Every resolved record, closed track included.
    pub records: Vec<TrainRecord>,
    pub occupancy: Occupancy,
    pub report: CycleReport,
}

/// Runs processing cycles one at a time: inference against the previous
/// snapshot, then deduplication, then the snapshot is replaced.
pub struct Describer {
    engine: InferenceEngine,
    snapshot: SnapshotStore,
    layout: LayoutState,
    trail: Option<SignalTrail>,
    shown: Vec<TrainRecord>,
    cycles: usize,
    skipped: usize,
}

impl Describer {
    pub fn new(layout: LayoutState, config: EngineConfig) -> Describer {
        Describer {
            engine: InferenceEngine::new(config),
            snapshot: SnapshotStore::new(),
            layout,
            trail: None,
            shown: Vec::new(),
            cycles: 0,
            skipped: 0,
        }
    }

    pub fn with_trail(mut self) -> Describer {
        self.trail = Some(SignalTrail::new());
        self
    }

    pub fn graph(&self) -> &TrackGraph {
        self.layout.graph()
    }

    pub fn snapshot(&self) -> &SnapshotStore {
        &self.snapshot
    }

    pub fn trail(&self) -> Option<&SignalTrail> {
        self.trail.as_ref()
    }

    pub fn cycles(&self) -> usize {
        self.cycles
    }

    pub fn skipped_ticks(&self) -> usize {
        self.skipped
    }

    /// Change orientation. The new graph is in place before the next cycle
    /// reads it.
    pub fn set_mirrored(&mut self, mirrored: bool) -> bool {
        self.layout.set_mirrored(mirrored)
    }

    pub fn tick(&mut self, fetch: Fetch) -> Option<Cycle> {
        match fetch {
            Fetch::Pending => {
                self.skipped += 1;
                debug!("Feed not ready, skipping tick ({} skipped so far)", self.skipped);
                None
            }
            Fetch::Ready(batch) => Some(self.run_cycle(&batch)),
        }
    }

    pub fn run_cycle(&mut self, batch: &[RawTrain]) -> Cycle {
        debug!("Cycle {}: {} trains from feed", self.cycles, batch.len());
        let resolution = self.engine.resolve(batch, &self.snapshot, self.layout.graph());
        let occupancy = dedupe(&resolution.records);

        let mut report = CycleReport::default();
        report.extend(resolution.diagnostics);
        report.extend(occupancy.diagnostics());
        report.log_summary();

        if let Some(ref mut trail) = self.trail {
            trail.record(&resolution.records);
        }

        self.snapshot.replace(resolution.records.iter()
                              .filter(|r| !r.is_closed_track())
                              .cloned()
                              .collect());
        self.shown = occupancy.kept.clone();
        self.cycles += 1;

        Cycle { records: resolution.records, occupancy, report }
    }

    /// Draw the trains of the last cycle on the named area. Returns false
    /// if there is no such area.
    pub fn present<P: Presenter>(&self, area: &str, presenter: &mut P) -> bool {
        match self.layout.graph().area(area) {
            Some(a) => {
                presenter.present(a, &self.shown);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::layout::{Area, Diagram, Topology};
    use crate::output::frame::TextFrame;
    use crate::telemetry::record::Provenance;

    fn describer() -> Describer {
        let mut topology = Topology::default();
        topology.declare_fallback("B", &["A"]);
        topology.closed_track_signals = vec!["C".to_string()];
        let graph = TrackGraph {
            areas: vec![Area::new("Line", false,
                                  Diagram::from_lines(vec!["─{──────{──────{─────'A'B'C"]))],
            topology,
            ..TrackGraph::default()
        };
        Describer::new(LayoutState::new(graph, false).unwrap(), EngineConfig::default()).with_trail()
    }

    fn raw(id: &str, signal: Option<&str>, distance: f64) -> RawTrain {
        RawTrain {
            train_id: id.to_string(),
            reported_signal: signal.map(|s| s.to_string()),
            distance_to_signal: Some(distance),
            signal_speed: None,
            velocity: 100.0,
            position: Some((0.0, 0.0)),
        }
    }

    #[test]
    fn pending_fetch_skips_tick() {
        let mut d = describer();
        assert!(d.tick(Fetch::Pending).is_none());
        assert_eq!(d.skipped_ticks(), 1);
        assert_eq!(d.cycles(), 0);
        assert!(d.snapshot().is_empty());
        assert!(d.tick(Fetch::Ready(vec![raw("1", Some("A"), 50.0)])).is_some());
        assert_eq!(d.cycles(), 1);
    }

    #[test]
    fn history_flows_between_cycles() {
        let mut d = describer();
        let c = d.run_cycle(&[raw("1", Some("A"), 50.0), raw("2", Some("B"), 300.0)]);
        assert_eq!(c.records.len(), 3);
        assert_eq!(d.snapshot().records().len(), 2);

        let c = d.run_cycle(&[raw("1", None, 0.0), raw("2", Some("B"), 250.0)]);
        let moved = c.records.iter().find(|r| r.train_id == "1").unwrap();
        assert_eq!(moved.signal_name(), Some("B"));
        assert_eq!(moved.provenance(), Some(Provenance::AdjacencyFallback));
        // The live train is nearer than the inferred one.
        let kept: Vec<&str> = c.occupancy.kept.iter().map(|r| r.train_id.as_str()).collect();
        assert_eq!(kept, vec!["2", "00000"]);
        assert_eq!(c.report.duplicates(), vec!["B"]);
        assert_eq!(d.trail().unwrap().get("1").unwrap(), &["A".to_string(), "B".to_string()][..]);
    }

    #[test]
    fn presents_last_cycle_in_either_orientation() {
        let mut d = describer();
        d.run_cycle(&[raw("7", Some("A"), 50.0)]);
        let mut frame = TextFrame::new(false);
        assert!(d.present("Line", &mut frame));
        assert_eq!(frame.lines(), vec!["─     7──────── 00000".to_string()]);
        assert!(d.set_mirrored(true));
        assert!(d.present("Line", &mut frame));
        assert_eq!(frame.lines(), vec![" 00000────────     7─".to_string()]);
        assert!(!d.present("Nowhere", &mut frame));
    }
}
