use log::debug;

use super::mirror::DiagramMirror;
use crate::input::layout::TrackGraph;

/// Owner of the "mirrored" setting and the graph currently in use.
///
/// The graph as loaded is kept aside, and the active graph is derived from
/// it whenever the setting actually changes.
pub struct LayoutState {
    loaded: TrackGraph,
    active: TrackGraph,
    mirrored: bool,
    mirror: DiagramMirror,
}

impl LayoutState {
    pub fn new(graph: TrackGraph, mirrored: bool) -> Result<LayoutState, regex::Error> {
        let mut state = LayoutState {
            active: graph.clone(),
            loaded: graph,
            mirrored: false,
            mirror: DiagramMirror::new()?,
        };
        state.set_mirrored(mirrored);
        Ok(state)
    }

    pub fn graph(&self) -> &TrackGraph {
        &self.active
    }

    /// Returns true if the active graph was rebuilt.
    pub fn set_mirrored(&mut self, mirrored: bool) -> bool {
        if mirrored == self.mirrored {
            return false;
        }
        debug!("Switching layout orientation, mirrored={}", mirrored);
        self.active = if mirrored {
            self.mirror.mirror_graph(&self.loaded)
        } else {
            self.loaded.clone()
        };
        self.mirrored = mirrored;
        true
    }
}
