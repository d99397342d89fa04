//! Train telemetry: placing every train at a section once per cycle.

pub mod record;
pub mod snapshot;
pub mod inference;
pub mod occupancy;
pub mod cycle;
