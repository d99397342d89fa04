use ordered_float::OrderedFloat;

use crate::input::feed::{GeoPoint, RawTrain, TrainId};
use crate::input::layout::SignalName;

/// Id given to the synthetic trains that mark closed track.
pub const CLOSED_TRACK_ID: &str = "00000";

/// How a train's section was determined.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Provenance {
    Live,
    HistoryCarryOver,
    AdjacencyFallback,
    GeometricMatch,
    SinkCarryOver,
    ClosedTrack,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SignalRef {
    pub name: SignalName,
    pub provenance: Provenance,
}

/// Distance from a train to the signal in front.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Distance {
    Measured(f64),
    /// The section was assigned by inference and no distance is known.
    BeyondRange,
}

impl Distance {
    /// A distance as sent by the feed. A missing value is never taken for
    /// zero.
    pub fn reported(distance: Option<f64>) -> Distance {
        match distance {
            Some(d) => Distance::Measured(d),
            None => Distance::BeyondRange,
        }
    }

    /// Ordering key, nearest first. Unmeasured distances sort last.
    pub fn key(&self) -> OrderedFloat<f64> {
        match *self {
            Distance::Measured(d) => OrderedFloat(d),
            Distance::BeyondRange => OrderedFloat(std::f64::INFINITY),
        }
    }

    pub fn measured(&self) -> Option<f64> {
        match *self {
            Distance::Measured(d) => Some(d),
            Distance::BeyondRange => None,
        }
    }
}

/// Speed limit class of the signal in front, as shown behind the train
/// number.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SpeedBand {
    /// Nothing to show, the signal in front is out of reach.
    Normal,
    Green,
    Yellow,
    Orange,
    Red,
}

impl SpeedBand {
    pub fn classify(signal_speed: Option<f64>, distance: Distance) -> SpeedBand {
        match distance.measured() {
            Some(d) if d != 0.0 => {}
            _ => return SpeedBand::Normal,
        }
        // No limit reported means the line speed applies.
        let speed = signal_speed.unwrap_or(std::f64::INFINITY);
        if speed > 250.0 {
            SpeedBand::Green
        } else if speed > 99.0 {
            SpeedBand::Yellow
        } else if speed > 39.0 {
            SpeedBand::Orange
        } else {
            SpeedBand::Red
        }
    }

    pub fn label(self) -> Option<&'static str> {
        match self {
            SpeedBand::Normal => None,
            SpeedBand::Green => Some("grn"),
            SpeedBand::Yellow => Some("yel"),
            SpeedBand::Orange => Some("org"),
            SpeedBand::Red => Some("red"),
        }
    }
}

/// Tracking state of a single train between two cycles.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TrackingState {
    /// The feed reported the signal in front.
    Live,
    /// The section was inferred.
    Carried,
    Unresolved,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TrainRecord {
    pub train_id: TrainId,
    pub signal: Option<SignalRef>,
    pub distance: Distance,
    pub signal_speed: Option<f64>,
    pub velocity: f64,
    pub position: Option<GeoPoint>,
}

impl TrainRecord {
    /// A record for a raw train with nothing resolved yet.
    pub fn unresolved(raw: &RawTrain) -> TrainRecord {
        TrainRecord {
            train_id: raw.train_id.clone(),
            signal: None,
            distance: Distance::reported(raw.distance_to_signal),
            signal_speed: raw.signal_speed,
            velocity: raw.velocity,
            position: raw.position,
        }
    }

    pub fn closed_track(signal: &str) -> TrainRecord {
        TrainRecord {
            train_id: CLOSED_TRACK_ID.to_string(),
            signal: Some(SignalRef { name: signal.to_string(), provenance: Provenance::ClosedTrack }),
            distance: Distance::Measured(0.0),
            signal_speed: None,
            velocity: 0.0,
            position: None,
        }
    }

    pub fn assign(&mut self, name: &str, provenance: Provenance, distance: Distance) {
        self.signal = Some(SignalRef { name: name.to_string(), provenance });
        self.distance = distance;
    }

    pub fn signal_name(&self) -> Option<&str> {
        self.signal.as_ref().map(|s| s.name.as_str())
    }

    pub fn provenance(&self) -> Option<Provenance> {
        self.signal.as_ref().map(|s| s.provenance)
    }

    pub fn is_closed_track(&self) -> bool {
        self.provenance() == Some(Provenance::ClosedTrack)
    }

    pub fn speed_band(&self) -> SpeedBand {
        if self.is_closed_track() {
            return SpeedBand::Normal;
        }
        SpeedBand::classify(self.signal_speed, self.distance)
    }

    pub fn state(&self) -> TrackingState {
        match self.provenance() {
            None => TrackingState::Unresolved,
            Some(Provenance::Live) => TrackingState::Live,
            Some(_) => TrackingState::Carried,
        }
    }
}
