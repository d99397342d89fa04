use serde::Deserialize;

pub type TrainId = String;

/// Latitude/longitude pair. Treated as planar coordinates when matching
/// against track segments.
pub type GeoPoint = (f64, f64);

/// One train as reported by the simulation feed in a single poll.
#[derive(Clone, Debug, PartialEq)]
pub struct RawTrain {
    pub train_id: TrainId,
    /// `None` when the feed does not know which signal is in front.
    pub reported_signal: Option<String>,
    /// `None` when the feed sent no distance, which is not the same as
    /// standing at the signal.
    pub distance_to_signal: Option<f64>,
    pub signal_speed: Option<f64>,
    pub velocity: f64,
    /// `None` unless the feed sent both coordinates.
    pub position: Option<GeoPoint>,
}

#[derive(Deserialize)]
struct FeedResponse {
    data: Vec<FeedTrain>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct FeedTrain {
    train_no_local: String,
    train_data: FeedTrainData,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct FeedTrainData {
    #[serde(default)]
    signal_in_front: Option<String>,
    #[serde(default)]
    distance_to_signal_in_front: Option<f64>,
    #[serde(default)]
    signal_in_front_speed: Option<f64>,
    #[serde(default)]
    velocity: Option<f64>,
    // Field names as spelled by the feed.
    #[serde(rename = "Latititute", default)]
    latitude: Option<f64>,
    #[serde(rename = "Longitute", default)]
    longitude: Option<f64>,
}

/// The feed reports the signal in front as `NAME@extra`; only the name is
/// kept. An empty name counts as no signal.
pub fn signal_name(reported: &str) -> Option<String> {
    let name = reported.split('@').next().unwrap_or("");
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Decode one poll of the train feed.
pub fn parse_feed(json: &str) -> Result<Vec<RawTrain>, serde_json::Error> {
    let response: FeedResponse = serde_json::from_str(json)?;
    Ok(response
        .data
        .into_iter()
        .map(|t| RawTrain {
            train_id: t.train_no_local,
            reported_signal: t.train_data.signal_in_front.as_ref().and_then(|s| signal_name(s)),
            distance_to_signal: t.train_data.distance_to_signal_in_front,
            signal_speed: t.train_data.signal_in_front_speed,
            velocity: t.train_data.velocity.unwrap_or(0.0),
            position: match (t.train_data.latitude, t.train_data.longitude) {
                (Some(lat), Some(long)) => Some((lat, long)),
                _ => None,
            },
        })
        .collect())
}
