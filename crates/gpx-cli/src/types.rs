use serde::Serialize;

/// Counts and header fields shown by `gpx-reader summary`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DocumentSummary {
    pub version: String,
    pub creator: Option<String>,
    pub name: Option<String>,
    pub time: Option<String>,
    pub waypoints: usize,
    pub routes: usize,
    pub route_points: usize,
    pub tracks: usize,
    pub track_segments: usize,
    pub track_points: usize,
}
