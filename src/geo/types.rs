use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlaceBounds {
    pub southwest: Coordinate,
    pub northeast: Coordinate,
}

/// A normalized geocoding candidate, provider-agnostic. Confidence is on a
/// 0-100 integer scale regardless of what the provider reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    pub address: String,
    pub place_id: String,
    pub provider: String,
    pub latitude: f64,
    pub longitude: f64,
    pub bounds: Option<PlaceBounds>,
    pub confidence: Option<i64>,
}
