use serde::Deserialize;

use super::types::{Coordinate, Place, PlaceBounds};

const DEFAULT_BASE_URL: &str = "https://api.mapbox.com/geocoding/v5/mapbox.places";
const DEFAULT_LIMIT: usize = 5;

#[derive(Debug)]
pub enum GeoError {
    Http(reqwest::Error),
    Upstream(u16, String),
    BadUrl(String),
}

impl std::fmt::Display for GeoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeoError::Http(e) => write!(f, "Geocoding request failed: {e}"),
            GeoError::Upstream(status, body) => {
                write!(f, "Geocoding provider returned {status}: {body}")
            }
            GeoError::BadUrl(detail) => write!(f, "Geocoding URL could not be built: {detail}"),
        }
    }
}

impl From<reqwest::Error> for GeoError {
    fn from(e: reqwest::Error) -> Self {
        GeoError::Http(e)
    }
}

/// Forward-geocoding client for the Mapbox places API. The base URL is
/// overridable so tests can point it at a local fixture server.
#[derive(Debug, Clone)]
pub struct MapboxClient {
    http: reqwest::Client,
    token: String,
    base_url: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SearchOptions {
    pub proximity: Option<Coordinate>,
    pub limit: Option<usize>,
}

// Wire format, trimmed to the fields we normalize.
#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    id: String,
    text: String,
    place_name: String,
    relevance: Option<f64>,
    geometry: Geometry,
    bbox: Option<[f64; 4]>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    coordinates: [f64; 2],
    bbox: Option<[f64; 4]>,
}

impl MapboxClient {
    pub fn new(token: String) -> MapboxClient {
        MapboxClient {
            http: reqwest::Client::new(),
            token,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Build from MAPBOX_TOKEN; None disables the location picker.
    pub fn from_env() -> Option<MapboxClient> {
        match std::env::var("MAPBOX_TOKEN") {
            Ok(token) if !token.trim().is_empty() => Some(MapboxClient::new(token)),
            _ => {
                log::warn!("MAPBOX_TOKEN not set, location search disabled");
                None
            }
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> MapboxClient {
        self.base_url = base_url.into();
        self
    }

    /// The per-query endpoint: the query becomes a single percent-encoded
    /// path segment, `{query}.json`, appended to the base URL.
    fn endpoint_for(&self, query: &str) -> Result<reqwest::Url, GeoError> {
        let mut url =
            reqwest::Url::parse(&self.base_url).map_err(|e| GeoError::BadUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| GeoError::BadUrl("base URL cannot carry a path".to_string()))?
            .push(&format!("{query}.json"));
        Ok(url)
    }

    /// Forward-geocode a free-text query, optionally biased toward a
    /// proximity coordinate. Blank queries short-circuit to no results.
    pub async fn search(
        &self,
        query: &str,
        options: SearchOptions,
    ) -> Result<Vec<Place>, GeoError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let url = self.endpoint_for(query)?;
        let limit = options.limit.unwrap_or(DEFAULT_LIMIT).to_string();
        let mut params = vec![
            ("access_token", self.token.clone()),
            ("autocomplete", "true".to_string()),
            ("limit", limit),
            ("language", "en".to_string()),
        ];
        if let Some(proximity) = options.proximity {
            params.push((
                "proximity",
                format!("{},{}", proximity.longitude, proximity.latitude),
            ));
        }

        let response = self.http.get(url).query(&params).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeoError::Upstream(status.as_u16(), body));
        }

        let collection: FeatureCollection = response.json().await?;
        Ok(collection.features.into_iter().map(normalize_feature).collect())
    }
}

fn normalize_feature(feature: Feature) -> Place {
    let [longitude, latitude] = feature.geometry.coordinates;
    let bbox = feature.bbox.or(feature.geometry.bbox);
    Place {
        name: feature.text,
        address: feature.place_name,
        place_id: feature.id,
        provider: "mapbox".to_string(),
        latitude,
        longitude,
        bounds: bbox.map(bbox_to_bounds),
        confidence: feature.relevance.map(normalize_relevance),
    }
}

/// Mapbox bboxes are [west, south, east, north].
fn bbox_to_bounds(bbox: [f64; 4]) -> PlaceBounds {
    let [west, south, east, north] = bbox;
    PlaceBounds {
        southwest: Coordinate {
            latitude: south,
            longitude: west,
        },
        northeast: Coordinate {
            latitude: north,
            longitude: east,
        },
    }
}

/// Map provider relevance (0.0-1.0) onto the 0-100 integer confidence scale.
fn normalize_relevance(relevance: f64) -> i64 {
    ((relevance * 100.0).round() as i64).clamp(0, 100)
}
