use std::time::Duration;

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use crate::geo::mapbox::SearchOptions;
use crate::geo::{Coordinate, MapboxClient, SearchGate};

const QUIET_INTERVAL: Duration = Duration::from_millis(250);

/// Shared geocoding state: the provider client (absent when no token is
/// configured) and the latest-wins gate for in-flight searches.
pub struct GeoState {
    pub client: Option<MapboxClient>,
    pub gate: SearchGate,
}

impl GeoState {
    pub fn from_env() -> GeoState {
        GeoState {
            client: MapboxClient::from_env(),
            gate: SearchGate::new(),
        }
    }
}

#[derive(Deserialize)]
pub struct LocationQuery {
    #[serde(default)]
    pub q: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

/// GET /jar/{id}/locations?q=...
/// Proxied location search for the suggest form. Rapid queries supersede each
/// other; a superseded query answers 204 and its result is never sent.
pub async fn search(
    geo: web::Data<GeoState>,
    query: web::Query<LocationQuery>,
) -> HttpResponse {
    let Some(client) = &geo.client else {
        return HttpResponse::Ok().json(json!({ "enabled": false, "places": [] }));
    };

    let ticket = geo.gate.begin();
    if !ticket.wait_quiet(QUIET_INTERVAL).await {
        return HttpResponse::NoContent().finish();
    }

    let proximity = match (query.lat, query.lng) {
        (Some(latitude), Some(longitude)) => Some(Coordinate {
            latitude,
            longitude,
        }),
        _ => None,
    };
    let options = SearchOptions {
        proximity,
        limit: None,
    };

    let places = match client.search(&query.q, options).await {
        Ok(places) => places,
        Err(e) => {
            log::warn!("Location search failed: {e}");
            return HttpResponse::BadGateway()
                .json(json!({ "error": "Location search is unavailable right now" }));
        }
    };

    // The query may have been superseded while the lookup was in flight.
    if !ticket.is_current() {
        return HttpResponse::NoContent().finish();
    }

    HttpResponse::Ok().json(json!({ "enabled": true, "places": places }))
}
