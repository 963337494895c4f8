use serde::{Deserialize, Serialize};

use crate::auth::validate::{validate_optional, validate_required};

#[derive(Debug, Clone, Serialize)]
pub struct Suggestion {
    pub id: String,
    pub jar_id: String,
    pub member_id: String,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub place: Option<StructuredLocation>,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Provider-sourced location attached to a suggestion. Coordinates are always
/// present; everything else is optional metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredLocation {
    pub name: Option<String>,
    pub address: Option<String>,
    pub place_id: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub bounds: Option<Bounds>,
    pub geo_source: Option<String>,
    pub location_confidence: Option<i64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Bounds {
    pub sw_lat: f64,
    pub sw_lng: f64,
    pub ne_lat: f64,
    pub ne_lng: f64,
}

/// Raw suggest-form input. Structured fields arrive as strings filled in by
/// the location picker and are validated together.
#[derive(Debug, Default, Deserialize)]
pub struct SuggestionForm {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub place_name: String,
    #[serde(default)]
    pub place_address: String,
    #[serde(default)]
    pub place_id: String,
    #[serde(default)]
    pub latitude: String,
    #[serde(default)]
    pub longitude: String,
    #[serde(default)]
    pub bounds_sw_lat: String,
    #[serde(default)]
    pub bounds_sw_lng: String,
    #[serde(default)]
    pub bounds_ne_lat: String,
    #[serde(default)]
    pub bounds_ne_lng: String,
    #[serde(default)]
    pub geo_source: String,
    #[serde(default)]
    pub location_confidence: String,
    pub csrf_token: String,
}

impl SuggestionForm {
    /// Validate all fields, returning inline error messages. An empty vec
    /// means `to_input` will succeed.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if let Some(e) = validate_required(&self.title, "Title", 200) {
            errors.push(e);
        }
        if let Some(e) = validate_optional(&self.description, "Description", 2000) {
            errors.push(e);
        }
        if let Some(e) = validate_optional(&self.location, "Location", 500) {
            errors.push(e);
        }
        if let Err(e) = self.structured_location() {
            errors.push(e);
        }
        errors
    }

    /// Structured-location rules: latitude and longitude must come together,
    /// and any other structured field requires both coordinates.
    pub fn structured_location(&self) -> Result<Option<StructuredLocation>, String> {
        let lat = parse_coord(&self.latitude, "Latitude")?;
        let lng = parse_coord(&self.longitude, "Longitude")?;

        let has_extras = !self.place_name.trim().is_empty()
            || !self.place_address.trim().is_empty()
            || !self.place_id.trim().is_empty()
            || !self.geo_source.trim().is_empty()
            || !self.location_confidence.trim().is_empty()
            || self.bounds()?.is_some();

        match (lat, lng) {
            (None, None) => {
                if has_extras {
                    Err("Structured location submissions require latitude and longitude".into())
                } else {
                    Ok(None)
                }
            }
            (Some(_), None) | (None, Some(_)) => {
                Err("Latitude and longitude must be provided together".into())
            }
            (Some(latitude), Some(longitude)) => Ok(Some(StructuredLocation {
                name: opt(&self.place_name),
                address: opt(&self.place_address),
                place_id: opt(&self.place_id),
                latitude,
                longitude,
                bounds: self.bounds()?,
                geo_source: opt(&self.geo_source),
                location_confidence: self.confidence()?,
            })),
        }
    }

    fn bounds(&self) -> Result<Option<Bounds>, String> {
        let fields = [
            &self.bounds_sw_lat,
            &self.bounds_sw_lng,
            &self.bounds_ne_lat,
            &self.bounds_ne_lng,
        ];
        if fields.iter().all(|f| f.trim().is_empty()) {
            return Ok(None);
        }
        let mut parsed = [0.0f64; 4];
        for (i, field) in fields.iter().enumerate() {
            parsed[i] = field
                .trim()
                .parse()
                .map_err(|_| "Map bounds must be four numbers".to_string())?;
        }
        Ok(Some(Bounds {
            sw_lat: parsed[0],
            sw_lng: parsed[1],
            ne_lat: parsed[2],
            ne_lng: parsed[3],
        }))
    }

    fn confidence(&self) -> Result<Option<i64>, String> {
        let trimmed = self.location_confidence.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        let value: i64 = trimmed
            .parse()
            .map_err(|_| "Location confidence must be a number".to_string())?;
        Ok(Some(value.clamp(0, 100)))
    }
}

fn parse_coord(raw: &str, name: &str) -> Result<Option<f64>, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<f64>()
        .map(Some)
        .map_err(|_| format!("{name} must be a number"))
}

fn opt(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Validated suggestion input ready for insertion.
#[derive(Debug, Clone)]
pub struct NewSuggestion {
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub place: Option<StructuredLocation>,
}

impl SuggestionForm {
    /// Convert to insertable input. Call only after `validate` returned empty.
    pub fn to_input(&self) -> Result<NewSuggestion, String> {
        Ok(NewSuggestion {
            title: self.title.trim().to_string(),
            description: opt(&self.description),
            location: opt(&self.location),
            place: self.structured_location()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(title: &str) -> SuggestionForm {
        SuggestionForm {
            title: title.to_string(),
            csrf_token: "t".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn title_is_required() {
        assert!(!form("  ").validate().is_empty());
        assert!(form("Ramen at Sansotei").validate().is_empty());
    }

    #[test]
    fn coordinates_must_come_together() {
        let mut f = form("Park picnic");
        f.latitude = "43.65".into();
        assert!(!f.validate().is_empty());
        f.longitude = "-79.38".into();
        assert!(f.validate().is_empty());
        let place = f.structured_location().unwrap().unwrap();
        assert_eq!(place.latitude, 43.65);
    }

    #[test]
    fn extras_require_coordinates() {
        let mut f = form("Museum");
        f.geo_source = "mapbox".into();
        assert!(!f.validate().is_empty());
        f.latitude = "43.66".into();
        f.longitude = "-79.39".into();
        assert!(f.validate().is_empty());
    }

    #[test]
    fn confidence_is_clamped() {
        let mut f = form("Cafe");
        f.latitude = "1".into();
        f.longitude = "2".into();
        f.location_confidence = "250".into();
        let place = f.structured_location().unwrap().unwrap();
        assert_eq!(place.location_confidence, Some(100));
    }
}
