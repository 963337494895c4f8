use rusqlite::{params, Connection, OptionalExtension};

use super::types::*;
use crate::errors::AppError;
use crate::ids;
use crate::models::{member, now_utc};

fn row_to_suggestion(row: &rusqlite::Row) -> rusqlite::Result<Suggestion> {
    let latitude: Option<f64> = row.get("latitude")?;
    let longitude: Option<f64> = row.get("longitude")?;
    let place = match (latitude, longitude) {
        (Some(latitude), Some(longitude)) => {
            let sw_lat: Option<f64> = row.get("bounds_sw_lat")?;
            let sw_lng: Option<f64> = row.get("bounds_sw_lng")?;
            let ne_lat: Option<f64> = row.get("bounds_ne_lat")?;
            let ne_lng: Option<f64> = row.get("bounds_ne_lng")?;
            let bounds = match (sw_lat, sw_lng, ne_lat, ne_lng) {
                (Some(sw_lat), Some(sw_lng), Some(ne_lat), Some(ne_lng)) => Some(Bounds {
                    sw_lat,
                    sw_lng,
                    ne_lat,
                    ne_lng,
                }),
                _ => None,
            };
            Some(StructuredLocation {
                name: row.get("place_name")?,
                address: row.get("place_address")?,
                place_id: row.get("place_id")?,
                latitude,
                longitude,
                bounds,
                geo_source: row.get("geo_source")?,
                location_confidence: row.get("location_confidence")?,
            })
        }
        _ => None,
    };

    Ok(Suggestion {
        id: row.get("id")?,
        jar_id: row.get("jar_id")?,
        member_id: row.get("member_id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        location: row.get("location")?,
        place,
        is_active: row.get::<_, i64>("is_active")? != 0,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

pub fn create(
    conn: &Connection,
    jar_id: &str,
    member_id: &str,
    input: &NewSuggestion,
) -> Result<Suggestion, AppError> {
    let id = ids::new_id();
    let now = now_utc();
    let place = input.place.as_ref();
    let bounds = place.and_then(|p| p.bounds);
    conn.execute(
        "INSERT INTO suggestions (id, jar_id, member_id, title, description, location, \
                                  place_name, place_address, place_id, latitude, longitude, \
                                  bounds_sw_lat, bounds_sw_lng, bounds_ne_lat, bounds_ne_lng, \
                                  geo_source, location_confidence, is_active, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, 1, ?18, ?18)",
        params![
            id,
            jar_id,
            member_id,
            input.title,
            input.description,
            input.location,
            place.and_then(|p| p.name.clone()),
            place.and_then(|p| p.address.clone()),
            place.and_then(|p| p.place_id.clone()),
            place.map(|p| p.latitude),
            place.map(|p| p.longitude),
            bounds.map(|b| b.sw_lat),
            bounds.map(|b| b.sw_lng),
            bounds.map(|b| b.ne_lat),
            bounds.map(|b| b.ne_lng),
            place.and_then(|p| p.geo_source.clone()),
            place.and_then(|p| p.location_confidence),
            now
        ],
    )?;
    member::set_has_suggested(conn, member_id, true)?;
    find_by_id(conn, &id)?.ok_or(AppError::NotFound)
}

pub fn find_by_id(conn: &Connection, id: &str) -> Result<Option<Suggestion>, AppError> {
    let suggestion = conn
        .query_row(
            "SELECT * FROM suggestions WHERE id = ?1 AND is_active = 1",
            params![id],
            row_to_suggestion,
        )
        .optional()?;
    Ok(suggestion)
}

pub fn list_for_jar(conn: &Connection, jar_id: &str) -> Result<Vec<Suggestion>, AppError> {
    let mut stmt = conn.prepare(
        "SELECT * FROM suggestions WHERE jar_id = ?1 AND is_active = 1 \
         ORDER BY created_at ASC, id ASC",
    )?;
    let suggestions = stmt
        .query_map(params![jar_id], row_to_suggestion)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(suggestions)
}

/// Soft-delete a suggestion; clears the member's has_suggested flag when no
/// active suggestions of theirs remain.
pub fn soft_delete(conn: &Connection, suggestion: &Suggestion) -> Result<(), AppError> {
    conn.execute(
        "UPDATE suggestions SET is_active = 0, updated_at = ?2 WHERE id = ?1",
        params![suggestion.id, now_utc()],
    )?;
    let remaining: i64 = conn.query_row(
        "SELECT COUNT(*) FROM suggestions \
         WHERE member_id = ?1 AND jar_id = ?2 AND is_active = 1",
        params![suggestion.member_id, suggestion.jar_id],
        |row| row.get(0),
    )?;
    if remaining == 0 {
        member::set_has_suggested(conn, &suggestion.member_id, false)?;
    }
    Ok(())
}
