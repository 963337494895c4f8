//! Suggestion tests: creation with structured locations, flags, soft delete.

mod common;

use common::*;
use picklejar::models::member;
use picklejar::models::suggestion::{self, Bounds, NewSuggestion, StructuredLocation};

#[test]
fn creating_a_suggestion_sets_the_member_flag() {
    let (_dir, conn) = setup_test_db();
    let jar_id = create_jar(&conn, "Dinner", "suggesting");
    let member_id = join_member(&conn, &jar_id, "4165550100");

    add_suggestion(&conn, &jar_id, &member_id, "Ramen");

    let m = member::find_by_id(&conn, &member_id).unwrap().unwrap();
    assert!(m.has_suggested);
}

#[test]
fn structured_location_round_trips_through_storage() {
    let (_dir, conn) = setup_test_db();
    let jar_id = create_jar(&conn, "Picnic", "suggesting");
    let member_id = join_member(&conn, &jar_id, "4165550100");

    let input = NewSuggestion {
        title: "Trinity Bellwoods".to_string(),
        description: None,
        location: Some("Trinity Bellwoods Park".to_string()),
        place: Some(StructuredLocation {
            name: Some("Trinity Bellwoods".to_string()),
            address: Some("Trinity Bellwoods Park, Toronto".to_string()),
            place_id: Some("poi.123".to_string()),
            latitude: 43.647,
            longitude: -79.414,
            bounds: Some(Bounds {
                sw_lat: 43.64,
                sw_lng: -79.42,
                ne_lat: 43.65,
                ne_lng: -79.41,
            }),
            geo_source: Some("mapbox".to_string()),
            location_confidence: Some(93),
        }),
    };
    let created = suggestion::create(&conn, &jar_id, &member_id, &input).unwrap();

    let loaded = suggestion::find_by_id(&conn, &created.id).unwrap().unwrap();
    let place = loaded.place.expect("structured location");
    assert_eq!(place.latitude, 43.647);
    assert_eq!(place.name.as_deref(), Some("Trinity Bellwoods"));
    assert_eq!(place.geo_source.as_deref(), Some("mapbox"));
    assert_eq!(place.location_confidence, Some(93));
    let bounds = place.bounds.expect("bounds");
    assert_eq!(bounds.sw_lng, -79.42);
}

#[test]
fn free_text_location_loads_without_a_place() {
    let (_dir, conn) = setup_test_db();
    let jar_id = create_jar(&conn, "Picnic", "suggesting");
    let member_id = join_member(&conn, &jar_id, "4165550100");

    let input = NewSuggestion {
        title: "Somewhere green".to_string(),
        description: None,
        location: Some("any park really".to_string()),
        place: None,
    };
    let created = suggestion::create(&conn, &jar_id, &member_id, &input).unwrap();
    let loaded = suggestion::find_by_id(&conn, &created.id).unwrap().unwrap();
    assert_eq!(loaded.location.as_deref(), Some("any park really"));
    assert!(loaded.place.is_none());
}

#[test]
fn list_is_ordered_by_submission() {
    let (_dir, conn) = setup_test_db();
    let jar_id = create_jar(&conn, "Dinner", "suggesting");
    let member_id = join_member(&conn, &jar_id, "4165550100");

    let first = add_suggestion(&conn, &jar_id, &member_id, "Ramen");
    let second = add_suggestion(&conn, &jar_id, &member_id, "Tacos");
    set_created_at(&conn, &first, "2026-01-01 10:00:00");
    set_created_at(&conn, &second, "2026-01-01 10:05:00");

    let listed = suggestion::list_for_jar(&conn, &jar_id).unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, first);
    assert_eq!(listed[1].id, second);
}

#[test]
fn soft_delete_hides_the_suggestion_and_clears_the_flag() {
    let (_dir, conn) = setup_test_db();
    let jar_id = create_jar(&conn, "Dinner", "suggesting");
    let member_id = join_member(&conn, &jar_id, "4165550100");
    let suggestion_id = add_suggestion(&conn, &jar_id, &member_id, "Ramen");

    let target = suggestion::find_by_id(&conn, &suggestion_id).unwrap().unwrap();
    suggestion::soft_delete(&conn, &target).unwrap();

    assert!(suggestion::find_by_id(&conn, &suggestion_id).unwrap().is_none());
    assert!(suggestion::list_for_jar(&conn, &jar_id).unwrap().is_empty());
    let m = member::find_by_id(&conn, &member_id).unwrap().unwrap();
    assert!(!m.has_suggested);
}

#[test]
fn soft_delete_keeps_the_flag_while_other_suggestions_remain() {
    let (_dir, conn) = setup_test_db();
    let jar_id = create_jar(&conn, "Dinner", "suggesting");
    let member_id = join_member(&conn, &jar_id, "4165550100");
    let doomed = add_suggestion(&conn, &jar_id, &member_id, "Ramen");
    add_suggestion(&conn, &jar_id, &member_id, "Tacos");

    let target = suggestion::find_by_id(&conn, &doomed).unwrap().unwrap();
    suggestion::soft_delete(&conn, &target).unwrap();

    let m = member::find_by_id(&conn, &member_id).unwrap().unwrap();
    assert!(m.has_suggested);
}
