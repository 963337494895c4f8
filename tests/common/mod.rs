//! Shared test infrastructure for model layer tests.
//!
//! `setup_test_db()` creates a temporary SQLite database with the full
//! schema; the helpers below seed jars, members, and suggestions without
//! going through the HTTP layer.

use rusqlite::{params, Connection};
use tempfile::TempDir;

use picklejar::db::MIGRATIONS;
use picklejar::ids;

/// Setup a test database with the schema applied.
///
/// Returns (TempDir, Connection); the TempDir must be kept alive for the
/// Connection to remain valid.
pub fn setup_test_db() -> (TempDir, Connection) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = dir.path().join("test.db");
    let conn = Connection::open(&db_path).expect("Failed to open test DB");

    conn.execute_batch("PRAGMA foreign_keys=ON; PRAGMA journal_mode=WAL;")
        .expect("Failed to set pragmas");
    conn.execute_batch(MIGRATIONS)
        .expect("Failed to run migrations");

    (dir, conn)
}

/// Insert a jar directly, in the given phase. Returns its id.
pub fn create_jar(conn: &Connection, title: &str, status: &str) -> String {
    let id = ids::new_jar_id();
    conn.execute(
        "INSERT INTO jars (id, title, description, status, points_per_voter, \
                           is_active, created_at, updated_at) \
         VALUES (?1, ?2, NULL, ?3, 10, 1, '2026-01-01 12:00:00', '2026-01-01 12:00:00')",
        params![id, title, status],
    )
    .expect("Failed to insert jar");
    id
}

#[allow(dead_code)]
pub fn set_deadline(conn: &Connection, jar_id: &str, column: &str, value: &str) {
    // Column name comes from the test, not user input.
    let sql = format!("UPDATE jars SET {column} = ?2 WHERE id = ?1");
    conn.execute(&sql, params![jar_id, value])
        .expect("Failed to set deadline");
}

/// Join a member directly. Returns the member id.
#[allow(dead_code)]
pub fn join_member(conn: &Connection, jar_id: &str, phone: &str) -> String {
    let member = picklejar::models::member::join(conn, jar_id, phone, None)
        .expect("Failed to join member");
    member.id
}

/// Add a bare suggestion (no location). Returns the suggestion id.
#[allow(dead_code)]
pub fn add_suggestion(conn: &Connection, jar_id: &str, member_id: &str, title: &str) -> String {
    let input = picklejar::models::suggestion::NewSuggestion {
        title: title.to_string(),
        description: None,
        location: None,
        place: None,
    };
    let suggestion = picklejar::models::suggestion::create(conn, jar_id, member_id, &input)
        .expect("Failed to insert suggestion");
    suggestion.id
}

/// Pin a suggestion's created_at so ordering tests are deterministic.
#[allow(dead_code)]
pub fn set_created_at(conn: &Connection, suggestion_id: &str, created_at: &str) {
    conn.execute(
        "UPDATE suggestions SET created_at = ?2 WHERE id = ?1",
        params![suggestion_id, created_at],
    )
    .expect("Failed to set created_at");
}
