use rusqlite::{params, Connection, OptionalExtension};

use super::types::*;
use crate::errors::AppError;
use crate::ids;
use crate::models::now_utc;

fn row_to_member(row: &rusqlite::Row) -> rusqlite::Result<Member> {
    Ok(Member {
        id: row.get("id")?,
        jar_id: row.get("jar_id")?,
        phone_number: row.get("phone_number")?,
        display_name: row.get("display_name")?,
        has_suggested: row.get::<_, i64>("has_suggested")? != 0,
        has_voted: row.get::<_, i64>("has_voted")? != 0,
        is_active: row.get::<_, i64>("is_active")? != 0,
        joined_at: row.get("joined_at")?,
        last_active: row.get("last_active")?,
    })
}

pub fn find_by_id(conn: &Connection, id: &str) -> Result<Option<Member>, AppError> {
    let member = conn
        .query_row(
            "SELECT * FROM members WHERE id = ?1 AND is_active = 1",
            params![id],
            row_to_member,
        )
        .optional()?;
    Ok(member)
}

pub fn find_by_phone(
    conn: &Connection,
    jar_id: &str,
    phone: &str,
) -> Result<Option<Member>, AppError> {
    let member = conn
        .query_row(
            "SELECT * FROM members \
             WHERE jar_id = ?1 AND phone_number = ?2 AND is_active = 1",
            params![jar_id, phone],
            row_to_member,
        )
        .optional()?;
    Ok(member)
}

/// Join a jar. The phone must already be normalized. Joining again with a
/// known phone returns the existing member, refreshing last_active and the
/// display name if one was given.
pub fn join(
    conn: &Connection,
    jar_id: &str,
    phone: &str,
    display_name: Option<&str>,
) -> Result<Member, AppError> {
    if let Some(existing) = find_by_phone(conn, jar_id, phone)? {
        conn.execute(
            "UPDATE members SET last_active = ?2, \
                                display_name = COALESCE(?3, display_name) \
             WHERE id = ?1",
            params![existing.id, now_utc(), display_name],
        )?;
        return find_by_id(conn, &existing.id)?.ok_or(AppError::NotFound);
    }

    let id = ids::new_id();
    let now = now_utc();
    conn.execute(
        "INSERT INTO members (id, jar_id, phone_number, display_name, \
                              has_suggested, has_voted, is_active, joined_at, last_active) \
         VALUES (?1, ?2, ?3, ?4, 0, 0, 1, ?5, ?5)",
        params![id, jar_id, phone, display_name, now],
    )?;
    find_by_id(conn, &id)?.ok_or(AppError::NotFound)
}

/// Anonymized participant list for the jar page.
pub fn list_for_jar(conn: &Connection, jar_id: &str) -> Result<Vec<MemberStatus>, AppError> {
    let mut stmt = conn.prepare(
        "SELECT id, COALESCE(display_name, 'Anonymous') AS display_name, \
                has_suggested, has_voted \
         FROM members WHERE jar_id = ?1 AND is_active = 1 \
         ORDER BY joined_at ASC, id ASC",
    )?;
    let members = stmt
        .query_map(params![jar_id], |row| {
            Ok(MemberStatus {
                id: row.get("id")?,
                display_name: row.get("display_name")?,
                has_suggested: row.get::<_, i64>("has_suggested")? != 0,
                has_voted: row.get::<_, i64>("has_voted")? != 0,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(members)
}

pub fn set_has_suggested(conn: &Connection, member_id: &str, value: bool) -> Result<(), AppError> {
    conn.execute(
        "UPDATE members SET has_suggested = ?2, last_active = ?3 WHERE id = ?1",
        params![member_id, value as i64, now_utc()],
    )?;
    Ok(())
}

pub fn set_has_voted(conn: &Connection, member_id: &str, value: bool) -> Result<(), AppError> {
    conn.execute(
        "UPDATE members SET has_voted = ?2, last_active = ?3 WHERE id = ?1",
        params![member_id, value as i64, now_utc()],
    )?;
    Ok(())
}

/// Leave a jar (soft delete).
pub fn leave(conn: &Connection, member_id: &str) -> Result<(), AppError> {
    conn.execute(
        "UPDATE members SET is_active = 0 WHERE id = ?1",
        params![member_id],
    )?;
    Ok(())
}
