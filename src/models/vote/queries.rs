use rusqlite::{params, Connection};

use super::allocation::BallotEntry;
use super::types::*;
use crate::errors::AppError;
use crate::ids;
use crate::models::{member, now_utc};

/// Replace a member's ballot for a jar. Any previous votes are deleted first;
/// only positive entries are stored; the member's has_voted flag follows. The
/// whole swap runs in one transaction, so a failed replacement rolls back and
/// leaves the prior ballot in place.
pub fn replace_for_member(
    conn: &Connection,
    jar_id: &str,
    member_id: &str,
    ballot: &[BallotEntry],
) -> Result<(), AppError> {
    let tx = conn.unchecked_transaction()?;
    tx.execute(
        "DELETE FROM votes WHERE jar_id = ?1 AND member_id = ?2",
        params![jar_id, member_id],
    )?;
    let now = now_utc();
    for entry in ballot {
        debug_assert!(entry.points > 0);
        tx.execute(
            "INSERT INTO votes (id, jar_id, member_id, suggestion_id, points, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                ids::new_id(),
                jar_id,
                member_id,
                entry.suggestion_id,
                entry.points,
                now
            ],
        )?;
    }
    member::set_has_voted(&tx, member_id, true)?;
    tx.commit()?;
    Ok(())
}

/// A member's current allocation as (suggestion id, points) pairs.
pub fn points_for_member(
    conn: &Connection,
    jar_id: &str,
    member_id: &str,
) -> Result<Vec<(String, i64)>, AppError> {
    let mut stmt = conn.prepare(
        "SELECT suggestion_id, points FROM votes \
         WHERE jar_id = ?1 AND member_id = ?2",
    )?;
    let points = stmt
        .query_map(params![jar_id, member_id], |row| {
            Ok((row.get(0)?, row.get(1)?))
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(points)
}

/// Clear a member's votes so they can start over.
pub fn clear_for_member(conn: &Connection, jar_id: &str, member_id: &str) -> Result<usize, AppError> {
    let tx = conn.unchecked_transaction()?;
    let deleted = tx.execute(
        "DELETE FROM votes WHERE jar_id = ?1 AND member_id = ?2",
        params![jar_id, member_id],
    )?;
    member::set_has_voted(&tx, member_id, false)?;
    tx.commit()?;
    Ok(deleted)
}

/// Per-suggestion totals for a jar, in suggestion submission order. Active
/// suggestions with no votes appear with a zero total.
pub fn tally_for_jar(conn: &Connection, jar_id: &str) -> Result<Vec<TallyRow>, AppError> {
    let mut stmt = conn.prepare(
        "SELECT s.id, s.title, s.description, s.location, s.created_at, \
                COALESCE(SUM(v.points), 0) AS total_points, \
                COUNT(v.id) AS vote_count \
         FROM suggestions s \
         LEFT JOIN votes v ON v.suggestion_id = s.id \
         WHERE s.jar_id = ?1 AND s.is_active = 1 \
         GROUP BY s.id \
         ORDER BY s.created_at ASC, s.id ASC",
    )?;
    let rows = stmt
        .query_map(params![jar_id], |row| {
            Ok(TallyRow {
                suggestion_id: row.get(0)?,
                title: row.get(1)?,
                description: row.get(2)?,
                location: row.get(3)?,
                created_at: row.get(4)?,
                total_points: row.get(5)?,
                vote_count: row.get(6)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}
