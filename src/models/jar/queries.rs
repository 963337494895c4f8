use rusqlite::{params, Connection, OptionalExtension};

use super::types::*;
use crate::errors::AppError;
use crate::ids;
use crate::models::now_utc;

/// Outcome of an administrative phase action. Rejections are business rules,
/// not errors; the handler turns either into a flash message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionResult {
    Applied(String),
    Rejected(String),
}

fn row_to_jar(row: &rusqlite::Row) -> rusqlite::Result<Jar> {
    let status: String = row.get("status")?;
    Ok(Jar {
        id: row.get("id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        phase: Phase::parse(&status),
        points_per_voter: row.get("points_per_voter")?,
        suggestion_deadline: row.get("suggestion_deadline")?,
        voting_deadline: row.get("voting_deadline")?,
        creator_phone: row.get("creator_phone")?,
        is_active: row.get::<_, i64>("is_active")? != 0,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

pub fn create(conn: &Connection, new: &NewJar) -> Result<Jar, AppError> {
    let id = ids::new_jar_id();
    let now = now_utc();
    conn.execute(
        "INSERT INTO jars (id, title, description, status, points_per_voter, \
                           suggestion_deadline, voting_deadline, creator_phone, \
                           is_active, created_at, updated_at) \
         VALUES (?1, ?2, ?3, 'setup', 10, ?4, ?5, ?6, 1, ?7, ?7)",
        params![
            id,
            new.title,
            new.description,
            new.suggestion_deadline,
            new.voting_deadline,
            new.creator_phone,
            now
        ],
    )?;
    find_by_id(conn, &id)?.ok_or(AppError::NotFound)
}

pub fn find_by_id(conn: &Connection, id: &str) -> Result<Option<Jar>, AppError> {
    let jar = conn
        .query_row("SELECT * FROM jars WHERE id = ?1", params![id], row_to_jar)
        .optional()?;
    Ok(jar)
}

pub fn update_details(
    conn: &Connection,
    id: &str,
    title: &str,
    description: Option<&str>,
    suggestion_deadline: Option<&str>,
    voting_deadline: Option<&str>,
) -> Result<(), AppError> {
    conn.execute(
        "UPDATE jars SET title = ?2, description = ?3, suggestion_deadline = ?4, \
                         voting_deadline = ?5, updated_at = ?6 \
         WHERE id = ?1",
        params![id, title, description, suggestion_deadline, voting_deadline, now_utc()],
    )?;
    Ok(())
}

pub fn counts(conn: &Connection, jar_id: &str) -> Result<JarCounts, AppError> {
    let (members, members_suggested, members_voted) = conn.query_row(
        "SELECT COUNT(*), \
                COALESCE(SUM(has_suggested), 0), \
                COALESCE(SUM(has_voted), 0) \
         FROM members WHERE jar_id = ?1 AND is_active = 1",
        params![jar_id],
        |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
    )?;
    let suggestions = active_suggestion_count(conn, jar_id)?;
    Ok(JarCounts {
        members,
        suggestions,
        members_suggested,
        members_voted,
    })
}

pub fn active_suggestion_count(conn: &Connection, jar_id: &str) -> Result<i64, AppError> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM suggestions WHERE jar_id = ?1 AND is_active = 1",
        params![jar_id],
        |row| row.get(0),
    )?;
    Ok(count)
}

fn set_phase(conn: &Connection, jar_id: &str, phase: Phase) -> Result<(), AppError> {
    conn.execute(
        "UPDATE jars SET status = ?2, updated_at = ?3 WHERE id = ?1",
        params![jar_id, phase.as_str(), now_utc()],
    )?;
    Ok(())
}

fn open_voting(conn: &Connection, jar_id: &str, suggestion_count: i64) -> Result<(), AppError> {
    conn.execute(
        "UPDATE jars SET status = 'voting', points_per_voter = ?2, updated_at = ?3 \
         WHERE id = ?1",
        params![jar_id, derived_budget(suggestion_count), now_utc()],
    )?;
    Ok(())
}

/// Apply an explicit phase action, validating the current phase first.
pub fn apply_action(
    conn: &Connection,
    jar: &Jar,
    action: PhaseAction,
) -> Result<ActionResult, AppError> {
    if !action.allowed_from(jar.phase) {
        return Ok(ActionResult::Rejected(format!(
            "Cannot {} while the jar is in the '{}' phase",
            action_verb(action),
            jar.phase.as_str()
        )));
    }

    match action {
        PhaseAction::StartVoting => {
            let suggestion_count = active_suggestion_count(conn, &jar.id)?;
            if suggestion_count == 0 {
                return Ok(ActionResult::Rejected(
                    "Cannot start voting with no suggestions".to_string(),
                ));
            }
            open_voting(conn, &jar.id, suggestion_count)?;
        }
        PhaseAction::Cancel => {
            conn.execute(
                "UPDATE jars SET status = 'cancelled', is_active = 0, updated_at = ?2 \
                 WHERE id = ?1",
                params![jar.id, now_utc()],
            )?;
        }
        _ => set_phase(conn, &jar.id, action.target())?,
    }

    Ok(ActionResult::Applied(action.success_message().to_string()))
}

fn action_verb(action: PhaseAction) -> &'static str {
    match action {
        PhaseAction::StartSuggesting => "start suggesting",
        PhaseAction::StartVoting => "start voting",
        PhaseAction::Complete => "complete the jar",
        PhaseAction::RevertToSetup => "revert to setup",
        PhaseAction::RevertToSuggesting => "revert to suggesting",
        PhaseAction::RevertToVoting => "revert to voting",
        PhaseAction::Cancel => "cancel the jar",
    }
}

/// Lazy deadline check run when a jar page is loaded. Mirrors the scheduler:
/// an expired suggestion deadline opens voting only when suggestions exist
/// (deriving the budget); an expired voting deadline completes the jar.
pub fn check_deadlines(conn: &Connection, jar: Jar) -> Result<Jar, AppError> {
    let now = chrono::Utc::now().naive_utc();
    let mut changed = false;

    if jar.phase == Phase::Suggesting {
        if let Some(deadline) = &jar.suggestion_deadline {
            if deadline_passed(deadline, now) {
                let suggestion_count = active_suggestion_count(conn, &jar.id)?;
                if suggestion_count > 0 {
                    open_voting(conn, &jar.id, suggestion_count)?;
                    changed = true;
                }
            }
        }
    }

    // Re-read phase so a jar that just opened voting can also expire it.
    let phase = if changed { Phase::Voting } else { jar.phase };
    if phase == Phase::Voting {
        if let Some(deadline) = &jar.voting_deadline {
            if deadline_passed(deadline, now) {
                set_phase(conn, &jar.id, Phase::Completed)?;
                changed = true;
            }
        }
    }

    if changed {
        log::info!("Deadline expiry advanced jar {}", jar.id);
        return find_by_id(conn, &jar.id)?.ok_or(AppError::NotFound);
    }
    Ok(jar)
}

/// Scheduler sweep over every active jar with a pending deadline. Returns the
/// number of jars advanced.
pub fn expire_deadlines(conn: &Connection) -> Result<usize, AppError> {
    let mut stmt = conn.prepare(
        "SELECT id FROM jars \
         WHERE is_active = 1 AND status IN ('suggesting', 'voting') \
           AND (suggestion_deadline IS NOT NULL OR voting_deadline IS NOT NULL)",
    )?;
    let ids: Vec<String> = stmt
        .query_map([], |row| row.get(0))?
        .collect::<Result<Vec<_>, _>>()?;

    let mut advanced = 0;
    for id in ids {
        if let Some(jar) = find_by_id(conn, &id)? {
            let before = jar.phase;
            let after = check_deadlines(conn, jar)?;
            if after.phase != before {
                advanced += 1;
            }
        }
    }
    Ok(advanced)
}
