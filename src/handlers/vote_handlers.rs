use std::collections::HashMap;

use actix_session::Session;
use actix_web::{web, HttpResponse};
use rusqlite::Connection;

use crate::auth::csrf;
use crate::auth::session::{resolve_member, set_flash};
use crate::db::DbPool;
use crate::errors::{render, AppError};
use crate::handlers::jar_handlers::{redirect_to_jar, CsrfOnly};
use crate::models::jar::{self, Jar, Phase};
use crate::models::member::Member;
use crate::models::suggestion::{self, Suggestion};
use crate::models::vote::{self, parse_points, Allocation, VoteRules};
use crate::templates_structs::{JarView, PageContext, VoteRowView, VoteTemplate};

fn require_voter(
    session: &Session,
    conn: &Connection,
    jar: &Jar,
) -> Result<Result<Member, HttpResponse>, AppError> {
    if jar.phase != Phase::Voting {
        set_flash(session, "Voting is not open for this jar");
        return Ok(Err(redirect_to_jar(&jar.id)?));
    }
    match resolve_member(session, conn, &jar.id)? {
        Some(m) => Ok(Ok(m)),
        None => {
            set_flash(session, "Join the jar before voting");
            Ok(Err(HttpResponse::SeeOther()
                .insert_header(("Location", format!("/jar/{}/join", jar.id)))
                .finish()))
        }
    }
}

fn rows_from(suggestions: &[Suggestion], allocation: &Allocation) -> Vec<VoteRowView> {
    suggestions
        .iter()
        .map(|s| VoteRowView {
            id: s.id.clone(),
            title: s.title.clone(),
            description: s.description.clone().unwrap_or_default(),
            points: allocation.get(&s.id),
        })
        .collect()
}

/// GET /jar/{id}/vote
/// The allocation panel, pre-filled with the member's current ballot so a
/// revote starts from what they submitted last time.
pub async fn vote_form(
    pool: web::Data<DbPool>,
    rules: web::Data<VoteRules>,
    session: Session,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let jar_id = path.into_inner();
    let conn = pool.get()?;
    let jar = jar::find_by_id(&conn, &jar_id)?.ok_or(AppError::NotFound)?;
    let jar = jar::check_deadlines(&conn, jar)?;

    let member = match require_voter(&session, &conn, &jar)? {
        Ok(m) => m,
        Err(redirect) => return Ok(redirect),
    };

    let suggestions = suggestion::list_for_jar(&conn, &jar_id)?;
    let mut allocation = Allocation::for_candidates(
        jar.points_per_voter,
        suggestions.iter().map(|s| s.id.clone()),
    );
    for (suggestion_id, points) in vote::points_for_member(&conn, &jar_id, &member.id)? {
        allocation.set(&suggestion_id, points);
    }

    let ctx = PageContext::build(&session);
    render(VoteTemplate {
        ctx,
        jar: JarView::from_jar(&jar),
        errors: vec![],
        rows: rows_from(&suggestions, &allocation),
        budget: allocation.budget(),
        remaining: allocation.remaining(),
        allow_underspend: rules.allow_underspend,
    })
}

/// POST /jar/{id}/vote
/// Replaces the member's whole ballot. Field names are `points_{suggestion}`;
/// anything unparseable counts as zero. An over-budget allocation or (by
/// default) leftover points re-renders the panel instead of submitting.
pub async fn vote_submit(
    pool: web::Data<DbPool>,
    rules: web::Data<VoteRules>,
    session: Session,
    path: web::Path<String>,
    form: web::Form<HashMap<String, String>>,
) -> Result<HttpResponse, AppError> {
    let csrf_token = form.get("csrf_token").map(String::as_str).unwrap_or("");
    csrf::validate_csrf(&session, csrf_token)?;

    let jar_id = path.into_inner();
    let conn = pool.get()?;
    let jar = jar::find_by_id(&conn, &jar_id)?.ok_or(AppError::NotFound)?;
    let jar = jar::check_deadlines(&conn, jar)?;

    let member = match require_voter(&session, &conn, &jar)? {
        Ok(m) => m,
        Err(redirect) => return Ok(redirect),
    };

    let suggestions = suggestion::list_for_jar(&conn, &jar_id)?;
    let mut allocation = Allocation::for_candidates(
        jar.points_per_voter,
        suggestions.iter().map(|s| s.id.clone()),
    );

    let mut errors = Vec::new();
    for s in &suggestions {
        let raw = form
            .get(&format!("points_{}", s.id))
            .map(String::as_str)
            .unwrap_or("");
        let points = parse_points(raw);
        if !allocation.set(&s.id, points) {
            errors.push(format!(
                "'{}' would put you over the budget of {} points",
                s.title,
                allocation.budget()
            ));
        }
    }

    if errors.is_empty() && !rules.allow_underspend && !allocation.is_exhausted() {
        errors.push(format!(
            "Allocate all {} points before submitting ({} left)",
            allocation.budget(),
            allocation.remaining()
        ));
    }

    if !errors.is_empty() {
        let ctx = PageContext::build(&session);
        return render(VoteTemplate {
            ctx,
            jar: JarView::from_jar(&jar),
            errors,
            rows: rows_from(&suggestions, &allocation),
            budget: allocation.budget(),
            remaining: allocation.remaining(),
            allow_underspend: rules.allow_underspend,
        });
    }

    vote::replace_for_member(&conn, &jar_id, &member.id, &allocation.ballot())?;
    log::info!("Member {} voted in jar {jar_id}", member.id);

    set_flash(&session, "Ballot submitted");
    Ok(HttpResponse::SeeOther()
        .insert_header(("Location", format!("/jar/{jar_id}/results")))
        .finish())
}

/// POST /jar/{id}/vote/clear
/// Drops the member's whole ballot and resets their voted flag, sending them
/// back to a blank allocation panel.
pub async fn vote_clear(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<String>,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let jar_id = path.into_inner();
    let conn = pool.get()?;
    let jar = jar::find_by_id(&conn, &jar_id)?.ok_or(AppError::NotFound)?;
    let jar = jar::check_deadlines(&conn, jar)?;

    let member = match require_voter(&session, &conn, &jar)? {
        Ok(m) => m,
        Err(redirect) => return Ok(redirect),
    };

    let deleted = vote::clear_for_member(&conn, &jar_id, &member.id)?;
    log::info!(
        "Member {} cleared {deleted} vote(s) in jar {jar_id}",
        member.id
    );

    set_flash(&session, "Ballot cleared");
    Ok(HttpResponse::SeeOther()
        .insert_header(("Location", format!("/jar/{jar_id}/vote")))
        .finish())
}
