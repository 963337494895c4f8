use actix_session::Session;
use actix_web::{web, HttpResponse};
use rusqlite::Connection;
use serde::Deserialize;

use crate::auth::csrf;
use crate::auth::session::{is_local_creator, remember_member, resolve_member, set_flash};
use crate::auth::validate::{validate_optional, validate_required};
use crate::db::DbPool;
use crate::errors::{render, AppError};
use crate::models::jar::{self, ActionResult, Jar, Phase, PhaseAction};
use crate::models::member;
use crate::models::results;
use crate::models::suggestion;
use crate::models::vote;
use crate::templates_structs::*;

#[derive(Deserialize)]
pub struct CsrfOnly {
    pub csrf_token: String,
}

#[derive(Deserialize)]
pub struct ViewQuery {
    /// Member id carried in a personalized share link; adopted into the
    /// session when it checks out against the jar.
    pub member: Option<String>,
}

/// Resolve the visitor's standing for a jar page.
fn viewer_for(
    session: &Session,
    conn: &Connection,
    jar: &Jar,
) -> Result<ViewerView, AppError> {
    let local_creator = is_local_creator(session, &jar.id);
    match resolve_member(session, conn, &jar.id)? {
        Some(m) => Ok(ViewerView::from_member(
            &m,
            jar.creator_phone.as_deref(),
            local_creator,
        )),
        None => Ok(ViewerView::anonymous(local_creator)),
    }
}

/// GET /jar/{id}
/// The phase-gated jar page: exactly one panel per phase, matched
/// exhaustively. Loading also runs the lazy deadline check.
pub async fn view(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<String>,
    query: web::Query<ViewQuery>,
) -> Result<HttpResponse, AppError> {
    let jar_id = path.into_inner();
    let conn = pool.get()?;
    let jar = jar::find_by_id(&conn, &jar_id)?.ok_or(AppError::NotFound)?;
    let jar = jar::check_deadlines(&conn, jar)?;

    if let Some(member_id) = query.member.as_deref() {
        if let Some(m) = member::find_by_id(&conn, member_id)? {
            if m.jar_id == jar_id {
                remember_member(&session, &jar_id, &m.id);
            }
        }
    }

    let ctx = PageContext::build(&session);
    let counts = jar::counts(&conn, &jar.id)?;
    let members = member::list_for_jar(&conn, &jar.id)?;
    let viewer = viewer_for(&session, &conn, &jar)?;
    let view = JarView::from_jar(&jar);

    match jar.phase {
        Phase::Setup => render(JarSetupTemplate {
            ctx,
            jar: view,
            counts,
            members,
            viewer,
        }),
        Phase::Suggesting => {
            let suggestions = suggestion::list_for_jar(&conn, &jar.id)?
                .iter()
                .map(|s| SuggestionView::from_suggestion(s, &viewer.member_id))
                .collect();
            render(JarSuggestingTemplate {
                ctx,
                jar: view,
                counts,
                members,
                viewer,
                suggestions,
            })
        }
        Phase::Voting => render(JarVotingTemplate {
            ctx,
            jar: view,
            counts,
            members,
            viewer,
        }),
        Phase::Completed => {
            let ranked = results::rank(vote::tally_for_jar(&conn, &jar.id)?);
            render(JarCompletedTemplate {
                ctx,
                jar: view,
                counts,
                members,
                viewer,
                results: ResultRowView::from_ranked(ranked),
            })
        }
        Phase::Cancelled => render(JarCancelledTemplate {
            ctx,
            jar: view,
            counts,
            members,
            viewer,
        }),
    }
}

/// POST /jar/{id}/phase/{action}
/// Explicit administrative phase action, host only.
pub async fn phase_action(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<(String, String)>,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let (jar_id, slug) = path.into_inner();
    let action = PhaseAction::from_slug(&slug).ok_or(AppError::NotFound)?;

    let conn = pool.get()?;
    let jar = jar::find_by_id(&conn, &jar_id)?.ok_or(AppError::NotFound)?;
    let viewer = viewer_for(&session, &conn, &jar)?;

    if !viewer.is_host {
        set_flash(&session, "Only the host can change the jar's phase");
        return redirect_to_jar(&jar_id);
    }

    match jar::apply_action(&conn, &jar, action)? {
        ActionResult::Applied(message) => {
            log::info!("Jar {jar_id}: {slug} applied");
            set_flash(&session, &message);
        }
        ActionResult::Rejected(reason) => set_flash(&session, &reason),
    }
    redirect_to_jar(&jar_id)
}

/// GET /jar/{id}/edit
pub async fn edit_form(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let jar_id = path.into_inner();
    let conn = pool.get()?;
    let jar = jar::find_by_id(&conn, &jar_id)?.ok_or(AppError::NotFound)?;
    let viewer = viewer_for(&session, &conn, &jar)?;

    if !viewer.is_host {
        set_flash(&session, "Only the host can edit the jar");
        return redirect_to_jar(&jar_id);
    }

    let ctx = PageContext::build(&session);
    render(JarEditTemplate {
        ctx,
        jar: JarView::from_jar(&jar),
        errors: vec![],
    })
}

/// POST /jar/{id}/edit
/// Partial update of title/description/deadlines.
pub async fn edit_submit(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<String>,
    form: web::Form<jar::JarEditForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let jar_id = path.into_inner();
    let conn = pool.get()?;
    let jar = jar::find_by_id(&conn, &jar_id)?.ok_or(AppError::NotFound)?;
    let viewer = viewer_for(&session, &conn, &jar)?;

    if !viewer.is_host {
        set_flash(&session, "Only the host can edit the jar");
        return redirect_to_jar(&jar_id);
    }

    let mut errors = Vec::new();
    if let Some(e) = validate_required(&form.title, "Title", 200) {
        errors.push(e);
    }
    if let Some(e) = validate_optional(&form.description, "Description", 2000) {
        errors.push(e);
    }

    if !errors.is_empty() {
        let ctx = PageContext::build(&session);
        let mut view = JarView::from_jar(&jar);
        view.title = form.title.clone();
        view.description = form.description.clone();
        return render(JarEditTemplate {
            ctx,
            jar: view,
            errors,
        });
    }

    let description = form.description.trim();
    jar::update_details(
        &conn,
        &jar_id,
        form.title.trim(),
        (!description.is_empty()).then_some(description),
        jar::parse_deadline_input(&form.suggestion_deadline).as_deref(),
        jar::parse_deadline_input(&form.voting_deadline).as_deref(),
    )?;

    set_flash(&session, "Jar details updated");
    redirect_to_jar(&jar_id)
}

pub(crate) fn redirect_to_jar(jar_id: &str) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::SeeOther()
        .insert_header(("Location", format!("/jar/{jar_id}")))
        .finish())
}
