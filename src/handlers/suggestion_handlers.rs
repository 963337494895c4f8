use actix_session::Session;
use actix_web::{web, HttpResponse};

use crate::auth::csrf;
use crate::auth::session::{resolve_member, set_flash};
use crate::db::DbPool;
use crate::errors::{render, AppError};
use crate::handlers::jar_handlers::{redirect_to_jar, CsrfOnly};
use crate::handlers::location_handlers::GeoState;
use crate::models::jar::{self, Phase};
use crate::models::member::Member;
use crate::models::suggestion::{self, SuggestionForm};
use crate::templates_structs::{
    JarView, PageContext, SuggestFormTemplate, SuggestFormValues,
};

/// Suggestions are accepted during setup and the suggesting phase.
fn accepts_suggestions(phase: Phase) -> bool {
    matches!(phase, Phase::Setup | Phase::Suggesting)
}

fn require_member(
    session: &Session,
    conn: &rusqlite::Connection,
    jar_id: &str,
) -> Result<Result<Member, HttpResponse>, AppError> {
    match resolve_member(session, conn, jar_id)? {
        Some(m) => Ok(Ok(m)),
        None => {
            set_flash(session, "Join the jar before adding suggestions");
            Ok(Err(HttpResponse::SeeOther()
                .insert_header(("Location", format!("/jar/{jar_id}/join")))
                .finish()))
        }
    }
}

/// GET /jar/{id}/suggest
pub async fn suggest_form(
    pool: web::Data<DbPool>,
    geo: web::Data<GeoState>,
    session: Session,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let jar_id = path.into_inner();
    let conn = pool.get()?;
    let jar = jar::find_by_id(&conn, &jar_id)?.ok_or(AppError::NotFound)?;

    if !accepts_suggestions(jar.phase) {
        set_flash(&session, "Suggestions are closed for this jar");
        return redirect_to_jar(&jar_id);
    }
    if let Err(redirect) = require_member(&session, &conn, &jar_id)? {
        return Ok(redirect);
    }

    let ctx = PageContext::build(&session);
    render(SuggestFormTemplate {
        ctx,
        jar: JarView::from_jar(&jar),
        errors: vec![],
        form: SuggestFormValues::default(),
        location_search_enabled: geo.client.is_some(),
    })
}

/// POST /jar/{id}/suggest
pub async fn suggest_submit(
    pool: web::Data<DbPool>,
    geo: web::Data<GeoState>,
    session: Session,
    path: web::Path<String>,
    form: web::Form<SuggestionForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let jar_id = path.into_inner();
    let conn = pool.get()?;
    let jar = jar::find_by_id(&conn, &jar_id)?.ok_or(AppError::NotFound)?;

    if !accepts_suggestions(jar.phase) {
        set_flash(&session, "Suggestions are closed for this jar");
        return redirect_to_jar(&jar_id);
    }
    let member = match require_member(&session, &conn, &jar_id)? {
        Ok(m) => m,
        Err(redirect) => return Ok(redirect),
    };

    let errors = form.validate();
    if !errors.is_empty() {
        let ctx = PageContext::build(&session);
        return render(SuggestFormTemplate {
            ctx,
            jar: JarView::from_jar(&jar),
            errors,
            form: SuggestFormValues {
                title: form.title.clone(),
                description: form.description.clone(),
                location: form.location.clone(),
            },
            location_search_enabled: geo.client.is_some(),
        });
    }

    let input = match form.to_input() {
        Ok(input) => input,
        Err(e) => {
            let ctx = PageContext::build(&session);
            return render(SuggestFormTemplate {
                ctx,
                jar: JarView::from_jar(&jar),
                errors: vec![e],
                form: SuggestFormValues {
                    title: form.title.clone(),
                    description: form.description.clone(),
                    location: form.location.clone(),
                },
                location_search_enabled: geo.client.is_some(),
            });
        }
    };
    let created = suggestion::create(&conn, &jar_id, &member.id, &input)?;
    log::info!("Suggestion {} added to jar {jar_id}", created.id);

    set_flash(&session, "Suggestion added");
    redirect_to_jar(&jar_id)
}

/// POST /jar/{id}/suggestion/{sid}/delete
/// Members can only remove their own suggestions, and only while suggestions
/// are still open.
pub async fn delete(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<(String, String)>,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let (jar_id, suggestion_id) = path.into_inner();
    let conn = pool.get()?;
    let jar = jar::find_by_id(&conn, &jar_id)?.ok_or(AppError::NotFound)?;

    if !accepts_suggestions(jar.phase) {
        set_flash(&session, "Suggestions are closed for this jar");
        return redirect_to_jar(&jar_id);
    }
    let member = match require_member(&session, &conn, &jar_id)? {
        Ok(m) => m,
        Err(redirect) => return Ok(redirect),
    };

    let target = suggestion::find_by_id(&conn, &suggestion_id)?
        .filter(|s| s.jar_id == jar_id)
        .ok_or(AppError::NotFound)?;
    if target.member_id != member.id {
        set_flash(&session, "You can only remove your own suggestions");
        return redirect_to_jar(&jar_id);
    }

    suggestion::soft_delete(&conn, &target)?;
    set_flash(&session, "Suggestion removed");
    redirect_to_jar(&jar_id)
}
