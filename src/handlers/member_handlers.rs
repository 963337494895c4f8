use actix_session::Session;
use actix_web::{web, HttpResponse};

use crate::auth::csrf;
use crate::auth::session::{forget_member, remember_member, resolve_member, set_flash};
use crate::auth::validate::{normalize_phone, validate_optional, validate_phone};
use crate::db::DbPool;
use crate::errors::{render, AppError};
use crate::handlers::jar_handlers::redirect_to_jar;
use crate::models::jar;
use crate::models::member::{self, JoinForm};
use crate::templates_structs::{JarView, JoinTemplate, PageContext};

/// GET /jar/{id}/join
pub async fn join_form(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let jar_id = path.into_inner();
    let conn = pool.get()?;
    let jar = jar::find_by_id(&conn, &jar_id)?.ok_or(AppError::NotFound)?;

    if jar.phase.is_terminal() {
        set_flash(&session, "This jar is closed to new members");
        return redirect_to_jar(&jar_id);
    }
    if resolve_member(&session, &conn, &jar_id)?.is_some() {
        return redirect_to_jar(&jar_id);
    }

    let ctx = PageContext::build(&session);
    render(JoinTemplate {
        ctx,
        jar: JarView::from_jar(&jar),
        errors: vec![],
        phone_number: String::new(),
        display_name: String::new(),
    })
}

/// POST /jar/{id}/join
/// Joining is idempotent per phone number: a returning member gets their
/// existing record back instead of a duplicate.
pub async fn join_submit(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<String>,
    form: web::Form<JoinForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let jar_id = path.into_inner();
    let conn = pool.get()?;
    let jar = jar::find_by_id(&conn, &jar_id)?.ok_or(AppError::NotFound)?;

    if jar.phase.is_terminal() {
        set_flash(&session, "This jar is closed to new members");
        return redirect_to_jar(&jar_id);
    }

    let mut errors = Vec::new();
    if let Some(e) = validate_phone(&form.phone_number) {
        errors.push(e);
    }
    if let Some(e) = validate_optional(&form.display_name, "Name", 100) {
        errors.push(e);
    }

    if !errors.is_empty() {
        let ctx = PageContext::build(&session);
        return render(JoinTemplate {
            ctx,
            jar: JarView::from_jar(&jar),
            errors,
            phone_number: form.phone_number.clone(),
            display_name: form.display_name.clone(),
        });
    }

    let phone = normalize_phone(&form.phone_number);
    let display_name = form.display_name.trim();
    let joined = member::join(
        &conn,
        &jar_id,
        &phone,
        (!display_name.is_empty()).then_some(display_name),
    )?;
    remember_member(&session, &jar_id, &joined.id);
    log::info!("Member {} joined jar {jar_id}", joined.id);

    set_flash(&session, "You're in");
    redirect_to_jar(&jar_id)
}

/// POST /jar/{id}/leave
pub async fn leave(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<String>,
    form: web::Form<super::jar_handlers::CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let jar_id = path.into_inner();
    let conn = pool.get()?;
    if let Some(m) = resolve_member(&session, &conn, &jar_id)? {
        member::leave(&conn, &m.id)?;
        forget_member(&session, &jar_id);
        set_flash(&session, "You have left the jar");
    }
    redirect_to_jar(&jar_id)
}
