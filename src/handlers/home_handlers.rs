use actix_session::Session;
use actix_web::{web, HttpResponse};

use crate::auth::session::{remember_creator, remember_member, set_flash};
use crate::auth::validate::{normalize_phone, validate_optional, validate_phone, validate_required};
use crate::auth::csrf;
use crate::db::DbPool;
use crate::errors::{render, AppError};
use crate::models::jar::{self, JarForm, NewJar};
use crate::models::member;
use crate::templates_structs::{HomeFormValues, HomeTemplate, PageContext};

/// GET /
/// Landing page with the jar creation form.
pub async fn index(session: Session) -> Result<HttpResponse, AppError> {
    let ctx = PageContext::build(&session);
    render(HomeTemplate {
        ctx,
        errors: vec![],
        form: HomeFormValues::default(),
    })
}

/// POST /jars
/// Creates a jar. When a creator phone is given the creator is auto-joined
/// as "Host"; either way this browser remembers it created the jar.
pub async fn create(
    pool: web::Data<DbPool>,
    session: Session,
    form: web::Form<JarForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let mut errors = Vec::new();
    if let Some(e) = validate_required(&form.title, "Title", 200) {
        errors.push(e);
    }
    if let Some(e) = validate_optional(&form.description, "Description", 2000) {
        errors.push(e);
    }
    if !form.creator_phone.trim().is_empty() {
        if let Some(e) = validate_phone(&form.creator_phone) {
            errors.push(e);
        }
    }

    if !errors.is_empty() {
        let ctx = PageContext::build(&session);
        return render(HomeTemplate {
            ctx,
            errors,
            form: HomeFormValues {
                title: form.title.clone(),
                description: form.description.clone(),
                creator_phone: form.creator_phone.clone(),
                suggestion_deadline: form.suggestion_deadline.clone(),
                voting_deadline: form.voting_deadline.clone(),
            },
        });
    }

    let creator_phone = if form.creator_phone.trim().is_empty() {
        None
    } else {
        Some(normalize_phone(&form.creator_phone))
    };

    let conn = pool.get()?;
    let new = NewJar {
        title: form.title.trim().to_string(),
        description: opt(&form.description),
        suggestion_deadline: jar::parse_deadline_input(&form.suggestion_deadline),
        voting_deadline: jar::parse_deadline_input(&form.voting_deadline),
        creator_phone: creator_phone.clone(),
    };
    let created = jar::create(&conn, &new)?;
    log::info!("Created jar {} ('{}')", created.id, created.title);

    if let Some(phone) = creator_phone {
        let host = member::join(&conn, &created.id, &phone, Some("Host"))?;
        remember_member(&session, &created.id, &host.id);
    }
    remember_creator(&session, &created.id);

    set_flash(&session, "Jar created. Share the link to invite your group.");
    Ok(HttpResponse::SeeOther()
        .insert_header(("Location", format!("/jar/{}", created.id)))
        .finish())
}

fn opt(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
