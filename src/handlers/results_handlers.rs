use actix_session::Session;
use actix_web::{web, HttpResponse};

use crate::auth::session::set_flash;
use crate::db::DbPool;
use crate::errors::{render, AppError};
use crate::handlers::jar_handlers::redirect_to_jar;
use crate::models::jar::{self, Phase};
use crate::models::results;
use crate::models::vote;
use crate::templates_structs::{JarView, PageContext, ResultRowView, ResultsTemplate};

/// GET /jar/{id}/results
/// Ranked standings. During voting the page is a live preview; once the jar
/// completes the same ranking is final. Earlier phases have nothing to show.
pub async fn view(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let jar_id = path.into_inner();
    let conn = pool.get()?;
    let jar = jar::find_by_id(&conn, &jar_id)?.ok_or(AppError::NotFound)?;
    let jar = jar::check_deadlines(&conn, jar)?;

    if !matches!(jar.phase, Phase::Voting | Phase::Completed) {
        set_flash(&session, "Results are not available yet");
        return redirect_to_jar(&jar_id);
    }

    let ranked = results::rank(vote::tally_for_jar(&conn, &jar_id)?);
    let ctx = PageContext::build(&session);
    render(ResultsTemplate {
        ctx,
        jar: JarView::from_jar(&jar),
        rows: ResultRowView::from_ranked(ranked),
        live: jar.phase == Phase::Voting,
    })
}
