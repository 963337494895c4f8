// Template context structures for Askama templates, organized by domain.
// All types are re-exported: `use picklejar::templates_structs::*`

use actix_session::Session;

use crate::auth::csrf;
use crate::auth::session::take_flash;
use crate::models::jar::Jar;
use crate::models::member::Member;

/// Common context shared by all pages. Templates access these as
/// `ctx.app_name`, `ctx.flash`, `ctx.csrf_token`.
pub struct PageContext {
    pub app_name: String,
    pub flash: String,
    pub csrf_token: String,
}

impl PageContext {
    pub fn build(session: &Session) -> Self {
        let app_name =
            std::env::var("APP_NAME").unwrap_or_else(|_| "PickleJar".to_string());
        let flash = take_flash(session).unwrap_or_default();
        let csrf_token = csrf::get_or_create_token(session);
        Self {
            app_name,
            flash,
            csrf_token,
        }
    }
}

/// Display-ready jar fields (no Options; empty strings render as absent).
pub struct JarView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: String,
    pub phase_label: String,
    pub points_per_voter: i64,
    pub suggestion_deadline: String,
    pub voting_deadline: String,
    // datetime-local values for the edit form
    pub suggestion_deadline_input: String,
    pub voting_deadline_input: String,
}

impl JarView {
    pub fn from_jar(jar: &Jar) -> Self {
        Self {
            id: jar.id.clone(),
            title: jar.title.clone(),
            description: jar.description.clone().unwrap_or_default(),
            status: jar.phase.as_str().to_string(),
            phase_label: jar.phase.label().to_string(),
            points_per_voter: jar.points_per_voter,
            suggestion_deadline: jar.suggestion_deadline.clone().unwrap_or_default(),
            voting_deadline: jar.voting_deadline.clone().unwrap_or_default(),
            suggestion_deadline_input: crate::models::jar::deadline_to_input(
                jar.suggestion_deadline.as_deref(),
            ),
            voting_deadline_input: crate::models::jar::deadline_to_input(
                jar.voting_deadline.as_deref(),
            ),
        }
    }
}

/// The visitor's standing in the jar. `joined` is false for anonymous
/// visitors; the remaining fields are then blank.
pub struct ViewerView {
    pub joined: bool,
    pub member_id: String,
    pub display_name: String,
    pub is_host: bool,
    pub has_suggested: bool,
    pub has_voted: bool,
}

impl ViewerView {
    pub fn anonymous(is_local_creator: bool) -> Self {
        Self {
            joined: false,
            member_id: String::new(),
            display_name: String::new(),
            is_host: is_local_creator,
            has_suggested: false,
            has_voted: false,
        }
    }

    pub fn from_member(member: &Member, creator_phone: Option<&str>, is_local_creator: bool) -> Self {
        Self {
            joined: true,
            member_id: member.id.clone(),
            display_name: member.display_name.clone().unwrap_or_default(),
            is_host: is_local_creator || member.is_host_of(creator_phone),
            has_suggested: member.has_suggested,
            has_voted: member.has_voted,
        }
    }
}

mod common;
mod jar;
mod results;
mod suggestion;
mod vote;

pub use self::common::{HomeFormValues, HomeTemplate};
pub use self::jar::{
    JarCancelledTemplate, JarCompletedTemplate, JarEditTemplate, JarSetupTemplate,
    JarSuggestingTemplate, JarVotingTemplate, JoinTemplate,
};
pub use self::results::{ResultRowView, ResultsTemplate};
pub use self::suggestion::{SuggestFormTemplate, SuggestFormValues, SuggestionView};
pub use self::vote::{VoteRowView, VoteTemplate};
