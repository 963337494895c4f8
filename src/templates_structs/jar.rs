use askama::Template;

use super::results::ResultRowView;
use super::suggestion::SuggestionView;
use super::{JarView, PageContext, ViewerView};
use crate::models::jar::JarCounts;
use crate::models::member::MemberStatus;

#[derive(Template)]
#[template(path = "jar/setup.html")]
pub struct JarSetupTemplate {
    pub ctx: PageContext,
    pub jar: JarView,
    pub counts: JarCounts,
    pub members: Vec<MemberStatus>,
    pub viewer: ViewerView,
}

#[derive(Template)]
#[template(path = "jar/suggesting.html")]
pub struct JarSuggestingTemplate {
    pub ctx: PageContext,
    pub jar: JarView,
    pub counts: JarCounts,
    pub members: Vec<MemberStatus>,
    pub viewer: ViewerView,
    pub suggestions: Vec<SuggestionView>,
}

#[derive(Template)]
#[template(path = "jar/voting.html")]
pub struct JarVotingTemplate {
    pub ctx: PageContext,
    pub jar: JarView,
    pub counts: JarCounts,
    pub members: Vec<MemberStatus>,
    pub viewer: ViewerView,
}

#[derive(Template)]
#[template(path = "jar/completed.html")]
pub struct JarCompletedTemplate {
    pub ctx: PageContext,
    pub jar: JarView,
    pub counts: JarCounts,
    pub members: Vec<MemberStatus>,
    pub viewer: ViewerView,
    pub results: Vec<ResultRowView>,
}

#[derive(Template)]
#[template(path = "jar/cancelled.html")]
pub struct JarCancelledTemplate {
    pub ctx: PageContext,
    pub jar: JarView,
    pub counts: JarCounts,
    pub members: Vec<MemberStatus>,
    pub viewer: ViewerView,
}

#[derive(Template)]
#[template(path = "jar/edit.html")]
pub struct JarEditTemplate {
    pub ctx: PageContext,
    pub jar: JarView,
    pub errors: Vec<String>,
}

#[derive(Template)]
#[template(path = "jar/join.html")]
pub struct JoinTemplate {
    pub ctx: PageContext,
    pub jar: JarView,
    pub errors: Vec<String>,
    pub phone_number: String,
    pub display_name: String,
}
