use askama::Template;

use super::{JarView, PageContext};

/// One allocation row on the voting panel.
pub struct VoteRowView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub points: i64,
}

#[derive(Template)]
#[template(path = "vote.html")]
pub struct VoteTemplate {
    pub ctx: PageContext,
    pub jar: JarView,
    pub errors: Vec<String>,
    pub rows: Vec<VoteRowView>,
    pub budget: i64,
    pub remaining: i64,
    pub allow_underspend: bool,
}
