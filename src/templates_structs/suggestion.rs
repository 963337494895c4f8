use askama::Template;

use super::{JarView, PageContext};
use crate::models::suggestion::Suggestion;

/// Display row for the suggestion list. Suggestions stay anonymous; `mine`
/// only marks the viewer's own entries so they can delete them.
pub struct SuggestionView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub location: String,
    pub mine: bool,
}

impl SuggestionView {
    pub fn from_suggestion(s: &Suggestion, viewer_member_id: &str) -> Self {
        Self {
            id: s.id.clone(),
            title: s.title.clone(),
            description: s.description.clone().unwrap_or_default(),
            location: s.location.clone().unwrap_or_default(),
            mine: !viewer_member_id.is_empty() && s.member_id == viewer_member_id,
        }
    }
}

/// Echoed values for the suggest form.
#[derive(Default)]
pub struct SuggestFormValues {
    pub title: String,
    pub description: String,
    pub location: String,
}

#[derive(Template)]
#[template(path = "suggest.html")]
pub struct SuggestFormTemplate {
    pub ctx: PageContext,
    pub jar: JarView,
    pub errors: Vec<String>,
    pub form: SuggestFormValues,
    pub location_search_enabled: bool,
}
