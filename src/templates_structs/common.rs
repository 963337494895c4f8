use askama::Template;

use super::PageContext;

/// Echoed values for the create form so input survives a validation error.
#[derive(Default)]
pub struct HomeFormValues {
    pub title: String,
    pub description: String,
    pub creator_phone: String,
    pub suggestion_deadline: String,
    pub voting_deadline: String,
}

#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub ctx: PageContext,
    pub errors: Vec<String>,
    pub form: HomeFormValues,
}
