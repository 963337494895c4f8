use askama::Template;

use super::{JarView, PageContext};
use crate::models::results::RankedSuggestion;

pub struct ResultRowView {
    pub rank: usize,
    pub title: String,
    pub description: String,
    pub location: String,
    pub total_points: i64,
    pub vote_count: i64,
    pub is_winner: bool,
}

impl ResultRowView {
    pub fn from_ranked(ranked: Vec<RankedSuggestion>) -> Vec<ResultRowView> {
        ranked
            .into_iter()
            .enumerate()
            .map(|(i, r)| ResultRowView {
                rank: i + 1,
                title: r.title,
                description: r.description.unwrap_or_default(),
                location: r.location.unwrap_or_default(),
                total_points: r.total_points,
                vote_count: r.vote_count,
                is_winner: r.is_winner,
            })
            .collect()
    }
}

#[derive(Template)]
#[template(path = "results.html")]
pub struct ResultsTemplate {
    pub ctx: PageContext,
    pub jar: JarView,
    pub rows: Vec<ResultRowView>,
    pub live: bool,
}
