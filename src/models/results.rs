//! Results aggregation: rank tallied suggestions and flag the winner.
//!
//! The winner flag is decided here, by the authority that computed the tally,
//! and the display layer highlights strictly by the flag. Ordering uses a
//! deterministic tie-break so equal totals never shuffle between loads:
//! higher total first, then earlier submission, then suggestion id.

use serde::Serialize;

use crate::models::vote::TallyRow;

#[derive(Debug, Clone, Serialize)]
pub struct RankedSuggestion {
    pub suggestion_id: String,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub total_points: i64,
    pub vote_count: i64,
    pub is_winner: bool,
}

pub fn rank(rows: Vec<TallyRow>) -> Vec<RankedSuggestion> {
    let mut rows = rows;
    rows.sort_by(|a, b| {
        b.total_points
            .cmp(&a.total_points)
            .then_with(|| a.created_at.cmp(&b.created_at))
            .then_with(|| a.suggestion_id.cmp(&b.suggestion_id))
    });

    rows.into_iter()
        .enumerate()
        .map(|(i, row)| RankedSuggestion {
            suggestion_id: row.suggestion_id,
            title: row.title,
            description: row.description,
            location: row.location,
            total_points: row.total_points,
            vote_count: row.vote_count,
            // Exactly one winner: the top entry after the deterministic sort.
            is_winner: i == 0,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, created_at: &str, total: i64) -> TallyRow {
        TallyRow {
            suggestion_id: id.to_string(),
            title: id.to_uppercase(),
            description: None,
            location: None,
            created_at: created_at.to_string(),
            total_points: total,
            vote_count: 1,
        }
    }

    #[test]
    fn ranks_descending_by_total() {
        let ranked = rank(vec![
            row("x", "2026-01-01 10:00:00", 5),
            row("y", "2026-01-01 10:01:00", 9),
            row("z", "2026-01-01 10:02:00", 9),
        ]);
        assert_eq!(ranked[0].suggestion_id, "y");
        assert_eq!(ranked[1].suggestion_id, "z");
        assert_eq!(ranked[2].suggestion_id, "x");
    }

    #[test]
    fn ties_break_by_submission_time_then_id() {
        let ranked = rank(vec![
            row("b", "2026-01-01 10:00:00", 7),
            row("a", "2026-01-01 10:00:00", 7),
            row("c", "2026-01-01 09:00:00", 7),
        ]);
        assert_eq!(ranked[0].suggestion_id, "c");
        assert_eq!(ranked[1].suggestion_id, "a");
        assert_eq!(ranked[2].suggestion_id, "b");
    }

    #[test]
    fn exactly_one_winner_flag() {
        let ranked = rank(vec![
            row("x", "2026-01-01 10:00:00", 3),
            row("y", "2026-01-01 10:01:00", 9),
            row("z", "2026-01-01 10:02:00", 9),
        ]);
        let winners: Vec<_> = ranked.iter().filter(|r| r.is_winner).collect();
        assert_eq!(winners.len(), 1);
        assert_eq!(winners[0].suggestion_id, "y");
    }

    #[test]
    fn empty_tally_has_no_winner() {
        assert!(rank(Vec::new()).is_empty());
    }
}
