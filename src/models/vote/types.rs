use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Vote {
    pub id: String,
    pub jar_id: String,
    pub member_id: String,
    pub suggestion_id: String,
    pub points: i64,
    pub created_at: String,
}

/// Business rules applied at ballot submission. `allow_underspend` relaxes
/// the exact-spend gate; the observed product behavior is to require the full
/// budget, so the default denies underspending.
#[derive(Debug, Clone, Copy)]
pub struct VoteRules {
    pub allow_underspend: bool,
}

impl Default for VoteRules {
    fn default() -> Self {
        VoteRules {
            allow_underspend: false,
        }
    }
}

impl VoteRules {
    pub fn from_env() -> Self {
        let allow_underspend = std::env::var("ALLOW_UNDERSPEND")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        VoteRules { allow_underspend }
    }
}

/// Per-suggestion totals straight out of the tally query, in submission order.
#[derive(Debug, Clone)]
pub struct TallyRow {
    pub suggestion_id: String,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub created_at: String,
    pub total_points: i64,
    pub vote_count: i64,
}
