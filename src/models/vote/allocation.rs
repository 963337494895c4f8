//! In-memory model of one member's ballot: a fixed point budget distributed
//! across the loaded candidates.
//!
//! The update rule is reject-don't-clamp: an update that would push the total
//! over the budget leaves the allocation untouched, and the caller retries
//! with a smaller value. After every accepted update the running total never
//! exceeds the budget.

/// One entry of a submitted ballot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BallotEntry {
    pub suggestion_id: String,
    pub points: i64,
}

#[derive(Debug, Clone)]
pub struct Allocation {
    budget: i64,
    // Candidate load order is preserved; the ballot is emitted in this order.
    entries: Vec<(String, i64)>,
}

impl Allocation {
    /// Start an allocation over the loaded candidates, all at zero.
    pub fn for_candidates<I, S>(budget: i64, candidates: I) -> Allocation
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Allocation {
            budget: budget.max(0),
            entries: candidates.into_iter().map(|id| (id.into(), 0)).collect(),
        }
    }

    pub fn budget(&self) -> i64 {
        self.budget
    }

    pub fn get(&self, suggestion_id: &str) -> i64 {
        self.entries
            .iter()
            .find(|(id, _)| id == suggestion_id)
            .map(|(_, points)| *points)
            .unwrap_or(0)
    }

    pub fn allocated(&self) -> i64 {
        self.entries.iter().map(|(_, points)| points).sum()
    }

    pub fn remaining(&self) -> i64 {
        self.budget - self.allocated()
    }

    /// Set one candidate's points. Negative values are clamped to zero.
    /// Returns false (leaving state unchanged) when the candidate is unknown
    /// or the hypothetical total would exceed the budget.
    pub fn set(&mut self, suggestion_id: &str, value: i64) -> bool {
        let value = value.max(0);
        let Some(index) = self.entries.iter().position(|(id, _)| id == suggestion_id) else {
            return false;
        };
        // Form input can carry any i64, so the hypothetical total is computed
        // with checked arithmetic. A value too large to even represent next to
        // the rest of the ballot is over budget by definition.
        let Some(hypothetical) = self
            .allocated()
            .checked_sub(self.entries[index].1)
            .and_then(|rest| rest.checked_add(value))
        else {
            return false;
        };
        if hypothetical > self.budget {
            return false;
        }
        self.entries[index].1 = value;
        true
    }

    /// Whether the budget is exactly spent (the default submit gate).
    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    /// The submittable ballot: only positive entries, in candidate order. An
    /// omitted entry and an explicit zero are identical to the tallier.
    pub fn ballot(&self) -> Vec<BallotEntry> {
        self.entries
            .iter()
            .filter(|(_, points)| *points > 0)
            .map(|(id, points)| BallotEntry {
                suggestion_id: id.clone(),
                points: *points,
            })
            .collect()
    }
}

/// Parse a form field into a point value. Anything that is not a finite
/// non-negative integer comes out as zero.
pub fn parse_points(raw: &str) -> i64 {
    raw.trim().parse::<i64>().unwrap_or(0).max(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alloc(budget: i64) -> Allocation {
        Allocation::for_candidates(budget, ["a", "b", "c"])
    }

    #[test]
    fn accepted_updates_keep_total_within_budget() {
        let mut a = alloc(10);
        assert!(a.set("a", 4));
        assert_eq!(a.remaining(), 6);
        assert!(a.set("b", 6));
        assert_eq!(a.remaining(), 0);
        assert!(a.is_exhausted());
    }

    #[test]
    fn over_budget_update_is_rejected_and_state_unchanged() {
        let mut a = alloc(10);
        assert!(a.set("a", 6));
        assert!(!a.set("b", 5));
        assert_eq!(a.get("a"), 6);
        assert_eq!(a.get("b"), 0);
        assert_eq!(a.remaining(), 4);
    }

    #[test]
    fn replacing_an_allocation_counts_the_replacement_not_the_sum() {
        let mut a = alloc(10);
        assert!(a.set("a", 6));
        // 6 -> 9 is fine even though 6 + 9 > 10.
        assert!(a.set("a", 9));
        assert_eq!(a.remaining(), 1);
    }

    #[test]
    fn zeroing_returns_points_and_drops_the_entry_from_the_ballot() {
        let mut a = alloc(10);
        assert!(a.set("a", 4));
        assert!(a.set("a", 0));
        assert_eq!(a.remaining(), 10);
        assert!(a.ballot().is_empty());
    }

    #[test]
    fn ballot_is_ordered_and_positive_only() {
        let mut a = alloc(10);
        assert!(a.set("c", 6));
        assert!(a.set("a", 4));
        let ballot = a.ballot();
        assert_eq!(ballot.len(), 2);
        assert_eq!(ballot[0].suggestion_id, "a");
        assert_eq!(ballot[0].points, 4);
        assert_eq!(ballot[1].suggestion_id, "c");
        assert_eq!(ballot[1].points, 6);
    }

    #[test]
    fn unknown_candidate_is_rejected() {
        let mut a = alloc(10);
        assert!(!a.set("nope", 1));
        assert_eq!(a.remaining(), 10);
    }

    #[test]
    fn negative_values_clamp_to_zero() {
        let mut a = alloc(10);
        assert!(a.set("a", 5));
        assert!(a.set("a", -3));
        assert_eq!(a.get("a"), 0);
        assert_eq!(a.remaining(), 10);
    }

    #[test]
    fn enormous_values_are_rejected_not_wrapped() {
        let mut a = alloc(10);
        assert!(a.set("a", 5));
        // i64::MAX would overflow a naive running total and wrap negative,
        // slipping past the budget check.
        assert!(!a.set("b", i64::MAX));
        assert_eq!(a.get("a"), 5);
        assert_eq!(a.get("b"), 0);
        assert_eq!(a.remaining(), 5);
    }

    #[test]
    fn garbage_form_input_parses_to_zero() {
        assert_eq!(parse_points(""), 0);
        assert_eq!(parse_points("abc"), 0);
        assert_eq!(parse_points("3.5"), 0);
        assert_eq!(parse_points("-2"), 0);
        assert_eq!(parse_points(" 7 "), 7);
    }
}
