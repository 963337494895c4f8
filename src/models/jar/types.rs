use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Lifecycle phase of a jar. Dispatch over this enum is exhaustive; the only
/// lossy edge is `parse`, which degrades unrecognized stored text to `Setup`
/// so a jar page never turns into an error page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Setup,
    Suggesting,
    Voting,
    Completed,
    Cancelled,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Setup => "setup",
            Phase::Suggesting => "suggesting",
            Phase::Voting => "voting",
            Phase::Completed => "completed",
            Phase::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Phase {
        match s {
            "setup" => Phase::Setup,
            "suggesting" => Phase::Suggesting,
            "voting" => Phase::Voting,
            "completed" => Phase::Completed,
            "cancelled" => Phase::Cancelled,
            other => {
                log::warn!("Unknown jar status '{other}', treating as setup");
                Phase::Setup
            }
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Phase::Setup => "Getting set up",
            Phase::Suggesting => "Collecting suggestions",
            Phase::Voting => "Voting",
            Phase::Completed => "Completed",
            Phase::Cancelled => "Cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Completed | Phase::Cancelled)
    }
}

/// Administrative phase actions. Every transition is an explicit action with a
/// named required phase rather than a free-form status write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseAction {
    StartSuggesting,
    StartVoting,
    Complete,
    RevertToSetup,
    RevertToSuggesting,
    RevertToVoting,
    Cancel,
}

impl PhaseAction {
    pub fn from_slug(slug: &str) -> Option<PhaseAction> {
        match slug {
            "start-suggesting" => Some(PhaseAction::StartSuggesting),
            "start-voting" => Some(PhaseAction::StartVoting),
            "complete" => Some(PhaseAction::Complete),
            "revert-to-setup" => Some(PhaseAction::RevertToSetup),
            "revert-to-suggesting" => Some(PhaseAction::RevertToSuggesting),
            "revert-to-voting" => Some(PhaseAction::RevertToVoting),
            "cancel" => Some(PhaseAction::Cancel),
            _ => None,
        }
    }

    /// The phase a jar must be in for this action to apply. `None` means any
    /// non-terminal phase (cancel).
    pub fn required_phase(&self) -> Option<Phase> {
        match self {
            PhaseAction::StartSuggesting => Some(Phase::Setup),
            PhaseAction::StartVoting => Some(Phase::Suggesting),
            PhaseAction::Complete => Some(Phase::Voting),
            PhaseAction::RevertToSetup => Some(Phase::Suggesting),
            PhaseAction::RevertToSuggesting => Some(Phase::Voting),
            PhaseAction::RevertToVoting => Some(Phase::Completed),
            PhaseAction::Cancel => None,
        }
    }

    pub fn target(&self) -> Phase {
        match self {
            PhaseAction::StartSuggesting => Phase::Suggesting,
            PhaseAction::StartVoting => Phase::Voting,
            PhaseAction::Complete => Phase::Completed,
            PhaseAction::RevertToSetup => Phase::Setup,
            PhaseAction::RevertToSuggesting => Phase::Suggesting,
            PhaseAction::RevertToVoting => Phase::Voting,
            PhaseAction::Cancel => Phase::Cancelled,
        }
    }

    pub fn allowed_from(&self, phase: Phase) -> bool {
        match self.required_phase() {
            Some(required) => phase == required,
            None => !phase.is_terminal(),
        }
    }

    pub fn success_message(&self) -> &'static str {
        match self {
            PhaseAction::StartSuggesting => "Suggesting phase started",
            PhaseAction::StartVoting => "Voting phase started",
            PhaseAction::Complete => "Jar completed, results are in",
            PhaseAction::RevertToSetup => "Reverted to setup",
            PhaseAction::RevertToSuggesting => "Suggestions reopened",
            PhaseAction::RevertToVoting => "Voting reopened",
            PhaseAction::Cancel => "Jar cancelled",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Jar {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub phase: Phase,
    pub points_per_voter: i64,
    pub suggestion_deadline: Option<String>,
    pub voting_deadline: Option<String>,
    pub creator_phone: Option<String>,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Participation counts shown on the jar page.
#[derive(Debug, Clone, Default, Serialize)]
pub struct JarCounts {
    pub members: i64,
    pub suggestions: i64,
    pub members_suggested: i64,
    pub members_voted: i64,
}

#[derive(Debug, Clone)]
pub struct NewJar {
    pub title: String,
    pub description: Option<String>,
    pub suggestion_deadline: Option<String>,
    pub voting_deadline: Option<String>,
    pub creator_phone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct JarForm {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub creator_phone: String,
    #[serde(default)]
    pub suggestion_deadline: String,
    #[serde(default)]
    pub voting_deadline: String,
    pub csrf_token: String,
}

#[derive(Debug, Deserialize)]
pub struct JarEditForm {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub suggestion_deadline: String,
    #[serde(default)]
    pub voting_deadline: String,
    pub csrf_token: String,
}

/// Budget rule applied when voting opens: one point fewer than the number of
/// suggestions, never below one.
pub fn derived_budget(suggestion_count: i64) -> i64 {
    (suggestion_count - 1).max(1)
}

/// Parse an HTML `datetime-local` input into the storage format. Empty input
/// is no deadline; unparseable input is treated the same.
pub fn parse_deadline_input(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M")
        .ok()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
}

/// Format a stored deadline back into `datetime-local` input form, for
/// pre-filling the edit form. Unparseable values come back empty.
pub fn deadline_to_input(stored: Option<&str>) -> String {
    stored
        .and_then(|s| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").ok())
        .map(|dt| dt.format("%Y-%m-%dT%H:%M").to_string())
        .unwrap_or_default()
}

/// Whether a stored deadline lies in the past.
pub fn deadline_passed(deadline: &str, now: NaiveDateTime) -> bool {
    NaiveDateTime::parse_from_str(deadline, "%Y-%m-%d %H:%M:%S")
        .map(|dt| now > dt)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_degrades_unknown_status_to_setup() {
        assert_eq!(Phase::parse("voting"), Phase::Voting);
        assert_eq!(Phase::parse("definitely-not-a-phase"), Phase::Setup);
    }

    #[test]
    fn actions_check_required_phase() {
        assert!(PhaseAction::StartVoting.allowed_from(Phase::Suggesting));
        assert!(!PhaseAction::StartVoting.allowed_from(Phase::Voting));
        assert!(PhaseAction::Cancel.allowed_from(Phase::Setup));
        assert!(PhaseAction::Cancel.allowed_from(Phase::Voting));
        assert!(!PhaseAction::Cancel.allowed_from(Phase::Completed));
    }

    #[test]
    fn budget_is_one_less_than_suggestions_min_one() {
        assert_eq!(derived_budget(0), 1);
        assert_eq!(derived_budget(1), 1);
        assert_eq!(derived_budget(5), 4);
    }

    #[test]
    fn deadline_input_roundtrip() {
        assert_eq!(
            parse_deadline_input("2026-09-01T18:30").as_deref(),
            Some("2026-09-01 18:30:00")
        );
        assert_eq!(parse_deadline_input(""), None);
        assert_eq!(parse_deadline_input("tomorrow-ish"), None);
        assert_eq!(deadline_to_input(Some("2026-09-01 18:30:00")), "2026-09-01T18:30");
        assert_eq!(deadline_to_input(None), "");
    }
}
