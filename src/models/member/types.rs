use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct Member {
    pub id: String,
    pub jar_id: String,
    pub phone_number: String,
    pub display_name: Option<String>,
    pub has_suggested: bool,
    pub has_voted: bool,
    pub is_active: bool,
    pub joined_at: String,
    pub last_active: String,
}

impl Member {
    /// Host check: the member's normalized phone matches the jar creator's.
    pub fn is_host_of(&self, creator_phone: Option<&str>) -> bool {
        match creator_phone {
            Some(phone) if !phone.is_empty() => {
                crate::auth::validate::normalize_phone(phone) == self.phone_number
            }
            _ => false,
        }
    }
}

/// Anonymized row for the participant list: flags, no phone.
#[derive(Debug, Clone, Serialize)]
pub struct MemberStatus {
    pub id: String,
    pub display_name: String,
    pub has_suggested: bool,
    pub has_voted: bool,
}

#[derive(Debug, Deserialize)]
pub struct JoinForm {
    pub phone_number: String,
    #[serde(default)]
    pub display_name: String,
    pub csrf_token: String,
}
