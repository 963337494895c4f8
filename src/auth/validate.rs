/// Validate a required text field with a max length.
pub fn validate_required(value: &str, field_name: &str, max_len: usize) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Some(format!("{field_name} is required"));
    }
    if trimmed.len() > max_len {
        return Some(format!("{field_name} must be at most {max_len} characters"));
    }
    None
}

/// Validate an optional text field with a max length (empty is OK).
pub fn validate_optional(value: &str, field_name: &str, max_len: usize) -> Option<String> {
    let trimmed = value.trim();
    if !trimmed.is_empty() && trimmed.len() > max_len {
        return Some(format!("{field_name} must be at most {max_len} characters"));
    }
    None
}

/// Strip a phone number down to digits and a leading '+'.
pub fn normalize_phone(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect()
}

/// Validate a phone number: required, 7-15 digits after normalization.
pub fn validate_phone(value: &str) -> Option<String> {
    let normalized = normalize_phone(value);
    let digits = normalized.chars().filter(|c| c.is_ascii_digit()).count();
    if digits == 0 {
        return Some("Phone number is required".to_string());
    }
    if !(7..=15).contains(&digits) {
        return Some("Phone number must have 7 to 15 digits".to_string());
    }
    None
}
