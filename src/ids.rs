use rand::Rng;

/// Short, URL-friendly jar id (8 hex chars) used in shareable links.
pub fn new_jar_id() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 4] = rng.random();
    hex::encode(bytes)
}

/// Opaque 32-char id for members, suggestions, and votes.
pub fn new_id() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 16] = rng.random();
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jar_ids_are_short_and_unique() {
        let a = new_jar_id();
        let b = new_jar_id();
        assert_eq!(a.len(), 8);
        assert_ne!(a, b);
    }

    #[test]
    fn ids_are_hex() {
        let id = new_id();
        assert_eq!(id.len(), 32);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
