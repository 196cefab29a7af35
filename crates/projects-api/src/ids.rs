use rand::Rng;

/// Generate a fresh project id: 12 random bytes hex-encoded to 24
/// characters. Collisions are not checked; 96 bits of entropy makes them
/// practically impossible.
pub fn generate_project_id() -> String {
    let bytes: [u8; 12] = rand::rng().random();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_is_24_lowercase_hex_chars() {
        let id = generate_project_id();
        assert_eq!(id.len(), 24);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn ids_are_distinct_across_calls() {
        let a = generate_project_id();
        let b = generate_project_id();
        assert_ne!(a, b);
    }
}
