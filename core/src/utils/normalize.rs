//! Normalization and validation helpers for free-text fields.

/// Normalize whitespace by collapsing runs to a single ASCII space and
/// trimming the ends, the way names arriving over the wire are cleaned up
/// before length validation.
pub fn normalize_ws(input: impl Into<String>) -> String {
    let mapped: String = input
        .into()
        .chars()
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .collect();

    let mut out = String::with_capacity(mapped.len());
    let mut last_space = false;
    for ch in mapped.chars() {
        if ch == ' ' {
            if !last_space {
                out.push(' ');
                last_space = true;
            }
        } else {
            out.push(ch);
            last_space = false;
        }
    }
    out.trim().to_string()
}

/// Validates a participant/room display name: normalized length 1..=max.
pub fn valid_name(name: &str, max: usize) -> bool {
    let n = normalize_ws(name);
    !n.is_empty() && n.chars().count() <= max
}

/// Validates a room slug: ASCII lowercase letters, digits, hyphen, 1..=64.
pub fn valid_room_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug.len() <= 64
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ws_collapses_and_trims() {
        assert_eq!(normalize_ws("  a   b  "), "a b");
    }

    #[test]
    fn name_length_bounds() {
        assert!(valid_name("Alice", 100));
        assert!(!valid_name("   ", 100));
        assert!(!valid_name(&"x".repeat(101), 100));
        assert!(valid_name(&"x".repeat(100), 100));
    }

    #[test]
    fn slug_rules() {
        assert!(valid_room_slug("my-room-42"));
        assert!(!valid_room_slug("My-Room"));
        assert!(!valid_room_slug(""));
        assert!(!valid_room_slug(&"a".repeat(65)));
    }
}
