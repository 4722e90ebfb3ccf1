//! Structural input validation helpers

/// Structural check that a string is email-shaped.
///
/// One `@`, non-empty local part, dotted domain, no whitespace. This is a
/// shape check only; nothing here verifies the address exists or belongs
/// to a registered user.
pub fn is_email_shaped(s: &str) -> bool {
    if s.len() > 254 || s.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }
    // Domain needs at least one interior dot
    match domain.split_once('.') {
        Some((head, tail)) => !head.is_empty() && !tail.is_empty() && !domain.ends_with('.'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plausible_addresses() {
        for s in [
            "artist@example.com",
            "a.b+c@label.example.co.uk",
            "x@y.io",
        ] {
            assert!(is_email_shaped(s), "rejected {s:?}");
        }
    }

    #[test]
    fn rejects_malformed_addresses() {
        for s in [
            "",
            "no-at-sign",
            "@example.com",
            "user@",
            "user@nodot",
            "user@dot.",
            "two@@example.com",
            "spa ce@example.com",
        ] {
            assert!(!is_email_shaped(s), "accepted {s:?}");
        }
    }
}
