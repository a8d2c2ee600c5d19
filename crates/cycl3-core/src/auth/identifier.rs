/// Domain appended to bare usernames
pub const DEFAULT_HANDLE_DOMAIN: &str = "bsky.social";

/// Normalize a login identifier.
///
/// A leading `@` is dropped. A bare name with neither `.` nor `@` gets the
/// default handle domain appended; handles, custom domains and email
/// addresses are otherwise left as typed.
pub fn format_identifier(identifier: &str) -> String {
    let identifier = identifier.strip_prefix('@').unwrap_or(identifier);
    if identifier.contains('.') || identifier.contains('@') {
        identifier.to_string()
    } else {
        format!("{}.{}", identifier, DEFAULT_HANDLE_DOMAIN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_name_gets_default_domain() {
        assert_eq!(format_identifier("alice"), "alice.bsky.social");
        assert_eq!(format_identifier("@alice"), "alice.bsky.social");
        assert_eq!(format_identifier("bob_42"), "bob_42.bsky.social");
    }

    #[test]
    fn test_handles_and_emails_unchanged() {
        assert_eq!(format_identifier("alice.bsky.social"), "alice.bsky.social");
        assert_eq!(format_identifier("@alice.example.com"), "alice.example.com");
        assert_eq!(format_identifier("alice@example.com"), "alice@example.com");
        assert_eq!(format_identifier("did:plc:abc.def"), "did:plc:abc.def");
    }

    #[test]
    fn test_only_leading_at_is_stripped() {
        assert_eq!(format_identifier("@@alice"), "@alice");
        assert_eq!(format_identifier("a@b"), "a@b");
    }

    #[test]
    fn test_property_over_sample_identifiers() {
        let samples = ["x", "@x", "x.y", "@x.y", "x@y", "@x@y", "", "@", "a-b_c", "ü.ber"];
        for raw in samples {
            let stripped = raw.strip_prefix('@').unwrap_or(raw);
            let formatted = format_identifier(raw);
            if stripped.contains('.') || stripped.contains('@') {
                assert_eq!(formatted, stripped, "{raw:?} should be unchanged");
            } else {
                assert_eq!(formatted, format!("{stripped}.bsky.social"), "{raw:?} should get suffix");
            }
        }
    }
}
