//! Display-name resolution for link shares.

/// Resolve the name shown for a link share.
///
/// A non-empty user-given name wins. Otherwise single-link servers show the
/// generic `default_label`, and multi-link servers show the token so that
/// unnamed links remain distinguishable.
pub fn display_name(
    name: Option<&str>,
    token: &str,
    names_supported: bool,
    default_label: &str,
) -> String {
    match name {
        Some(name) if !name.is_empty() => name.to_string(),
        _ if !names_supported => default_label.to_string(),
        _ => token.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_wins() {
        assert_eq!(display_name(Some("Team"), "tok", true, "Public link"), "Team");
        assert_eq!(display_name(Some("Team"), "tok", false, "Public link"), "Team");
    }

    #[test]
    fn test_unnamed_single_link_uses_label() {
        assert_eq!(display_name(None, "tok", false, "Public link"), "Public link");
        assert_eq!(display_name(Some(""), "tok", false, "Public link"), "Public link");
    }

    #[test]
    fn test_unnamed_multi_link_uses_token() {
        assert_eq!(display_name(None, "tok", true, "Public link"), "tok");
    }
}
