//! Cookie header parsing

use std::collections::HashMap;

/// Cookie carrying the player identifier
pub const USER_COOKIE: &str = "userID";
/// Cookie carrying the session identifier
pub const GAME_COOKIE: &str = "gameID";

/// Parse a `Cookie` header of `key=value` pairs separated by `"; "`.
///
/// Pairs that do not split into exactly one key and one value, or that have
/// an empty side, are skipped.
pub fn extract_cookies(header: &str) -> HashMap<String, String> {
    header
        .split("; ")
        .filter_map(|pair| {
            let mut parts = pair.split('=');
            match (parts.next(), parts.next(), parts.next()) {
                (Some(key), Some(value), None) if !key.is_empty() && !value.is_empty() => {
                    Some((key.to_string(), value.to_string()))
                }
                _ => None,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_cookie() {
        let cookies = extract_cookies("foo=bar");
        assert_eq!(cookies.len(), 1);
        assert_eq!(cookies["foo"], "bar");
    }

    #[test]
    fn test_multiple_cookies() {
        let cookies = extract_cookies("foo=bar; baz=qux");
        assert_eq!(cookies["foo"], "bar");
        assert_eq!(cookies["baz"], "qux");
    }

    #[test]
    fn test_empty_header() {
        assert!(extract_cookies("").is_empty());
    }

    #[test]
    fn test_malformed_pairs_skipped() {
        let cookies = extract_cookies("foo=bar; malformed; a=b=c; =x; y=; baz=qux");
        assert_eq!(cookies.len(), 2);
        assert_eq!(cookies["foo"], "bar");
        assert_eq!(cookies["baz"], "qux");
    }

    #[test]
    fn test_session_cookies() {
        let cookies = extract_cookies("userID=abc-123; gameID=def-456");
        assert_eq!(cookies[USER_COOKIE], "abc-123");
        assert_eq!(cookies[GAME_COOKIE], "def-456");
    }
}
