use regex::Regex;
use std::sync::LazyLock;

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]{2,16}$").unwrap());

/// Check a username against the syntax Mojang accepts (2-16 word characters).
///
/// Advisory only: the API is the authority on what exists.
pub fn is_valid_username(name: &str) -> bool {
    USERNAME_RE.is_match(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_typical_names() {
        assert!(is_valid_username("mikroskeem"));
        assert!(is_valid_username("MHF_Alex"));
        assert!(is_valid_username("3i5g00d"));
    }

    #[test]
    fn test_length_bounds() {
        assert!(!is_valid_username("a"));
        assert!(is_valid_username("ab"));
        assert!(is_valid_username("abcdefghijklmnop"));
        assert!(!is_valid_username("abcdefghijklmnopq"));
    }

    #[test]
    fn test_rejects_punctuation_and_whitespace() {
        assert!(!is_valid_username(""));
        assert!(!is_valid_username("with space"));
        assert!(!is_valid_username("dash-name"));
        assert!(!is_valid_username("name\n"));
    }

    #[test]
    fn test_rejects_non_ascii_word_chars() {
        assert!(!is_valid_username("jõgi"));
    }
}
