use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Email pattern: matches standard email addresses
fn email_regex() -> &'static Regex {
    static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
        #[allow(clippy::unwrap_used)]
        Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{1,}\b").unwrap()
    });
    &EMAIL_REGEX
}

/// Redacts sensitive information from a string.
///
/// Emails keep the first character of the local part and the full domain;
/// the rest of the local part is replaced with `***`.
pub fn redact(input: &str) -> String {
    email_regex()
        .replace_all(input, |caps: &regex::Captures| {
            let full_match = &caps[0];
            match full_match.find('@') {
                Some(at_pos) => {
                    let local_part = &full_match[..at_pos];
                    let domain = &full_match[at_pos..];
                    let first = local_part.chars().next().map(String::from).unwrap_or_default();
                    format!("{first}***{domain}")
                }
                None => full_match.to_string(),
            }
        })
        .to_string()
}

/// Display wrapper that redacts its contents when formatted into a log line.
pub struct Redacted<'a>(pub &'a str);

impl fmt::Display for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", redact(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::{redact, Redacted};

    #[test]
    fn test_redact_email_keeps_first_char_and_domain() {
        assert_eq!(redact("alice@example.com"), "a***@example.com");
    }

    #[test]
    fn test_redact_inside_message() {
        let msg = "duplicate key for bob.smith@example.org in users";
        assert_eq!(redact(msg), "duplicate key for b***@example.org in users");
    }

    #[test]
    fn test_redact_leaves_plain_text_alone() {
        assert_eq!(redact("no addresses here"), "no addresses here");
    }

    #[test]
    fn test_display_wrapper() {
        assert_eq!(
            format!("{}", Redacted("carol@example.net")),
            "c***@example.net"
        );
    }
}
