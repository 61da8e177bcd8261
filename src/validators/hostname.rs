use lazy_static::lazy_static;
use regex::Regex;

const MAX_HOSTNAME_LEN: usize = 255;

lazy_static! {
    // Labels may carry underscores (e.g. `_dmarc`), hostnames may not.
    static ref LABEL_RE: Regex =
        Regex::new(r"(?i)^[a-z0-9_]([a-z0-9_-]{0,61}[a-z0-9_])?$").unwrap();
    static ref HOSTNAME_LABEL_RE: Regex =
        Regex::new(r"(?i)^[a-z0-9]([a-z0-9-]{0,61}[a-z0-9])?$").unwrap();
    static ref ALL_NUMERIC_RE: Regex = Regex::new(r"^[0-9.]+$").unwrap();
}

/// Returns true if `label` is 1 to 63 characters of letters, digits, hyphens, and (unless
/// `hostname` is set) underscores, and does not start or end with a hyphen.
#[must_use]
pub fn is_valid_label(label: &str, hostname: bool) -> bool {
    if hostname {
        HOSTNAME_LABEL_RE.is_match(label)
    } else {
        LABEL_RE.is_match(label)
    }
}

/// Returns true if every dot separated segment of `hostname` is a valid hostname label.
///
/// Names longer than 255 characters are rejected, as are names made only of digits and dots
/// so that something like `192.168.1.1` can't pass as a hostname.
#[must_use]
pub fn is_valid_hostname(hostname: &str) -> bool {
    if hostname.chars().count() > MAX_HOSTNAME_LEN {
        return false;
    }
    if ALL_NUMERIC_RE.is_match(hostname) {
        return false;
    }
    hostname.split('.').all(|label| is_valid_label(label, true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_charset() {
        assert!(is_valid_label("my-site", false));
        assert!(is_valid_label("MySite01", true));
        assert!(is_valid_label("_dmarc", false));
        assert!(!is_valid_label("_dmarc", true));
        assert!(!is_valid_label("my site", false));
        assert!(!is_valid_label("café", false));
        assert!(!is_valid_label("", false));
    }

    #[test]
    fn label_hyphen_edges() {
        assert!(!is_valid_label("-site", true));
        assert!(!is_valid_label("site-", true));
        assert!(!is_valid_label("-", false));
        assert!(is_valid_label("a-b", true));
        assert!(is_valid_label("a", true));
    }

    #[test]
    fn label_length() {
        assert!(is_valid_label(&"a".repeat(63), true));
        assert!(!is_valid_label(&"a".repeat(64), true));
    }

    #[test]
    fn hostname_examples() {
        assert!(is_valid_hostname("my-site.example.com"));
        assert!(is_valid_hostname("localhost"));
        assert!(!is_valid_hostname("192.168.1.1"));
        assert!(!is_valid_hostname("1234"));
        assert!(!is_valid_hostname("under_score.example.com"));
        assert!(!is_valid_hostname("double..dot.com"));
        assert!(!is_valid_hostname("trailing.dot."));
        assert!(!is_valid_hostname(""));
    }

    #[test]
    fn hostname_with_digits_is_not_ip_like() {
        assert!(is_valid_hostname("1.2.3.example"));
        assert!(is_valid_hostname("123abc"));
    }

    #[test]
    fn hostname_length_limit() {
        let label = "a".repeat(63);
        let long = [label.as_str(); 4].join(".");
        assert_eq!(long.len(), 255);
        assert!(is_valid_hostname(&long));
        assert!(!is_valid_hostname(&format!("{long}a")));
    }
}
