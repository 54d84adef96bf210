use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, Utc};

/// Case-insensitive substring check.
/// `needle` must already be lowercased.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    haystack.to_lowercase().contains(needle)
}

/// Compare two strings ignoring case, without allocating.
pub fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().flat_map(char::to_lowercase);
    let mut right = b.chars().flat_map(char::to_lowercase);
    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => match x.cmp(&y) {
                Ordering::Equal => continue,
                other => return other,
            },
        }
    }
}

/// Parse an ISO-8601 value into an instant.
/// Accepts full RFC 3339 timestamps and plain `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_instant(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Compare two date strings by instant, earliest first.
/// Unparseable values sort after every valid instant and tie with each other.
pub fn cmp_instants(a: &str, b: &str) -> Ordering {
    match (parse_instant(a), parse_instant(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Format a date string to a more readable format
pub fn format_date(date: &str) -> String {
    match parse_instant(date) {
        Some(dt) => dt.format("%b %d, %Y").to_string(),
        None if date.is_empty() => "-".to_string(),
        None => date.chars().take(10).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_ignore_case() {
        assert!(contains_ignore_case("Example.COM", "example.com"));
        assert!(contains_ignore_case("anything", ""));
        assert!(!contains_ignore_case("abc", "abd"));
    }

    #[test]
    fn test_cmp_ignore_case() {
        assert_eq!(cmp_ignore_case("alpha", "ALPHA"), Ordering::Equal);
        assert_eq!(cmp_ignore_case("Alpha", "beta"), Ordering::Less);
        assert_eq!(cmp_ignore_case("gamma", "Beta"), Ordering::Greater);
        assert_eq!(cmp_ignore_case("ab", "abc"), Ordering::Less);
    }

    #[test]
    fn test_parse_instant_formats() {
        assert!(parse_instant("2024-03-01").is_some());
        assert!(parse_instant("2024-03-01T10:15:00Z").is_some());
        assert!(parse_instant("2024-03-01T10:15:00+02:00").is_some());
        assert!(parse_instant("not a date").is_none());
        assert!(parse_instant("").is_none());
    }

    #[test]
    fn test_cmp_instants_compares_by_instant() {
        // Same instant, different offsets
        assert_eq!(
            cmp_instants("2024-03-01T12:00:00+02:00", "2024-03-01T10:00:00Z"),
            Ordering::Equal
        );
        // Lexically larger but chronologically earlier
        assert_eq!(
            cmp_instants("2024-03-01T23:00:00+05:00", "2024-03-01T19:00:00Z"),
            Ordering::Less
        );
        assert_eq!(cmp_instants("2001-01-01", "2099-01-01"), Ordering::Less);
    }

    #[test]
    fn test_cmp_instants_unparseable_last() {
        assert_eq!(cmp_instants("2001-01-01", "garbage"), Ordering::Less);
        assert_eq!(cmp_instants("", "2001-01-01"), Ordering::Greater);
        assert_eq!(cmp_instants("", "garbage"), Ordering::Equal);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Hello", 10), "Hello");
        assert_eq!(truncate("Hello World", 8), "Hello...");
        assert_eq!(truncate("Hi", 2), "Hi");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2024-03-01"), "Mar 01, 2024");
        assert_eq!(format_date(""), "-");
        assert_eq!(format_date("soon"), "soon");
    }
}
